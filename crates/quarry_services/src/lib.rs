mod aws;
mod bedrock;
mod data_api;
mod settings;

pub use aws::*;
pub use bedrock::*;
pub use data_api::*;
pub use settings::*;
