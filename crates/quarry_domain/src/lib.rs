mod ids;
mod knowledge;
mod provision;
mod smoke;

pub use ids::*;
pub use knowledge::*;
pub use provision::*;
pub use smoke::*;
