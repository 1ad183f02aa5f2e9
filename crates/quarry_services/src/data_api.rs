use anyhow::Context as _;
use aws_sdk_rdsdata::Client;
use aws_sdk_rdsdata::types::Field;
use quarry_domain::{Cell, StatementExecutor, StatementOutput};

use crate::DataApiSettings;

/// Statement executor backed by the RDS Data API.
///
/// The target cluster, credential secret, and database name are fixed at
/// construction; each call sends one SQL statement and awaits its result.
pub struct DataApiExecutor {
    client: Client,
    settings: DataApiSettings,
}

impl DataApiExecutor {
    /// Builds a client from the default AWS credential chain, honoring the
    /// region override in the settings.
    pub async fn connect(settings: DataApiSettings) -> anyhow::Result<Self> {
        let config = crate::sdk_config(settings.region.as_deref()).await;
        Ok(Self { client: Client::new(&config), settings })
    }
}

#[async_trait::async_trait]
impl StatementExecutor for DataApiExecutor {
    async fn execute(&self, sql: &str) -> anyhow::Result<StatementOutput> {
        tracing::debug!(database = %self.settings.database, "executing statement");
        let output = self
            .client
            .execute_statement()
            .resource_arn(&self.settings.cluster_arn)
            .secret_arn(&self.settings.secret_arn)
            .database(&self.settings.database)
            .sql(sql)
            .send()
            .await
            .context("Failed to call RDS Data API execute_statement")?;

        let records = output
            .records
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(into_cell).collect())
            .collect();
        Ok(StatementOutput { records })
    }
}

fn into_cell(field: Field) -> Cell {
    match field {
        Field::StringValue(value) => Cell::StringValue(value),
        _ => Cell::Other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn string_fields_map_to_string_cells() {
        let actual = into_cell(Field::StringValue("bedrock_kb".to_string()));
        assert_eq!(actual, Cell::StringValue("bedrock_kb".to_string()));
    }

    #[test]
    fn non_string_fields_map_to_other() {
        assert_eq!(into_cell(Field::BooleanValue(true)), Cell::Other);
        assert_eq!(into_cell(Field::LongValue(42)), Cell::Other);
        assert_eq!(into_cell(Field::IsNull(true)), Cell::Other);
    }
}
