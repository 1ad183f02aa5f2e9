use serde::{Deserialize, Serialize};

/// A named SQL statement applied during provisioning.
///
/// Operations are defined once at startup and executed strictly in list
/// order: statements that create a dependency (extension, schema, role,
/// grant, table, index) must appear before the statements that need them.
/// Every statement must be safe to re-run; idempotency is a property of the
/// statement text, not of the runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub statement: String,
}

impl Operation {
    pub fn new(name: impl Into<String>, statement: impl Into<String>) -> Self {
        Self { name: name.into(), statement: statement.into() }
    }
}

/// Outcome of applying a single operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub operation_name: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// A read-only query run after the batch to confirm the target state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub description: String,
    pub query: String,
}

impl VerificationCheck {
    pub fn new(description: impl Into<String>, query: impl Into<String>) -> Self {
        Self { description: description.into(), query: query.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum VerificationStatus {
    /// The check query returned rows; `rows` holds the first cell of each
    /// row as text (for the table-listing check, the discovered names).
    Present { rows: Vec<String> },
    /// The check query ran but returned no rows.
    Absent,
    /// The check query itself failed. Never propagated as a fatal error.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VerificationOutcome {
    pub description: String,
    pub status: VerificationStatus,
}

/// A single typed cell from the statement-execution API.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    StringValue(String),
    /// A cell type the provisioning flow never reads.
    Other,
}

impl Cell {
    pub fn as_string_value(&self) -> Option<&str> {
        match self {
            Cell::StringValue(value) => Some(value),
            Cell::Other => None,
        }
    }
}

/// Row data returned by the statement-execution API.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementOutput {
    pub records: Vec<Vec<Cell>>,
}

/// Remote statement-execution API bound to one target database.
///
/// Implementations capture the target identifiers (cluster, credentials,
/// database name); callers supply only the SQL text.
#[async_trait::async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> anyhow::Result<StatementOutput>;
}

/// Best-effort sequential batch runner.
///
/// Applies an ordered operation list against one executor, recovering every
/// per-statement fault locally: a failed statement is recorded and the batch
/// continues. There are no retries and no rollback; partial application is
/// an accepted terminal state and the operator re-runs the idempotent list.
pub struct Provisioner<E> {
    executor: E,
}

impl<E: StatementExecutor> Provisioner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Executes every operation in list order, awaiting each result before
    /// the next statement starts, and returns one result per operation.
    pub async fn apply(&self, operations: &[Operation]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(operations.len());
        for operation in operations {
            tracing::info!(operation = %operation.name, "applying statement");
            let result = match self.executor.execute(&operation.statement).await {
                Ok(_) => ExecutionResult {
                    operation_name: operation.name.clone(),
                    succeeded: true,
                    error: None,
                },
                Err(error) => {
                    tracing::warn!(operation = %operation.name, %error, "statement failed");
                    ExecutionResult {
                        operation_name: operation.name.clone(),
                        succeeded: false,
                        error: Some(error.to_string()),
                    }
                }
            };
            results.push(result);
        }
        results
    }

    /// Runs each read-only check and reports presence, absence, or the
    /// check's own failure. Check failures are reported, never propagated.
    pub async fn verify(&self, checks: &[VerificationCheck]) -> Vec<VerificationOutcome> {
        let mut outcomes = Vec::with_capacity(checks.len());
        for check in checks {
            let status = match self.executor.execute(&check.query).await {
                Ok(output) if output.records.is_empty() => VerificationStatus::Absent,
                Ok(output) => VerificationStatus::Present {
                    rows: output
                        .records
                        .iter()
                        .filter_map(|row| row.first())
                        .filter_map(|cell| cell.as_string_value())
                        .map(str::to_string)
                        .collect(),
                },
                Err(error) => VerificationStatus::Failed(error.to_string()),
            };
            outcomes.push(VerificationOutcome { description: check.description.clone(), status });
        }
        outcomes
    }
}

/// Number of results that applied successfully, for the `k/n` summary line.
pub fn succeeded_count(results: &[ExecutionResult]) -> usize {
    results.iter().filter(|result| result.succeeded).count()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Executor that fails any statement containing one of the given
    /// fragments and records every statement it receives.
    struct ScriptedExecutor {
        fail_on: Vec<&'static str>,
        rows_for: Vec<(&'static str, Vec<&'static str>)>,
        executed: Mutex<Vec<String>>,
    }

    impl ScriptedExecutor {
        fn succeeding() -> Self {
            Self { fail_on: vec![], rows_for: vec![], executed: Mutex::new(vec![]) }
        }

        fn failing_on(fragments: Vec<&'static str>) -> Self {
            Self { fail_on: fragments, rows_for: vec![], executed: Mutex::new(vec![]) }
        }

        fn with_rows(rows_for: Vec<(&'static str, Vec<&'static str>)>) -> Self {
            Self { fail_on: vec![], rows_for, executed: Mutex::new(vec![]) }
        }
    }

    #[async_trait::async_trait]
    impl StatementExecutor for ScriptedExecutor {
        async fn execute(&self, sql: &str) -> anyhow::Result<StatementOutput> {
            self.executed.lock().unwrap().push(sql.to_string());
            if self.fail_on.iter().any(|fragment| sql.contains(fragment)) {
                anyhow::bail!("permission denied");
            }
            let records = self
                .rows_for
                .iter()
                .find(|(fragment, _)| sql.contains(fragment))
                .map(|(_, rows)| {
                    rows.iter().map(|row| vec![Cell::StringValue(row.to_string())]).collect()
                })
                .unwrap_or_default();
            Ok(StatementOutput { records })
        }
    }

    fn operations() -> Vec<Operation> {
        vec![
            Operation::new("extension", "CREATE EXTENSION IF NOT EXISTS vector;"),
            Operation::new("schema", "CREATE SCHEMA IF NOT EXISTS app;"),
            Operation::new("grant", "GRANT ALL ON SCHEMA app TO app_user;"),
            Operation::new("table", "CREATE TABLE IF NOT EXISTS app.items (id uuid);"),
        ]
    }

    #[tokio::test]
    async fn apply_succeeds_for_every_operation_on_fresh_target() {
        let fixture = Provisioner::new(ScriptedExecutor::succeeding());

        let actual = fixture.apply(&operations()).await;

        assert_eq!(actual.len(), 4);
        assert!(actual.iter().all(|result| result.succeeded && result.error.is_none()));
        assert_eq!(succeeded_count(&actual), 4);
    }

    #[tokio::test]
    async fn reapplying_the_same_list_succeeds() {
        // Statements are idempotent, so a second run against an initialized
        // target behaves exactly like the first.
        let fixture = Provisioner::new(ScriptedExecutor::succeeding());

        let first = fixture.apply(&operations()).await;
        let second = fixture.apply(&operations()).await;

        assert_eq!(first, second);
        assert_eq!(succeeded_count(&second), 4);
    }

    #[tokio::test]
    async fn apply_continues_past_a_failing_statement() {
        let executor = ScriptedExecutor::failing_on(vec!["GRANT"]);
        let fixture = Provisioner::new(executor);

        let actual = fixture.apply(&operations()).await;

        assert_eq!(actual.len(), 4);
        assert!(actual[0].succeeded);
        assert!(actual[1].succeeded);
        assert!(!actual[2].succeeded);
        assert_eq!(actual[2].error.as_deref(), Some("permission denied"));
        // The statement after the failure is still attempted.
        assert!(actual[3].succeeded);
        assert_eq!(fixture.executor.executed.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn apply_preserves_list_order() {
        let fixture = Provisioner::new(ScriptedExecutor::succeeding());

        fixture.apply(&operations()).await;

        let actual = fixture.executor.executed.lock().unwrap().clone();
        let expected: Vec<String> =
            operations().iter().map(|operation| operation.statement.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn succeeded_count_matches_every_failure_pattern() {
        for fail_on in [vec![], vec!["EXTENSION"], vec!["GRANT", "TABLE"], vec!["CREATE", "GRANT"]]
        {
            let expected = {
                let failing = fail_on.clone();
                operations()
                    .iter()
                    .filter(|op| !failing.iter().any(|f| op.statement.contains(f)))
                    .count()
            };
            let fixture = Provisioner::new(ScriptedExecutor::failing_on(fail_on));

            let actual = fixture.apply(&operations()).await;

            assert_eq!(succeeded_count(&actual), expected);
            assert_eq!(actual.len(), 4);
        }
    }

    #[tokio::test]
    async fn verify_reports_presence_with_discovered_rows() {
        let executor = ScriptedExecutor::with_rows(vec![
            ("pg_extension", vec!["vector"]),
            ("pg_tables", vec!["documents", "chunks"]),
        ]);
        let fixture = Provisioner::new(executor);
        let checks = vec![
            VerificationCheck::new("extension", "SELECT extname FROM pg_extension;"),
            VerificationCheck::new("schema", "SELECT schema_name FROM schemata;"),
            VerificationCheck::new("tables", "SELECT tablename FROM pg_catalog.pg_tables;"),
        ];

        let actual = fixture.verify(&checks).await;

        assert_eq!(
            actual[0].status,
            VerificationStatus::Present { rows: vec!["vector".to_string()] }
        );
        assert_eq!(actual[1].status, VerificationStatus::Absent);
        assert_eq!(
            actual[2].status,
            VerificationStatus::Present {
                rows: vec!["documents".to_string(), "chunks".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn verify_reports_a_failing_check_without_propagating() {
        let executor = ScriptedExecutor::failing_on(vec!["pg_extension"]);
        let fixture = Provisioner::new(executor);
        let checks = vec![
            VerificationCheck::new("extension", "SELECT extname FROM pg_extension;"),
            VerificationCheck::new("schema", "SELECT schema_name FROM schemata;"),
        ];

        let actual = fixture.verify(&checks).await;

        assert_eq!(actual[0].status, VerificationStatus::Failed("permission denied".to_string()));
        // The next check still runs.
        assert_eq!(actual[1].status, VerificationStatus::Absent);
    }
}
