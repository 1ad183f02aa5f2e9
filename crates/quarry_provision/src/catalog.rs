use quarry_domain::{Operation, VerificationCheck};

/// The fixed, ordered statement list for the vector store behind the
/// knowledge base. Order matters: extension before table, schema before
/// grant. Every statement is safe to re-run.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::new("Create pgvector extension", "CREATE EXTENSION IF NOT EXISTS vector;"),
        Operation::new(
            "Create bedrock_integration schema",
            "CREATE SCHEMA IF NOT EXISTS bedrock_integration;",
        ),
        Operation::new(
            "Create bedrock_user role",
            "DO $$ BEGIN CREATE ROLE bedrock_user LOGIN; EXCEPTION WHEN duplicate_object THEN \
             RAISE NOTICE 'Role already exists'; END $$;",
        ),
        Operation::new(
            "Grant privileges to bedrock_user",
            "GRANT ALL ON SCHEMA bedrock_integration to bedrock_user;",
        ),
        Operation::new(
            "Create bedrock_kb table",
            "CREATE TABLE IF NOT EXISTS bedrock_integration.bedrock_kb (\n\
                 id uuid PRIMARY KEY,\n\
                 embedding vector(1536),\n\
                 chunks text,\n\
                 metadata json\n\
             );",
        ),
        Operation::new(
            "Create HNSW index on embeddings",
            "CREATE INDEX IF NOT EXISTS bedrock_kb_embedding_idx ON \
             bedrock_integration.bedrock_kb USING hnsw (embedding vector_cosine_ops);",
        ),
    ]
}

/// Read-only checks confirming the target state after the batch.
pub fn checks() -> Vec<VerificationCheck> {
    vec![
        VerificationCheck::new(
            "pgvector extension is installed",
            "SELECT extname FROM pg_extension WHERE extname = 'vector';",
        ),
        VerificationCheck::new(
            "bedrock_integration schema exists",
            "SELECT schema_name FROM information_schema.schemata WHERE schema_name = \
             'bedrock_integration';",
        ),
        VerificationCheck::new(
            "Tables in bedrock_integration",
            "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = \
             'bedrock_integration';",
        ),
    ]
}
