//! Catalog introspection types.
//!
//! The queries behind these live in `store.rs`; this module holds the
//! row shapes and the rendering the prompt builder consumes.

use serde::{Deserialize, Serialize};

/// One callable procedure pulled from the system catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredProcedure {
    pub schema: String,
    pub name: String,
    /// Rendered argument list, e.g. `IN agent_id_input integer`.
    pub arguments: String,
    pub return_type: String,
    /// Full `CREATE OR REPLACE PROCEDURE ...` source.
    pub definition: String,
}

impl StoredProcedure {
    /// `schema.name`, the key used in logs and reports.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// One user table with its columns pre-aggregated into a definition
/// block (name, data type, optional length qualifier, nullability).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TableDefinition {
    pub table_name: String,
    pub columns: String,
}

/// Render the tables as `CREATE TABLE` blocks for the translation prompt.
pub fn render_table_definitions(tables: &[TableDefinition]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&format!(
            "\nCREATE TABLE {} (\n    {}\n);",
            table.table_name, table.columns
        ));
    }
    out
}
