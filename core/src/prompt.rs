//! Translation prompt assembly.
//!
//! Pure string building: identical inputs always yield byte-identical
//! prompts, so pipeline runs are reproducible apart from the model call
//! itself.

use crate::catalog::StoredProcedure;

pub const SYSTEM_INSTRUCTIONS: &str = "You are an expert in translating PostgreSQL stored \
procedures into Rust data-access code built on sqlx. Use modern idioms and clear documentation.";

/// The instruction document sent for one procedure: rendered table
/// definitions, the procedure's metadata and source, and a fixed
/// requirements checklist.
pub fn translation_prompt(proc: &StoredProcedure, table_definitions: &str) -> String {
    format!(
        r#"Translate this PostgreSQL stored procedure into a Rust function using the sqlx crate.
Output only pure Rust code without any markdown formatting, section numbers, or explanatory text.

Table Definitions:
{table_definitions}

Procedure Name: {name}
Arguments: {arguments}

PostgreSQL Code:
{definition}

Requirements for the output:
1. Start with all necessary `use` declarations (sqlx, chrono, rust_decimal)
2. Define one struct per table deriving sqlx::FromRow with matching field types
3. Define the main function as `pub async fn` with typed arguments and a Result return type
4. Take `&sqlx::PgPool` as the first parameter instead of constructing a connection
5. Wrap all writes in a single transaction that rolls back if any step fails
6. Add a doc comment to the main function
7. Use rust_decimal::Decimal for every NUMERIC column
8. Let the provisions table default calculation_date to CURRENT_DATE
9. Model foreign keys as plain id fields on the structs
10. Output only compilable Rust code without any markdown fences or commentary
"#,
        table_definitions = table_definitions,
        name = proc.name,
        arguments = proc.arguments,
        definition = proc.definition,
    )
}
