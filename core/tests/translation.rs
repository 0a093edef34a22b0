//! Prompt builder and code emitter behavior.

use provision_core::{
    catalog::{render_table_definitions, StoredProcedure, TableDefinition},
    emitter::{emit, strip_code_fences},
    prompt::translation_prompt,
};
use std::fs;

fn sample_procedure() -> StoredProcedure {
    StoredProcedure {
        schema: "public".to_string(),
        name: "calculate_provisions".to_string(),
        arguments: "IN agent_id_input integer".to_string(),
        return_type: "void".to_string(),
        definition: "CREATE OR REPLACE PROCEDURE public.calculate_provisions(IN agent_id_input integer)\n\
                     LANGUAGE plpgsql\nAS $procedure$\nBEGIN\n    NULL;\nEND;\n$procedure$"
            .to_string(),
    }
}

fn sample_tables() -> Vec<TableDefinition> {
    vec![
        TableDefinition {
            table_name: "agents".to_string(),
            columns: "agent_id integer NOT NULL\n    name character varying(100) NOT NULL"
                .to_string(),
        },
        TableDefinition {
            table_name: "policies".to_string(),
            columns: "policy_id integer NOT NULL\n    premium_amount numeric NOT NULL".to_string(),
        },
    ]
}

#[test]
fn table_definitions_render_as_create_table_blocks() {
    let rendered = render_table_definitions(&sample_tables());
    assert!(rendered.contains("CREATE TABLE agents ("));
    assert!(rendered.contains("CREATE TABLE policies ("));
    assert!(rendered.contains("    agent_id integer NOT NULL"));
    assert!(rendered.contains(");"));
}

#[test]
fn prompt_is_a_pure_function_of_its_inputs() {
    let proc = sample_procedure();
    let tables = render_table_definitions(&sample_tables());
    let first = translation_prompt(&proc, &tables);
    let second = translation_prompt(&proc, &tables);
    assert_eq!(first, second);
}

#[test]
fn prompt_carries_metadata_source_and_requirements() {
    let proc = sample_procedure();
    let tables = render_table_definitions(&sample_tables());
    let prompt = translation_prompt(&proc, &tables);

    assert!(prompt.contains("Procedure Name: calculate_provisions"));
    assert!(prompt.contains("Arguments: IN agent_id_input integer"));
    assert!(prompt.contains(&proc.definition));
    assert!(prompt.contains("CREATE TABLE agents ("));
    assert!(prompt.contains("Requirements for the output:"));
}

#[test]
fn strip_code_fences_removes_leading_and_trailing_markers() {
    assert_eq!(
        strip_code_fences("```rust\npub fn f() {}\n```"),
        "pub fn f() {}"
    );
    assert_eq!(strip_code_fences("```\nlet x = 1;\n```"), "let x = 1;");
    // Surrounding whitespace around the fences is tolerated too.
    assert_eq!(
        strip_code_fences("\n```rust\nlet y = 2;\n```\n\n"),
        "let y = 2;"
    );
}

#[test]
fn strip_code_fences_is_a_noop_on_plain_text() {
    let plain = "pub async fn calculate(pool: &sqlx::PgPool) {}";
    assert_eq!(strip_code_fences(plain), plain);
}

#[test]
fn emit_writes_header_then_translation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let proc = sample_procedure();

    let path = emit(dir.path(), &proc, "```rust\npub fn generated() {}\n```").expect("emit");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("public_calculate_provisions.rs")
    );

    let content = fs::read_to_string(&path).expect("read emitted file");
    assert!(content.starts_with("//! PostgreSQL stored procedure: calculate_provisions"));
    assert!(content.contains("//! Schema: public"));
    assert!(content.contains("//! Arguments: IN agent_id_input integer"));
    assert!(content.contains("//! Return type: void"));
    // Original source is reproduced line by line in the header.
    assert!(content.contains("//! LANGUAGE plpgsql"));
    // The fences are gone from the body.
    assert!(content.contains("pub fn generated() {}"));
    assert!(!content.contains("```"));
}

#[test]
fn emit_creates_the_output_directory_and_overwrites() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("out").join("translated");
    let proc = sample_procedure();

    let path = emit(&nested, &proc, "first body").expect("first emit");
    let again = emit(&nested, &proc, "second body").expect("second emit");
    assert_eq!(path, again);

    let content = fs::read_to_string(&path).expect("read emitted file");
    assert!(content.contains("second body"));
    assert!(!content.contains("first body"));
}
