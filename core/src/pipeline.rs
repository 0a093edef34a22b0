//! Translation pipeline orchestration.
//!
//! Drives introspection, prompt assembly, the model call, and emission
//! for every procedure in the catalog. Failures are isolated per
//! procedure: one bad translation is logged and recorded, the rest of
//! the batch still runs. Contrast with the calculation engine, whose
//! writes are all-or-nothing per agent.

use crate::{
    catalog::{render_table_definitions, StoredProcedure},
    emitter,
    error::CoreResult,
    prompt::translation_prompt,
    store::PolicyStore,
    translator::Translator,
};
use std::path::PathBuf;

/// What one pipeline run produced.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub emitted: Vec<EmittedProcedure>,
    pub failures: Vec<PipelineFailure>,
}

#[derive(Debug)]
pub struct EmittedProcedure {
    pub procedure: StoredProcedure,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct PipelineFailure {
    pub procedure: String,
    pub reason: String,
}

pub struct TranslationPipeline<'a> {
    store: &'a PolicyStore,
    translator: &'a Translator,
    out_dir: PathBuf,
}

impl<'a> TranslationPipeline<'a> {
    pub fn new(store: &'a PolicyStore, translator: &'a Translator, out_dir: PathBuf) -> Self {
        Self { store, translator, out_dir }
    }

    /// Translate every stored procedure in the catalog.
    ///
    /// Catalog access is fatal: a partial listing is never treated as
    /// success. Everything downstream of the listing is best-effort per
    /// procedure.
    pub async fn run(&self) -> CoreResult<PipelineReport> {
        let procedures = self.store.stored_procedures().await?;
        if procedures.is_empty() {
            log::info!("no stored procedures found");
            return Ok(PipelineReport::default());
        }

        let tables = self.store.table_definitions().await?;
        let table_definitions = render_table_definitions(&tables);

        let mut report = PipelineReport::default();
        for proc in &procedures {
            let qualified = proc.qualified_name();
            log::info!("translating {qualified}");

            let prompt = translation_prompt(proc, &table_definitions);
            let translated = match self.translator.translate(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("translation failed for {qualified}: {e}");
                    report.failures.push(PipelineFailure {
                        procedure: qualified,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match emitter::emit(&self.out_dir, proc, &translated) {
                Ok(path) => {
                    log::info!("saved {qualified} to {}", path.display());
                    report.emitted.push(EmittedProcedure {
                        procedure: proc.clone(),
                        path,
                    });
                }
                Err(e) => {
                    log::error!("emit failed for {qualified}: {e}");
                    report.failures.push(PipelineFailure {
                        procedure: qualified,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
