// 🔗 Pipeline runner - generate → clean → transform → aggregate
//
// Keeps every intermediate table so the driver can preview, export or browse
// them. Stage errors are returned as-is.

use crate::aggregation::aggregate;
use crate::cleaning::{clean_with_report, CleaningReport};
use crate::error::{PipelineError, Result};
use crate::export::write_table;
use crate::generator::generate;
use crate::table::{AggregateRow, AggregateTable, Table};
use crate::transform::transform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, info_span};
use uuid::Uuid;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rows to generate
    pub rows: usize,

    /// RNG seed; drawn from OS entropy when absent
    pub seed: Option<u64>,

    /// Rows shown per stage preview
    pub preview_rows: usize,
}

impl PipelineConfig {
    pub const DEFAULT_ROWS: usize = 100;
    pub const DEFAULT_PREVIEW_ROWS: usize = 5;

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(PipelineError::InvalidArgument(
                "rows must be a positive integer".to_string(),
            ));
        }
        if self.preview_rows == 0 {
            return Err(PipelineError::InvalidArgument(
                "preview_rows must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            rows: Self::DEFAULT_ROWS,
            seed: None,
            preview_rows: Self::DEFAULT_PREVIEW_ROWS,
        }
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Everything one pipeline execution produced.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub seed: u64,
    pub generated: Table,
    pub generated_digest: String,
    pub cleaned: Table,
    pub cleaning: CleaningReport,
    pub transformed: Table,
    pub aggregated: AggregateTable,
}

impl PipelineRun {
    pub fn report(&self) -> RunReport {
        RunReport {
            run_id: self.run_id.to_string(),
            seed: self.seed,
            rows_generated: self.generated.len(),
            rows_cleaned: self.cleaned.len(),
            rows_dropped: self.cleaning.dropped_rows(),
            rows_transformed: self.transformed.len(),
            generated_digest: self.generated_digest.clone(),
            total_amount: self.aggregated.total(),
            aggregate: self.aggregated.rows().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub seed: u64,
    pub rows_generated: usize,
    pub rows_cleaned: usize,
    pub rows_dropped: usize,
    pub rows_transformed: usize,

    /// SHA-256 of the generated table as CSV; equal seeds give equal digests
    pub generated_digest: String,
    pub total_amount: f64,
    pub aggregate: Vec<AggregateRow>,
}

/// SHA-256 hex digest of a table's canonical CSV text.
pub fn table_digest(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_table(&mut buf, table)?;

    let mut hasher = Sha256::new();
    hasher.update(&buf);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all four stages. Without a configured seed one is drawn and
    /// recorded in the result.
    pub fn run(&self) -> Result<PipelineRun> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.run_seeded(seed)
    }

    pub fn run_seeded(&self, seed: u64) -> Result<PipelineRun> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id, seed);
        let _guard = span.enter();

        let mut rng = StdRng::seed_from_u64(seed);
        let generated = generate(self.config.rows, &mut rng)?;
        let generated_digest = table_digest(&generated)?;
        info!(rows = generated.len(), digest = %generated_digest, "generate");

        let (cleaned, cleaning) = clean_with_report(&generated);
        info!(rows = cleaned.len(), dropped = cleaning.dropped_rows(), "clean");

        let transformed = transform(&cleaned)?;
        info!(rows = transformed.len(), "transform");

        let aggregated = aggregate(&transformed)?;
        info!(groups = aggregated.len(), total = aggregated.total(), "aggregate");

        Ok(PipelineRun {
            run_id,
            seed,
            generated,
            generated_digest,
            cleaned,
            cleaning,
            transformed,
            aggregated,
        })
    }
}
