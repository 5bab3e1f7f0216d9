// Transaction Pipeline - Core Library
// Four stages over one table shape, plus the runner, previews and CSV I/O

pub mod error;
pub mod entities;
pub mod table;
pub mod generator;    // Stage 1: synthetic data
pub mod cleaning;     // Stage 2: drop invalid rows
pub mod transform;    // Stage 3: derived columns
pub mod aggregation;  // Stage 4: per-category totals
pub mod pipeline;
pub mod preview;
pub mod export;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use entities::{Location, ProductCategory};
pub use table::{AggregateRow, AggregateTable, Column, Table, Transaction};
pub use generator::{generate, generate_seeded};
pub use cleaning::{clean, clean_with_report, CleaningReport, DropReason, DroppedRecord};
pub use transform::transform;
pub use aggregation::aggregate;
pub use pipeline::{table_digest, Pipeline, PipelineConfig, PipelineRun, RunReport};
pub use preview::{render_aggregate, render_table};
pub use export::{
    read_table, read_table_csv, write_aggregate, write_aggregate_csv, write_table,
    write_table_csv,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
