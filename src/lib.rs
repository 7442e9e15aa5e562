//! Decitrace - Process-tracing engine for decision-matrix interaction data
//!
//! Decitrace reconstructs how participants searched a decision matrix and what
//! decision strategies their search is consistent with, through a deterministic
//! pipeline: session validation → chronological reconstruction → first-pass
//! tracing → search metrics → strategy classification → cross-participant
//! aggregation.
//!
//! ## Modules
//!
//! - **Session Tracing**: Per-participant trace with search metrics and
//!   strategy labels
//! - **Aggregation**: Descriptive statistics across all participants of a
//!   matrix

pub mod adapter;
pub mod aggregate;
pub mod chronology;
pub mod error;
pub mod numeric;
pub mod pipeline;
pub mod search_index;
pub mod session;
pub mod strategy;
pub mod tracer;
pub mod types;

pub use error::AnalysisError;
pub use pipeline::{analyze_matrix, analyze_matrix_json, MatrixAnalysis};

// Per-session exports
pub use session::{trace_session, TracedInteractions};
pub use strategy::StrategyLabel;
pub use tracer::InitialTrace;
pub use types::{CellRecord, MatrixLabels, MatrixSession};

// Aggregate exports
pub use aggregate::{aggregate_sessions, AggregateInteraction, AggregateInteractions};

/// Engine version embedded by downstream exporters
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
