//! Pass orchestration

pub mod pipeline;

pub use pipeline::{Collaborators, ExportSummary, Pipeline, PipelineSummary};
