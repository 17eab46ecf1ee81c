//! Decision Engine: gates and the end-to-end verification pipeline

pub mod decision;
pub mod pipeline;

pub use decision::{decide, similarity_gate};
pub use pipeline::TrustPipeline;
