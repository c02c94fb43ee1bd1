//! Monitoring pipeline: per-keyword collection, link de-duplication, summarization, and ordering.

pub(crate) mod pipeline;
mod prompt;
mod summary;

pub use pipeline::{MonitorError, MonitorRequest, run};
