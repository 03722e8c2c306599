//! Evaluation utilities for measuring forest search quality.
//!
//! - **Accuracy**: recall@k against exact ground truth
//! - **Data**: seeded synthetic datasets in the flat row-major layout the
//!   forest indexes directly
//!
//! Used by the integration tests, benches and demos.

pub mod datasets;
pub mod metrics;

pub use datasets::{clustered, ground_truth, uniform};
pub use metrics::{mean_recall, recall_at_k};
