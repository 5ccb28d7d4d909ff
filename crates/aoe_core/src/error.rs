//! Engine error type.

use thiserror::Error;

/// Invalid-argument failures surfaced synchronously to the caller.
///
/// Missing or ambiguous replay data is never an error anywhere in this crate;
/// it is represented as absence (empty series, `None` cost, skipped action).
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("unsupported resource name '{0}' (expected one of: food, wood, gold, stone)")]
    UnsupportedResource(String),
}
