use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A chart distribution has no mass to draw.
    #[error("distribution is empty or sums to zero")]
    EmptyDistribution,
}
