use convkit_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The source or destination image is not valid for the operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The parallel execution of the filter failed.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// A kernel weight is NaN or infinite.
    #[error("Kernel weight at row {0}, column {1} is not finite")]
    NonFiniteWeight(usize, usize),
}
