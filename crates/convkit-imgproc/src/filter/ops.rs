use convkit_image::Image;

use super::convolution::{check_same_layout, convolve_rows};
use super::{kernels::Kernel3x3, FilterError};
use crate::parallel::{self, ExecutionStrategy};

/// Apply a 3x3 kernel to an image.
///
/// The rows of the destination are partitioned across the workers of `strategy`. Each
/// worker owns a disjoint block of destination rows and reads the whole source, which is
/// shared read-only. The function returns once every worker has finished.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The kernel to apply.
/// * `strategy` - The execution strategy, which fixes the number of workers.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{convolve3x3, kernels::KernelType};
/// use convkit_imgproc::parallel::ExecutionStrategy;
///
/// let src = Image::from_size_val([3, 3].into(), 1, 200).unwrap();
/// let mut dst = src.zeros_like();
///
/// convolve3x3(&src, &mut dst, &KernelType::Blur.kernel(), ExecutionStrategy::Fixed(2)).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 200));
/// ```
pub fn convolve3x3(
    src: &Image,
    dst: &mut Image,
    kernel: &Kernel3x3,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_layout(src, dst)?;

    log::debug!(
        "convolving {}x{}x{} image with '{}' kernel using {:?}",
        src.width(),
        src.height(),
        src.num_channels(),
        kernel.name(),
        strategy
    );

    let row_stride = src.row_stride();
    parallel::par_iter_row_ranges(dst.as_slice_mut(), row_stride, strategy, |range, rows| {
        convolve_rows(src, rows, kernel, range)
    })?;

    Ok(())
}

/// Apply a 3x3 kernel to an image, allocating the destination.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The kernel to apply.
/// * `strategy` - The execution strategy.
///
/// # Returns
///
/// A new image with the same size and channels as `src`.
pub fn filter3x3(
    src: &Image,
    kernel: &Kernel3x3,
    strategy: ExecutionStrategy,
) -> Result<Image, FilterError> {
    let mut dst = src.zeros_like();
    convolve3x3(src, &mut dst, kernel, strategy)?;
    Ok(dst)
}
