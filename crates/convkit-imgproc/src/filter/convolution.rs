use convkit_image::{Image, ImageError};

use super::kernels::Kernel3x3;
use crate::parallel::RowRange;

/// Compute one output sample of a 3x3 convolution.
///
/// The neighbourhood is centred at `(x, y)`. Neighbours falling outside the image reuse the
/// nearest border pixel (replicate border), so `(0, 0)` uses itself as its left and top
/// neighbour. The weighted sum is rounded and saturated to `[0, 255]`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `x` - The column of the output sample.
/// * `y` - The row of the output sample.
/// * `ch` - The channel of the output sample.
/// * `kernel` - The kernel to apply.
///
/// # Panics
///
/// Panics if `x`, `y` or `ch` are outside the source image.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{kernels::KernelType, sample_pixel};
///
/// let image = Image::new([2, 1].into(), 1, vec![10, 20]).unwrap();
/// let identity = KernelType::Identity.kernel();
///
/// assert_eq!(sample_pixel(&image, 1, 0, 0, &identity), 20);
/// ```
pub fn sample_pixel(src: &Image, x: usize, y: usize, ch: usize, kernel: &Kernel3x3) -> u8 {
    let xs = [x.saturating_sub(1), x, (x + 1).min(src.width() - 1)];
    let ys = [y.saturating_sub(1), y, (y + 1).min(src.height() - 1)];

    let mut acc = 0.0f32;
    for (weights, &ny) in kernel.weights().iter().zip(ys.iter()) {
        for (&w, &nx) in weights.iter().zip(xs.iter()) {
            acc += w * src.sample(nx, ny, ch) as f32;
        }
    }

    saturate_u8(acc)
}

/// Round and clamp an accumulated value into the 8-bit sample range.
#[inline]
fn saturate_u8(val: f32) -> u8 {
    val.round().clamp(0.0, 255.0) as u8
}

/// Convolve the rows of `range` into a slice holding exactly those rows.
///
/// This is the unit of work of a single worker: `dst_rows[0..row_stride]` receives row
/// `range.start`, and so on. Rows, columns and channels are visited in order.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst_rows` - The destination rows, `range.len() * src.row_stride()` samples.
/// * `kernel` - The kernel to apply.
/// * `range` - The rows to compute.
///
/// # Panics
///
/// Panics if `dst_rows` does not match the size of `range` or `range` exceeds the image.
pub fn convolve_rows(src: &Image, dst_rows: &mut [u8], kernel: &Kernel3x3, range: RowRange) {
    let stride = src.row_stride();
    let channels = src.num_channels();

    assert_eq!(
        dst_rows.len(),
        range.len() * stride,
        "destination rows do not match the row range [{}, {})",
        range.start,
        range.end
    );
    assert!(range.end <= src.rows());

    for (y, dst_row) in range.iter().zip(dst_rows.chunks_exact_mut(stride)) {
        for (x, dst_pixel) in dst_row.chunks_exact_mut(channels).enumerate() {
            for (ch, dst_val) in dst_pixel.iter_mut().enumerate() {
                *dst_val = sample_pixel(src, x, y, ch, kernel);
            }
        }
    }
}

/// Convolve the rows `[row_start, row_end)` of `src` into `dst`.
///
/// Rows of `dst` outside the range are left untouched.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The kernel to apply.
/// * `row_start` - The first row to compute.
/// * `row_end` - One past the last row to compute.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn convolve_range(
    src: &Image,
    dst: &mut Image,
    kernel: &Kernel3x3,
    row_start: usize,
    row_end: usize,
) -> Result<(), ImageError> {
    check_same_layout(src, dst)?;

    if row_start > row_end || row_end > src.rows() {
        return Err(ImageError::InvalidRowRange(row_start, row_end, src.rows()));
    }

    let stride = src.row_stride();
    let dst_rows = &mut dst.as_slice_mut()[row_start * stride..row_end * stride];
    convolve_rows(src, dst_rows, kernel, RowRange::new(row_start, row_end));

    Ok(())
}

/// Check that two images have the same size and number of channels.
pub(crate) fn check_same_layout(src: &Image, dst: &Image) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if src.num_channels() != dst.num_channels() {
        return Err(ImageError::ChannelMismatch(
            src.num_channels(),
            dst.num_channels(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::{Kernel3x3, KernelType};

    #[test]
    fn test_sample_pixel_replicates_corner() -> Result<(), Box<dyn std::error::Error>> {
        #[rustfmt::skip]
        let image = Image::new(
            [3, 3].into(),
            1,
            vec![
                1, 2, 3,
                4, 5, 6,
                7, 8, 9,
            ],
        )?;

        // picks the top-left weight only: the (x-1, y-1) neighbour of (0, 0) is (0, 0)
        let top_left = Kernel3x3::new("tl", [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]])?;
        assert_eq!(sample_pixel(&image, 0, 0, 0, &top_left), 1);
        assert_eq!(sample_pixel(&image, 1, 1, 0, &top_left), 1);
        assert_eq!(sample_pixel(&image, 2, 2, 0, &top_left), 5);

        // the (x+1, y+1) neighbour of the bottom-right corner is the corner itself
        let bottom_right =
            Kernel3x3::new("br", [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]])?;
        assert_eq!(sample_pixel(&image, 2, 2, 0, &bottom_right), 9);
        assert_eq!(sample_pixel(&image, 0, 2, 0, &bottom_right), 8);
        assert_eq!(sample_pixel(&image, 2, 0, 0, &bottom_right), 6);

        Ok(())
    }

    #[test]
    fn test_sample_pixel_saturates() -> Result<(), Box<dyn std::error::Error>> {
        let image = Image::from_size_val([2, 2].into(), 1, 200)?;

        let double = Kernel3x3::new("x2", [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]])?;
        assert_eq!(sample_pixel(&image, 0, 0, 0, &double), 255);

        let negate = Kernel3x3::new("neg", [[0.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 0.0]])?;
        assert_eq!(sample_pixel(&image, 1, 1, 0, &negate), 0);

        Ok(())
    }

    #[test]
    fn test_sample_pixel_per_channel() -> Result<(), Box<dyn std::error::Error>> {
        let image = Image::new([1, 1].into(), 3, vec![10, 20, 30])?;
        let blur = KernelType::Blur.kernel();
        assert_eq!(sample_pixel(&image, 0, 0, 0, &blur), 10);
        assert_eq!(sample_pixel(&image, 0, 0, 1, &blur), 20);
        assert_eq!(sample_pixel(&image, 0, 0, 2, &blur), 30);

        Ok(())
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_sample_pixel_out_of_bounds() {
        let image = Image::from_size_val([2, 2].into(), 1, 0).unwrap();
        sample_pixel(&image, 0, 0, 1, &KernelType::Identity.kernel());
    }

    #[test]
    fn test_convolve_range_leaves_other_rows() -> Result<(), Box<dyn std::error::Error>> {
        let src = Image::from_size_val([3, 4].into(), 2, 50)?;
        let mut dst = Image::from_size_val([3, 4].into(), 2, 7)?;

        convolve_range(&src, &mut dst, &KernelType::Identity.kernel(), 1, 3)?;

        for (y, row) in dst.as_slice().chunks_exact(dst.row_stride()).enumerate() {
            let expected = if (1..3).contains(&y) { 50 } else { 7 };
            assert!(row.iter().all(|&v| v == expected), "row {y}: {row:?}");
        }

        Ok(())
    }

    #[test]
    fn test_convolve_range_empty() -> Result<(), Box<dyn std::error::Error>> {
        let src = Image::from_size_val([3, 4].into(), 1, 50)?;
        let mut dst = src.zeros_like();
        convolve_range(&src, &mut dst, &KernelType::Identity.kernel(), 4, 4)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }

    #[test]
    fn test_convolve_range_invalid() -> Result<(), Box<dyn std::error::Error>> {
        let src = Image::from_size_val([3, 4].into(), 1, 0)?;
        let kernel = KernelType::Identity.kernel();

        let mut dst = src.zeros_like();
        assert_eq!(
            convolve_range(&src, &mut dst, &kernel, 3, 5),
            Err(ImageError::InvalidRowRange(3, 5, 4))
        );
        assert_eq!(
            convolve_range(&src, &mut dst, &kernel, 2, 1),
            Err(ImageError::InvalidRowRange(2, 1, 4))
        );

        let mut dst = Image::from_size_val([4, 3].into(), 1, 0)?;
        assert_eq!(
            convolve_range(&src, &mut dst, &kernel, 0, 1),
            Err(ImageError::InvalidImageSize(3, 4, 4, 3))
        );

        let mut dst = Image::from_size_val([3, 4].into(), 3, 0)?;
        assert_eq!(
            convolve_range(&src, &mut dst, &kernel, 0, 1),
            Err(ImageError::ChannelMismatch(1, 3))
        );

        Ok(())
    }
}
