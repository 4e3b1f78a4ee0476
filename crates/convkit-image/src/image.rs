use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use convkit_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an 8-bit image with interleaved channels.
///
/// The pixel data is stored row-major as `(H, W, C)`: the sample for pixel `(x, y)` and
/// channel `ch` lives at `(y * width + x) * channels + ch`. The number of channels is a
/// runtime value so that decoded files of any layout (gray, gray-alpha, rgb, rgba) share
/// the same container.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: ImageSize,
    channels: usize,
    data: Vec<u8>,
}

impl Image {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels per pixel.
    /// * `data` - The pixel data of the image.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the size or the number of channels is zero, or the length of the pixel data does
    /// not match `width * height * channels`, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_image::{Image, ImageSize};
    ///
    /// let image = Image::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    3,
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::EmptyImage(size.width, size.height));
        }

        if channels == 0 {
            return Err(ImageError::InvalidChannelCount(channels));
        }

        // check if the data length matches the image size
        let expected = size.width * size.height * channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels per pixel.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val([10, 20].into(), 3, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.as_slice().len(), 10 * 20 * 3);
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: u8) -> Result<Self, ImageError> {
        let data = vec![val; size.width * size.height * channels];
        Image::new(size, channels, data)
    }

    /// Create a zeroed image with the same size and channels as `self`.
    ///
    /// Used to preallocate the destination of a filtering pass.
    pub fn zeros_like(&self) -> Self {
        Self {
            size: self.size,
            channels: self.channels,
            data: vec![0; self.data.len()],
        }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Number of samples in a single row, i.e. `width * channels`.
    pub fn row_stride(&self) -> usize {
        self.size.width * self.channels
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Compute the buffer offset of a sample.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y` or `ch` fall outside the image. Out of range coordinates are a
    /// caller bug and must never alias a neighbouring sample.
    #[inline]
    pub fn offset(&self, x: usize, y: usize, ch: usize) -> usize {
        assert!(
            x < self.size.width && y < self.size.height && ch < self.channels,
            "sample ({x}, {y}, {ch}) out of bounds for {}x{}x{} image",
            self.size.width,
            self.size.height,
            self.channels
        );
        (y * self.size.width + x) * self.channels + ch
    }

    /// Read a sample without going through the fallible api.
    ///
    /// # Panics
    ///
    /// Panics on out of bounds coordinates, see [`Image::offset`].
    #[inline]
    pub fn sample(&self, x: usize, y: usize, ch: usize) -> u8 {
        self.data[self.offset(x, y, ch)]
    }

    /// Get the pixel data of the image.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    ///
    /// # Returns
    ///
    /// The pixel value at the given coordinates.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<u8, ImageError> {
        self.check_bounds(x, y, ch)?;
        Ok(self.sample(x, y, ch))
    }

    /// Set the pixel value at the given coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    /// * `val` - The value to write.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: u8) -> Result<(), ImageError> {
        self.check_bounds(x, y, ch)?;
        let idx = self.offset(x, y, ch);
        self.data[idx] = val;
        Ok(())
    }

    fn check_bounds(&self, x: usize, y: usize, ch: usize) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, self.channels));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(
            image_size.to_string(),
            "ImageSize { width: 10, height: 20 }"
        );
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            3,
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.row_stride(), 30);

        Ok(())
    }

    #[test]
    fn image_invalid_length() {
        let res = Image::new([2, 2].into(), 3, vec![0u8; 11]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
    }

    #[test]
    fn image_empty() {
        assert_eq!(
            Image::new([0, 4].into(), 1, vec![]),
            Err(ImageError::EmptyImage(0, 4))
        );
        assert_eq!(
            Image::new([4, 4].into(), 0, vec![]),
            Err(ImageError::InvalidChannelCount(0))
        );
    }

    #[test]
    fn image_pixel_access() -> Result<(), ImageError> {
        // 2x2 rgb, channels interleaved per pixel
        let data = (0u8..12).collect::<Vec<_>>();
        let mut image = Image::new([2, 2].into(), 3, data)?;

        assert_eq!(image.get_pixel(0, 0, 0)?, 0);
        assert_eq!(image.get_pixel(1, 0, 2)?, 5);
        assert_eq!(image.get_pixel(0, 1, 1)?, 7);
        assert_eq!(image.offset(1, 1, 2), 11);

        image.set_pixel(1, 1, 0, 42)?;
        assert_eq!(image.sample(1, 1, 0), 42);

        assert_eq!(
            image.get_pixel(2, 0, 0),
            Err(ImageError::PixelIndexOutOfBounds(2, 0, 2, 2))
        );
        assert_eq!(
            image.get_pixel(0, 0, 3),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );

        Ok(())
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn image_offset_out_of_bounds() {
        let image = Image::from_size_val([3, 3].into(), 1, 0).unwrap();
        image.offset(0, 3, 0);
    }

    #[test]
    fn image_zeros_like() -> Result<(), ImageError> {
        let image = Image::from_size_val([4, 3].into(), 4, 9)?;
        let zeros = image.zeros_like();
        assert_eq!(zeros.size(), image.size());
        assert_eq!(zeros.num_channels(), 4);
        assert!(zeros.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }
}
