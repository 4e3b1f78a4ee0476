/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has a zero width or height.
    #[error("Image size must be non zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when the number of channels is zero.
    #[error("Number of channels must be non zero, got {0}")]
    InvalidChannelCount(usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the source and destination sizes do not match.
    #[error("Image size ({0}x{1}) does not match the destination size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the source and destination channel counts do not match.
    #[error("Number of channels ({0}) does not match the destination channels ({1})")]
    ChannelMismatch(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a row range is reversed or exceeds the image height.
    #[error("Row range [{0}, {1}) is not valid for an image with {2} rows")]
    InvalidRowRange(usize, usize, usize),
}
