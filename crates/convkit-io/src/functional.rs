use std::{fs::File, io::BufWriter, path::Path};

use convkit_image::{Image, ImageSize};
use image::{codecs::png::PngEncoder, ColorType, ExtendedColorType, ImageEncoder};

use crate::error::IoError;

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate (jpeg,
/// png, bmp, tga) and keeps the channel layout of the file:
///
/// * gray images have one channel,
/// * gray images with alpha have two channels,
/// * color images have three channels, four with alpha.
///
/// Samples wider than 8 bits are converted to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the decoded pixel data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<Image, IoError> {
    // resolve the file path correctly
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(&file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let (channels, data) = match color {
        ColorType::L8 | ColorType::L16 => (1, img.into_luma8().into_raw()),
        ColorType::La8 | ColorType::La16 => (2, img.into_luma_alpha8().into_raw()),
        c if c.has_alpha() => (4, img.into_rgba8().into_raw()),
        _ => (3, img.into_rgb8().into_raw()),
    };

    log::debug!(
        "decoded {} as {:?} into {} with {} channels",
        file_path.display(),
        color,
        size,
        channels
    );

    Ok(Image::new(size, channels, data)?)
}

/// Writes the given image as a PNG file.
///
/// The color type is chosen from the number of channels of the image.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG image.
/// * `image` - The image to encode.
pub fn write_image_png(file_path: impl AsRef<Path>, image: &Image) -> Result<(), IoError> {
    let color_type = match image.num_channels() {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        c => return Err(IoError::UnsupportedChannels(c)),
    };

    let file = File::create(file_path.as_ref())?;
    let encoder = PngEncoder::new(BufWriter::new(file));
    encoder.write_image(
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        color_type,
    )?;

    Ok(())
}
