//! Snapshot (still image) loading.

use std::path::Path;

use image::ImageFormat;
use sentinel_models::ImageData;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// A decoded-and-verified still image ready for querying.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub data: ImageData,
    pub width: u32,
    pub height: u32,
}

/// Read an image file, verify it decodes and report its dimensions.
///
/// JPEG and PNG are passed through unchanged; any other format the `image`
/// crate can decode is re-encoded as PNG.
pub async fn load_image(path: impl AsRef<Path>) -> MediaResult<LoadedImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await?;
    let loaded = tokio::task::spawn_blocking(move || decode_image(bytes))
        .await
        .map_err(|e| MediaError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    debug!(
        path = %path.display(),
        width = loaded.width,
        height = loaded.height,
        mime_type = %loaded.data.mime_type,
        "Loaded image"
    );

    Ok(loaded)
}

/// Decode encoded image bytes into a [`LoadedImage`].
pub fn decode_image(bytes: Vec<u8>) -> MediaResult<LoadedImage> {
    let format = image::guess_format(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format)?;
    let (width, height) = (decoded.width(), decoded.height());

    let data = match format {
        ImageFormat::Jpeg => ImageData::jpeg(bytes),
        ImageFormat::Png => ImageData::png(bytes),
        _ => {
            let mut encoded = std::io::Cursor::new(Vec::new());
            decoded.write_to(&mut encoded, ImageFormat::Png)?;
            ImageData::png(encoded.into_inner())
        }
    };

    Ok(LoadedImage {
        data,
        width,
        height,
    })
}
