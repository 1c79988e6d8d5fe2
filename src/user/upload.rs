//! Local storage for profile photos.
//!
//! Uploads are decoded, cropped to a [`PHOTO_SIZE`] square and re-encoded,
//! then written under the configured upload directory with a random name and
//! served back by the router under [`PUBLIC_PREFIX`].

use crate::error::{AppError, Result};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const PUBLIC_PREFIX: &str = "/uploads/";

/// Edge length of a stored profile photo, in pixels.
pub const PHOTO_SIZE: u32 = 300;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lower-cased extension of `filename` if it is an accepted image type.
pub fn image_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Maps a public URL produced by [`store_image`] back to its file on disk.
/// URLs pointing anywhere else yield `None`.
pub fn local_path(upload_dir: &Path, url: &str) -> Option<PathBuf> {
    let name = url.strip_prefix(PUBLIC_PREFIX)?;
    let file_name = Path::new(name).file_name()?;
    (file_name == name).then(|| upload_dir.join(file_name))
}

fn output_format(ext: &str) -> ImageFormat {
    match ext {
        "png" => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    }
}

/// Decodes `bytes`, fills a `PHOTO_SIZE` square (center crop) and encodes it as `format`.
pub fn normalize_image(bytes: &[u8], format: ImageFormat) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|_| AppError::Validation("Uploaded file is not a valid image".to_string()))?;

    let mut photo = decoded.resize_to_fill(PHOTO_SIZE, PHOTO_SIZE, FilterType::Lanczos3);
    if format == ImageFormat::Jpeg {
        // JPEG has no alpha channel.
        photo = DynamicImage::ImageRgb8(photo.to_rgb8());
    }

    let mut out = Cursor::new(Vec::new());
    photo.write_to(&mut out, format).map_err(|e| {
        tracing::error!("Failed to encode profile photo: {}", e);
        AppError::InternalError
    })?;
    Ok(out.into_inner())
}

pub async fn store_image(upload_dir: &Path, filename: &str, bytes: &[u8]) -> Result<String> {
    let ext = image_extension(filename).ok_or_else(|| {
        AppError::Validation("Only jpg, jpeg and png files are allowed".to_string())
    })?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }

    let format = output_format(&ext);
    let raw = bytes.to_vec();
    let photo = tokio::task::spawn_blocking(move || normalize_image(&raw, format))
        .await
        .map_err(|e| {
            tracing::error!("Image processing task failed: {}", e);
            AppError::InternalError
        })??;

    tokio::fs::create_dir_all(upload_dir).await?;

    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
    tokio::fs::write(upload_dir.join(&stored_name), &photo).await?;

    tracing::debug!(file = %stored_name, size = photo.len(), "stored upload");
    Ok(format!("{PUBLIC_PREFIX}{stored_name}"))
}

/// Best effort: a photo that cannot be removed is only logged.
pub async fn remove_image(upload_dir: &Path, url: &str) {
    let Some(path) = local_path(upload_dir, url) else {
        return;
    };

    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove old profile photo {}: {}", path.display(), e);
    }
}
