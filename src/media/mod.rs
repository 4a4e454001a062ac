//! Image intake for message attachments.
//!
//! Images are stored inline as data URLs. Files over 1 MB are rejected;
//! files over the resize threshold are scaled down to fit
//! [`MAX_DIMENSION`] and re-encoded as JPEG, falling back to the original
//! bytes if that fails.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Largest accepted input file.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Inputs above this size are resized and re-encoded.
pub const RESIZE_THRESHOLD_BYTES: usize = 500 * 1024;

/// Longest edge after resizing, in pixels.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 80;

/// Attachments allowed on a single message.
pub const MAX_IMAGES_PER_MESSAGE: usize = 5;

/// A file that could not be attached.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{name} is larger than 1 MB ({size} bytes)")]
    TooLarge { name: String, size: usize },
    #[error("{name} is not a supported image")]
    Unsupported { name: String },
    #[error("{name} was not attached: at most 5 images per message")]
    TooMany { name: String },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image worker failed: {0}")]
    Worker(String),
}

/// Result of attaching a batch of files.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Data URLs, in input order.
    pub images: Vec<String>,
    /// Files that were images but could not be attached.
    pub errors: Vec<ImageError>,
    /// Files that were not images at all.
    pub skipped: Vec<PathBuf>,
}

/// Builds a `data:` URL for `bytes`.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits a `data:` URL into its MIME type and decoded bytes.
#[must_use]
pub fn decode_data_url(url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload).ok().map(|bytes| (mime, bytes))
}

/// Validates one image and encodes it as a data URL.
///
/// # Errors
///
/// Returns [`ImageError::TooLarge`] over 1 MB and
/// [`ImageError::Unsupported`] when the bytes are not a known image format.
pub fn encode_image(name: &str, bytes: &[u8]) -> Result<String, ImageError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            name: name.to_string(),
            size: bytes.len(),
        });
    }
    let format = image::guess_format(bytes).map_err(|_| ImageError::Unsupported {
        name: name.to_string(),
    })?;

    if bytes.len() > RESIZE_THRESHOLD_BYTES {
        match shrink(bytes) {
            Ok(jpeg) => return Ok(data_url(ImageFormat::Jpeg.to_mime_type(), &jpeg)),
            Err(e) => {
                tracing::warn!(name, error = %e, "resize failed, keeping original image");
            }
        }
    }
    Ok(data_url(format.to_mime_type(), bytes))
}

/// Scales to fit [`MAX_DIMENSION`] and re-encodes as JPEG.
fn shrink(bytes: &[u8]) -> image::ImageResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?;
    Ok(out.into_inner())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Bytes read to identify a file's format.
const SNIFF_BYTES: u64 = 64;

/// Reads the leading bytes of `path` and reports its size.
fn sniff(path: &Path) -> std::io::Result<(Vec<u8>, u64)> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut header = Vec::new();
    file.take(SNIFF_BYTES).read_to_end(&mut header)?;
    Ok((header, size))
}

/// Attaches files in order until `room` images have been accepted.
///
/// Non-images are skipped without an error; oversized or unreadable files
/// are reported and the rest of the batch continues. Only the header of a
/// file is read until it is known to be an image within the size limit.
#[must_use]
pub fn process_files(paths: &[PathBuf], room: usize) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        let name = display_name(path);
        let read_error = |source| ImageError::Read {
            path: path.clone(),
            source,
        };
        let (header, size) = match sniff(path) {
            Ok(found) => found,
            Err(source) => {
                outcome.errors.push(read_error(source));
                continue;
            }
        };
        if image::guess_format(&header).is_err() {
            tracing::debug!(path = %path.display(), "skipping non-image file");
            outcome.skipped.push(path.clone());
            continue;
        }
        if outcome.images.len() >= room {
            outcome.errors.push(ImageError::TooMany { name });
            continue;
        }
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        if size > MAX_IMAGE_BYTES {
            outcome.errors.push(ImageError::TooLarge { name, size });
            continue;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => {
                outcome.errors.push(read_error(source));
                continue;
            }
        };
        match encode_image(&name, &bytes) {
            Ok(url) => outcome.images.push(url),
            Err(e) => outcome.errors.push(e),
        }
    }

    tracing::debug!(
        attached = outcome.images.len(),
        failed = outcome.errors.len(),
        skipped = outcome.skipped.len(),
        "image batch processed"
    );
    outcome
}

/// Runs [`process_files`] on the blocking pool.
pub async fn load_images(paths: Vec<PathBuf>, room: usize) -> BatchOutcome {
    match tokio::task::spawn_blocking(move || process_files(&paths, room)).await {
        Ok(outcome) => outcome,
        Err(e) => BatchOutcome {
            errors: vec![ImageError::Worker(e.to_string())],
            ..BatchOutcome::default()
        },
    }
}

/// Appends decoded images to `pending`, keeping at most
/// [`MAX_IMAGES_PER_MESSAGE`]. Returns how many were dropped.
pub fn merge_pending(pending: &mut Vec<String>, images: Vec<String>) -> usize {
    let room = MAX_IMAGES_PER_MESSAGE.saturating_sub(pending.len());
    let dropped = images.len().saturating_sub(room);
    pending.extend(images.into_iter().take(room));
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use image::{GenericImageView, RgbImage};
    use tempfile::TempDir;

    /// Deterministic noise so PNG compression cannot shrink the file.
    fn noise_png(width: u32, height: u32) -> Result<Vec<u8>> {
        let mut state: u32 = 0x1234_5678;
        let img = RgbImage::from_fn(width, height, |_, _| {
            let mut px = [0u8; 3];
            for channel in &mut px {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *channel = state.to_be_bytes()[0];
            }
            image::Rgb(px)
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    #[test]
    fn small_image_is_kept_as_is() -> Result<()> {
        let png = noise_png(8, 8)?;
        let url = encode_image("tiny.png", &png)?;
        assert!(url.starts_with("data:image/png;base64,"));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, png);
        Ok(())
    }

    #[test]
    fn large_image_is_resized_to_jpeg() -> Result<()> {
        let png = noise_png(1000, 200)?;
        assert!(png.len() > RESIZE_THRESHOLD_BYTES && png.len() <= MAX_IMAGE_BYTES);

        let url = encode_image("wide.png", &png)?;
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        let decoded = image::load_from_memory(&bytes)?;
        assert_eq!(decoded.dimensions(), (800, 160));
        Ok(())
    }

    #[test]
    fn oversized_input_is_rejected() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            encode_image("huge.png", &bytes),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn unknown_bytes_are_unsupported() {
        assert!(matches!(
            encode_image("notes.txt", b"plain text"),
            Err(ImageError::Unsupported { .. })
        ));
    }

    #[test]
    fn batch_skips_non_images_and_reports_failures() -> Result<()> {
        let temp = TempDir::new()?;
        let good = temp.path().join("good.png");
        let text = temp.path().join("readme.txt");
        let missing = temp.path().join("missing.png");
        std::fs::write(&good, noise_png(4, 4)?)?;
        std::fs::write(&text, "hello")?;

        let outcome = process_files(&[text.clone(), good, missing], 5);

        assert_eq!(outcome.images.len(), 1);
        assert_eq!(outcome.skipped, vec![text]);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], ImageError::Read { .. }));
        Ok(())
    }

    #[test]
    fn batch_checks_size_and_format_before_reading() -> Result<()> {
        let temp = TempDir::new()?;

        // Valid PNG header followed by a sparse tail past the limit.
        let big = temp.path().join("big.png");
        let mut png = noise_png(2, 2)?;
        png.truncate(16);
        std::fs::write(&big, &png)?;
        File::options().write(true).open(&big)?.set_len(64 * 1024 * 1024)?;

        let iso = temp.path().join("disk.iso");
        std::fs::write(&iso, "CD001 volume descriptor")?;
        File::options().write(true).open(&iso)?.set_len(1024 * 1024 * 1024)?;

        let outcome = process_files(&[big, iso.clone()], 5);

        assert!(outcome.images.is_empty());
        assert_eq!(outcome.skipped, vec![iso]);
        assert!(matches!(
            outcome.errors[..],
            [ImageError::TooLarge { size, .. }] if size == 64 * 1024 * 1024
        ));
        Ok(())
    }

    #[test]
    fn batch_stops_accepting_at_room() -> Result<()> {
        let temp = TempDir::new()?;
        let mut paths = Vec::new();
        for i in 0..3 {
            let path = temp.path().join(format!("{i}.png"));
            std::fs::write(&path, noise_png(2, 2)?)?;
            paths.push(path);
        }

        let outcome = process_files(&paths, 2);
        assert_eq!(outcome.images.len(), 2);
        assert!(matches!(outcome.errors[..], [ImageError::TooMany { .. }]));
        Ok(())
    }

    #[test]
    fn merge_caps_pending_list() {
        let mut pending = vec!["a".to_string(); 4];
        let dropped = merge_pending(&mut pending, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(pending.len(), MAX_IMAGES_PER_MESSAGE);
        assert_eq!(pending[4], "b");
        assert_eq!(dropped, 1);
    }

    #[tokio::test]
    async fn async_loading_matches_sync() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("one.png");
        std::fs::write(&path, noise_png(3, 3)?)?;

        let outcome = load_images(vec![path], MAX_IMAGES_PER_MESSAGE).await;
        assert_eq!(outcome.images.len(), 1);
        assert!(outcome.errors.is_empty());
        Ok(())
    }
}
