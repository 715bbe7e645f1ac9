//! Writing generated images to disk.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use festoon_core::generation::GeneratedImage;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image {index} is not valid base64: {source}")]
    Decode {
        index: usize,
        source: base64::DecodeError,
    },
}

/// Decode a `data:image/<subtype>;base64,...` URL into its file extension and bytes.
///
/// Returns `Ok(None)` for anything that is not a base64 data URL of a known
/// raster format. The extension comes from a fixed table, never from the URL.
pub fn decode_data_url(
    url: &str,
) -> Result<Option<(&'static str, Vec<u8>)>, base64::DecodeError> {
    let Some((header, payload)) = url
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(','))
    else {
        return Ok(None);
    };
    let Some(subtype) = header.strip_suffix(";base64") else {
        return Ok(None);
    };

    let ext = match subtype {
        "png" => "png",
        "jpeg" => "jpg",
        "webp" => "webp",
        "gif" => "gif",
        _ => return Ok(None),
    };
    Ok(Some((ext, BASE64.decode(payload.trim())?)))
}

/// File name for an image: slot index plus a slug of its decoration type.
pub fn file_name(image: &GeneratedImage, ext: &str) -> String {
    let slug: String = image
        .decoration_type
        .label()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{:02}-{slug}.{ext}", image.index)
}

/// Write every data-URL image into `dir`, creating it if needed.
///
/// Remote (`http`) images and unknown formats are skipped. Returns the paths written.
pub fn write_images(dir: &Path, images: &[GeneratedImage]) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(images.len());
    for image in images {
        let decoded = decode_data_url(&image.image).map_err(|source| OutputError::Decode {
            index: image.index,
            source,
        })?;
        let Some((ext, bytes)) = decoded else {
            tracing::info!(index = image.index, "Skipping image without a supported data URL");
            continue;
        };

        let path = dir.join(file_name(image, ext));
        std::fs::write(&path, bytes).map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Image written");
        written.push(path);
    }
    Ok(written)
}
