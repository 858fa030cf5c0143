use std::path::Path;

use checker_core::PreviewArtifact;

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Longest edge of the generated thumbnail, in pixels.
    pub max_dimension: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { max_dimension: 256 }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to decode image: {message}")]
    Decode { message: String },
}

/// Decode encoded image bytes into a thumbnail no larger than `max_dimension` on either edge.
/// Images already within bounds are kept at their original size.
pub fn decode_preview(
    bytes: &[u8],
    settings: &PreviewSettings,
) -> Result<PreviewArtifact, PreviewError> {
    let image = image::load_from_memory(bytes).map_err(|err| PreviewError::Decode {
        message: err.to_string(),
    })?;

    let (source_width, source_height) = (image.width(), image.height());
    let bound = settings.max_dimension.max(1);
    let thumbnail = if source_width > bound || source_height > bound {
        image.thumbnail(bound, bound).to_rgba8()
    } else {
        image.to_rgba8()
    };

    Ok(PreviewArtifact {
        source_width,
        source_height,
        thumbnail_width: thumbnail.width(),
        thumbnail_height: thumbnail.height(),
        rgba: thumbnail.into_raw(),
    })
}

/// Read a file and decode it off the async executor.
pub async fn load_preview(
    path: &Path,
    settings: &PreviewSettings,
) -> Result<PreviewArtifact, PreviewError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| PreviewError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

    let settings = settings.clone();
    tokio::task::spawn_blocking(move || decode_preview(&bytes, &settings))
        .await
        .map_err(|err| PreviewError::Decode {
            message: err.to_string(),
        })?
}
