use crate::session::anchors::PlaneAnchorId;
use thiserror::Error;

/// Recoverable failures raised by the plane registry and placement paths.
/// None of these terminate the process; callers log and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// An operation referenced a plane handle with no live record.
    #[error("no tracked plane for anchor {0:?}")]
    PlaneNotFound(PlaneAnchorId),

    /// No valid world location could be derived for a screen point.
    /// Surfaced to the user as a transient "cannot place" message.
    #[error("no valid placement location for the given screen point")]
    PlacementUnavailable,

    /// The camera has no usable pose this frame. Operations become no-ops.
    #[error("camera pose unavailable")]
    PoseUnavailable,
}

/// Catalog loading failures. Fatal at startup: the element catalog cannot
/// safely default, so the app reports and exits before any session starts.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed entry, including any missing required field.
    #[error("malformed catalog entry: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries within one category share a model name.
    #[error("duplicate model `{model}` in category `{category}`")]
    DuplicateModel { model: String, category: String },
}
