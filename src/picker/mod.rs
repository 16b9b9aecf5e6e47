//! Attachment picker adapters.
//!
//! Boundary wrappers around the OS-level image/file selection dialogs. The
//! adapters return an explicit outcome so the caller decides what to do with
//! a failure; user cancellation is an outcome, not an error.

mod dialog;

pub use dialog::{DialogFilePicker, DialogImagePicker};

use thiserror::Error;

/// Failure reported by the OS dialog layer.
#[derive(Debug, Error)]
pub enum PickerError {
    /// The dialog returned a path we cannot represent as a resource uri.
    #[error("selected path is not valid UTF-8: {0}")]
    InvalidPath(String),
    /// The dialog backend itself failed (display server unavailable, etc.).
    #[error("picker backend failed: {0}")]
    Backend(String),
}

/// Result of one picker round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome<T> {
    Selected(T),
    /// The user dismissed the dialog. Not an error; no state changes.
    Cancelled,
}

/// A picked image: a local resource reference, nothing is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    pub uri: String,
}

/// A picked document: display name plus resource reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub display_name: String,
    pub uri: String,
}

/// Adapter over the OS "select one image" surface.
pub trait ImagePicker: Send + Sync {
    fn pick_image(&self) -> Result<PickOutcome<ImageSelection>, PickerError>;
}

/// Adapter over the OS "select one document" surface.
pub trait FilePicker: Send + Sync {
    fn pick_file(&self) -> Result<PickOutcome<FileSelection>, PickerError>;
}
