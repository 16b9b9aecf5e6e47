//! rfd-backed picker implementations.
//!
//! These open a native dialog and block the calling thread, so the picker
//! bridge runs them on `spawn_blocking`.

use std::path::Path;

use rfd::FileDialog;

use super::{
    FilePicker, FileSelection, ImagePicker, ImageSelection, PickOutcome, PickerError,
};

/// Native "select one image" dialog.
pub struct DialogImagePicker;

impl ImagePicker for DialogImagePicker {
    fn pick_image(&self) -> Result<PickOutcome<ImageSelection>, PickerError> {
        let picked = FileDialog::new()
            .add_filter("images", &["png", "jpg", "jpeg", "webp", "gif"])
            .set_title("Select Image")
            .pick_file();

        match picked {
            Some(path) => {
                let uri = path_to_uri(&path)?;
                Ok(PickOutcome::Selected(ImageSelection { uri }))
            }
            None => Ok(PickOutcome::Cancelled),
        }
    }
}

/// Native "select one document" dialog.
pub struct DialogFilePicker;

impl FilePicker for DialogFilePicker {
    fn pick_file(&self) -> Result<PickOutcome<FileSelection>, PickerError> {
        let picked = FileDialog::new().set_title("Select Document").pick_file();

        match picked {
            Some(path) => {
                let uri = path_to_uri(&path)?;
                let display_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| uri.clone());
                Ok(PickOutcome::Selected(FileSelection { display_name, uri }))
            }
            None => Ok(PickOutcome::Cancelled),
        }
    }
}

/// Convert a dialog path into the `file://` resource reference stored on
/// message records.
fn path_to_uri(path: &Path) -> Result<String, PickerError> {
    match path.to_str() {
        Some(p) => Ok(format!("file://{}", p)),
        None => Err(PickerError::InvalidPath(
            path.to_string_lossy().into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_uri() {
        let uri = path_to_uri(Path::new("/tmp/photo.png")).unwrap();
        assert_eq!(uri, "file:///tmp/photo.png");
    }
}
