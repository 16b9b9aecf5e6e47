//! Picker bridge: runs attachment dialogs off the UI event loop.
//!
//! Uses an mpsc channel pair. The TUI sends `PickerRequest` values, and a
//! background tokio task executes the blocking dialog on `spawn_blocking`
//! and sends a single `PickerEvent` back. The screen stays responsive while
//! a dialog is open, and each completion is applied to state as one event.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::picker::{
    FilePicker, FileSelection, ImagePicker, ImageSelection, PickOutcome, PickerError,
};

/// Requests sent from the TUI event loop to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerRequest {
    Image,
    File,
}

/// Completion events from the bridge back to the TUI.
pub enum PickerEvent {
    Image(Result<PickOutcome<ImageSelection>, PickerError>),
    File(Result<PickOutcome<FileSelection>, PickerError>),
}

/// Handle for interacting with the bridge from the TUI side.
pub struct PickerBridge {
    req_tx: mpsc::UnboundedSender<PickerRequest>,
    event_rx: mpsc::UnboundedReceiver<PickerEvent>,
}

impl PickerBridge {
    /// Start the bridge with the given adapters. Spawns the processing task.
    pub fn start<I, F>(image_picker: I, file_picker: F) -> Self
    where
        I: ImagePicker + 'static,
        F: FilePicker + 'static,
    {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(bridge_loop(
            req_rx,
            event_tx,
            Arc::new(image_picker),
            Arc::new(file_picker),
        ));

        Self { req_tx, event_rx }
    }

    /// Send a request to the bridge (non-blocking).
    pub fn request(&self, req: PickerRequest) {
        if self.req_tx.send(req).is_err() {
            tracing::error!("picker bridge closed -- request dropped");
        }
    }

    /// Receive the next completion event.
    ///
    /// Suspends until an event is available; `None` only when the bridge
    /// task is gone. Designed to sit inside `tokio::select!`.
    pub async fn recv(&mut self) -> Option<PickerEvent> {
        self.event_rx.recv().await
    }
}

/// Background loop that runs one dialog per request.
async fn bridge_loop(
    mut req_rx: mpsc::UnboundedReceiver<PickerRequest>,
    event_tx: mpsc::UnboundedSender<PickerEvent>,
    image_picker: Arc<dyn ImagePicker>,
    file_picker: Arc<dyn FilePicker>,
) {
    while let Some(req) = req_rx.recv().await {
        let event_tx = event_tx.clone();
        match req {
            PickerRequest::Image => {
                let picker = Arc::clone(&image_picker);
                tokio::spawn(async move {
                    let result = tokio::task::spawn_blocking(move || picker.pick_image())
                        .await
                        .unwrap_or_else(|e| Err(PickerError::Backend(e.to_string())));
                    let _ = event_tx.send(PickerEvent::Image(result));
                });
            }
            PickerRequest::File => {
                let picker = Arc::clone(&file_picker);
                tokio::spawn(async move {
                    let result = tokio::task::spawn_blocking(move || picker.pick_file())
                        .await
                        .unwrap_or_else(|e| Err(PickerError::Backend(e.to_string())));
                    let _ = event_tx.send(PickerEvent::File(result));
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeImagePicker;

    impl ImagePicker for FakeImagePicker {
        fn pick_image(&self) -> Result<PickOutcome<ImageSelection>, PickerError> {
            Ok(PickOutcome::Selected(ImageSelection {
                uri: "file:///tmp/fake.png".to_string(),
            }))
        }
    }

    struct CancellingFilePicker;

    impl FilePicker for CancellingFilePicker {
        fn pick_file(&self) -> Result<PickOutcome<FileSelection>, PickerError> {
            Ok(PickOutcome::Cancelled)
        }
    }

    #[test]
    fn test_bridge_round_trip() {
        tokio_test::block_on(async {
            let mut bridge = PickerBridge::start(FakeImagePicker, CancellingFilePicker);

            bridge.request(PickerRequest::Image);
            match bridge.recv().await {
                Some(PickerEvent::Image(Ok(PickOutcome::Selected(sel)))) => {
                    assert_eq!(sel.uri, "file:///tmp/fake.png");
                }
                _ => panic!("expected a selected image event"),
            }

            bridge.request(PickerRequest::File);
            match bridge.recv().await {
                Some(PickerEvent::File(Ok(PickOutcome::Cancelled))) => {}
                _ => panic!("expected a cancelled file event"),
            }
        });
    }
}
