//! The importing-controller seam and the controller used by the binary.

use tracing::{info, warn};

use crate::domain::model::DirectoryRequest;

/// Host collaborator that turns a validated directory list into an import job.
///
/// The call is fire-and-forget: scanning, progress reporting, and failure
/// handling all belong to the implementor.
pub trait ImportingController {
    fn start_importing_document(&mut self, request: DirectoryRequest);
}

impl<C: ImportingController + ?Sized> ImportingController for &mut C {
    fn start_importing_document(&mut self, request: DirectoryRequest) {
        (**self).start_importing_document(request);
    }
}

impl<C: ImportingController + ?Sized> ImportingController for Box<C> {
    fn start_importing_document(&mut self, request: DirectoryRequest) {
        (**self).start_importing_document(request);
    }
}

/// Holds on to the submitted request until the host collects it.
///
/// The binary uses this to hand the document to the output writer once the
/// terminal has been restored.
#[derive(Debug, Default)]
pub struct CapturingController {
    captured: Option<DirectoryRequest>,
}

impl CapturingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Option<&DirectoryRequest> {
        self.captured.as_ref()
    }

    pub fn take(&mut self) -> Option<DirectoryRequest> {
        self.captured.take()
    }
}

impl ImportingController for CapturingController {
    fn start_importing_document(&mut self, request: DirectoryRequest) {
        info!(directories = request.len(), "captured directory import request");
        if self.captured.replace(request).is_some() {
            warn!("replaced an uncollected directory import request");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_controller_keeps_latest_request() {
        let mut controller = CapturingController::new();
        assert!(controller.captured().is_none());

        let request = DirectoryRequest::from_raw(["/a"]).unwrap();
        controller.start_importing_document(request.clone());
        assert_eq!(controller.captured(), Some(&request));

        assert_eq!(controller.take(), Some(request));
        assert!(controller.take().is_none());
    }

    fn forward<C: ImportingController>(mut controller: C, request: DirectoryRequest) {
        controller.start_importing_document(request);
    }

    #[test]
    fn boxed_controllers_forward_requests() {
        let mut boxed: Box<dyn ImportingController> = Box::new(CapturingController::new());
        boxed.start_importing_document(DirectoryRequest::from_raw(["/b"]).unwrap());

        let mut inner = CapturingController::new();
        forward(&mut inner, DirectoryRequest::from_raw(["/c"]).unwrap());
        assert_eq!(inner.take().unwrap().directories(), ["/c"]);
    }
}
