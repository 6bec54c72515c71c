//! Validation and hand-off of the directory list.

use tracing::{info, warn};

use crate::app::controller::ImportingController;
use crate::app::entries::DirectoryEntryList;
use crate::domain::errors::SubmitError;
use crate::domain::model::DirectoryRequest;

/// Where the submission workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Transient while a snapshot is checked; never observed between calls.
    Validating,
    /// The request reached the controller. Terminal.
    Submitted,
    /// The last attempt had no usable directories and the notice is still open.
    ValidationFailed,
}

/// Validates the entry list on submit and forwards a request to the controller.
#[derive(Debug)]
pub struct SubmissionWorkflow<C> {
    controller: C,
    state: SubmissionState,
}

impl<C: ImportingController> SubmissionWorkflow<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn into_controller(self) -> C {
        self.controller
    }

    /// Validate the current rows and, when at least one is non-blank, hand a
    /// fresh request to the controller. Returns the number of directories
    /// submitted.
    ///
    /// On [`SubmitError::EmptyDirectoryList`] the workflow waits in
    /// [`SubmissionState::ValidationFailed`] until [`acknowledge`](Self::acknowledge)
    /// is called. The rows are left untouched either way.
    pub fn submit(&mut self, entries: &DirectoryEntryList) -> Result<usize, SubmitError> {
        match self.state {
            SubmissionState::Submitted => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::ValidationFailed => return Err(SubmitError::NotificationPending),
            SubmissionState::Idle | SubmissionState::Validating => {}
        }

        self.state = SubmissionState::Validating;
        match DirectoryRequest::from_raw(entries.snapshot()) {
            Ok(request) => {
                let count = request.len();
                info!(directories = count, "submitting directory import request");
                self.controller.start_importing_document(request);
                self.state = SubmissionState::Submitted;
                Ok(count)
            }
            Err(err) => {
                warn!(rows = entries.len(), "submission rejected: {err}");
                self.state = SubmissionState::ValidationFailed;
                Err(err)
            }
        }
    }

    /// Dismiss a pending validation notice. Returns `true` when one was pending.
    pub fn acknowledge(&mut self) -> bool {
        if self.state == SubmissionState::ValidationFailed {
            self.state = SubmissionState::Idle;
            true
        } else {
            false
        }
    }
}
