use dirimport::app::controller::ImportingController;
use dirimport::app::entries::DirectoryEntryList;
use dirimport::app::submission::{SubmissionState, SubmissionWorkflow};
use dirimport::domain::errors::SubmitError;
use dirimport::domain::model::DirectoryRequest;

#[derive(Debug, Default)]
struct RecordingController {
    requests: Vec<DirectoryRequest>,
}

impl ImportingController for RecordingController {
    fn start_importing_document(&mut self, request: DirectoryRequest) {
        self.requests.push(request);
    }
}

fn submit(values: &[&str]) -> (Result<usize, SubmitError>, RecordingController) {
    let entries = DirectoryEntryList::with_values(values.iter().copied());
    let mut workflow = SubmissionWorkflow::new(RecordingController::default());
    let result = workflow.submit(&entries);
    (result, workflow.into_controller())
}

#[test]
fn single_directory_among_blank_rows_is_forwarded() {
    let (result, controller) = submit(&["/data/a", "", "  "]);
    assert_eq!(result, Ok(1));
    assert_eq!(controller.requests.len(), 1);
    assert_eq!(controller.requests[0].directories(), ["/data/a"]);
}

#[test]
fn blank_rows_only_produce_no_request() {
    let (result, controller) = submit(&["", "   "]);
    assert_eq!(result, Err(SubmitError::EmptyDirectoryList));
    assert!(controller.requests.is_empty());
}

#[test]
fn two_added_rows_give_three_removable_rows() {
    let mut entries = DirectoryEntryList::new();
    entries.add_row();
    entries.add_row();
    assert_eq!(entries.len(), 3);

    let ids: Vec<_> = entries.entries().iter().map(|entry| entry.id()).collect();
    for (index, id) in ids.iter().enumerate() {
        entries.set_value(*id, format!("/dir/{index}"));
    }
    assert_eq!(entries.snapshot(), vec!["/dir/0", "/dir/1", "/dir/2"]);

    for id in ids {
        assert!(entries.remove_row(id));
    }
    assert!(entries.is_empty());
}

#[test]
fn padded_duplicates_are_trimmed_but_kept() {
    let (_, controller) = submit(&[" /x/y ", "/x/y"]);
    assert_eq!(controller.requests[0].directories(), ["/x/y", "/x/y"]);
}

#[test]
fn order_survives_add_and_remove_history() {
    let mut entries = DirectoryEntryList::with_values(["/one", "/two"]);
    let third = entries.add_row();
    entries.set_value(third, "/three");
    let first = entries.first_id().unwrap();
    entries.remove_row(first);
    let fourth = entries.add_row();
    entries.set_value(fourth, " /four");

    let mut workflow = SubmissionWorkflow::new(RecordingController::default());
    assert_eq!(workflow.submit(&entries), Ok(3));
    assert_eq!(workflow.state(), SubmissionState::Submitted);
    assert_eq!(
        workflow.controller().requests[0].directories(),
        ["/two", "/three", "/four"]
    );
}
