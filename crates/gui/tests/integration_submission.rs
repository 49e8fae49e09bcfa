//! Integration tests for submitting trails and sending removal notices.

use shared::{GeoPoint, TrailPayload, TRAILS_REMOVED_TABLE, TRAILS_TABLE};
use trailmark_lib::fixtures::RecordingSubmitter;
use trailmark_lib::harness::TestHarness;
use trailmark_lib::state::{SubmissionOutcome, SubmitRejection, TrailId};

fn harness_with_trail() -> (TestHarness, TrailId) {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    (h, t)
}

#[tokio::test]
async fn test_submit_sends_payload_and_marks_trail() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();

    let outcome = h.editor.submit(&submitter).await.unwrap();
    assert!(outcome.is_accepted());

    let payloads = submitter.payloads(TRAILS_TABLE);
    assert_eq!(payloads.len(), 1);
    let payload: TrailPayload = serde_json::from_value(payloads[0].clone()).unwrap();
    assert_eq!(payload.track_id, t.to_string());
    assert!((payload.comp_length - 100.0).abs() < 1e-9);
    assert!(payload.email.is_none());

    let points: Vec<GeoPoint> = payload.points().unwrap();
    assert_eq!(points.len(), 2);
    // Local ENU around (0, 0): +x is east
    assert!(points[0].longitude.abs() < 1e-9);
    assert!(points[1].longitude > 0.0);
    assert!(points[1].latitude.abs() < 1e-6);

    assert!(h.editor.is_submitted(t));
    assert!(!h.editor.submissions().in_flight());
    assert_eq!(h.editor.notifier.last_message(), Some("Trail submitted"));

    let submitted = h.editor.settings.palette.line_submitted;
    for (_, entry) in h.editor.index().segments_of(t) {
        assert_eq!(h.scene().get(entry.line).unwrap().style.color, submitted);
    }
}

#[tokio::test]
async fn test_submitter_id_is_sent_as_email() {
    let (mut h, _) = harness_with_trail();
    h.editor.settings.submission.submitter_id = Some("ranger@example.org".to_string());
    let submitter = RecordingSubmitter::new();

    h.editor.submit(&submitter).await.unwrap();

    assert_eq!(submitter.payloads(TRAILS_TABLE)[0]["email"], "ranger@example.org");
}

#[tokio::test]
async fn test_unchanged_trail_is_not_resubmitted() {
    let (mut h, _) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    let second = h.editor.submit(&submitter).await;

    assert_eq!(second.unwrap_err(), SubmitRejection::Unchanged);
    assert_eq!(submitter.call_count(), 1);
    assert!(h
        .editor
        .notifier
        .last_message()
        .unwrap()
        .contains("already submitted"));
}

#[tokio::test]
async fn test_moved_trail_can_be_submitted_again() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    assert!(h.drag((0.0, 0.0), (0.0, 40.0)));
    assert!(!h.editor.is_submitted(t));

    // Dragging leaves the trail as submit target
    let outcome = h.editor.submit(&submitter).await.unwrap();
    assert!(outcome.is_accepted());
    assert_eq!(submitter.call_count(), 2);
}

#[tokio::test]
async fn test_failed_submission_leaves_trail_unsubmitted() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::failing();

    let outcome = h.editor.submit(&submitter).await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Failed { trail, .. } if trail == t));
    assert!(!h.editor.is_submitted(t));
    assert!(!h.editor.submissions().in_flight());
    assert!(h
        .editor
        .notifier
        .last_message()
        .unwrap()
        .starts_with("Submission failed"));

    // Nothing is retried automatically; a new attempt goes through
    submitter.set_failing(false);
    assert!(h.editor.submit(&submitter).await.unwrap().is_accepted());
    assert_eq!(submitter.call_count(), 2);
}

#[tokio::test]
async fn test_second_submission_while_in_flight_is_rejected() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();

    let ticket = h.editor.begin_submission().unwrap();
    assert!(h.editor.submissions().in_flight());
    assert_eq!(ticket.trail, t);

    assert_eq!(
        h.editor.begin_submission().unwrap_err(),
        SubmitRejection::InFlight
    );

    let reply = ticket.dispatch(&submitter).await;
    assert!(h.editor.finish_submission(reply).is_accepted());
    assert!(!h.editor.submissions().in_flight());
}

#[tokio::test]
async fn test_single_flight_covers_all_trails() {
    let mut h = TestHarness::new();
    let a = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let b = h.draw_trail(&[(0.0, 100.0), (100.0, 100.0)]).unwrap();
    let submitter = RecordingSubmitter::new();

    let ticket = h.editor.begin_submission().unwrap();
    assert_eq!(ticket.trail, b);

    h.click(50.0, 0.0);
    assert_eq!(h.editor.submit_target(), Some(a));
    assert_eq!(
        h.editor.begin_submission().unwrap_err(),
        SubmitRejection::InFlight
    );

    h.editor.finish_submission(ticket.dispatch(&submitter).await);
    assert!(h.editor.submit(&submitter).await.unwrap().is_accepted());
    assert!(h.editor.is_submitted(a));
    assert!(h.editor.is_submitted(b));
}

#[tokio::test]
async fn test_declined_confirmation_cancels_submission() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();

    h.answer(false);
    let result = h.editor.submit(&submitter).await;

    assert_eq!(result.unwrap_err(), SubmitRejection::Cancelled);
    assert_eq!(submitter.call_count(), 0);
    assert!(!h.editor.submissions().in_flight());
    assert!(!h.editor.is_submitted(t));
}

#[tokio::test]
async fn test_confirmation_can_be_turned_off() {
    let (mut h, _) = harness_with_trail();
    h.editor.settings.submission.confirm = false;
    let submitter = RecordingSubmitter::new();

    // A queued "no" is never consumed
    h.answer(false);
    assert!(h.editor.submit(&submitter).await.unwrap().is_accepted());
    assert_eq!(h.editor.notifier.confirmations.len(), 0);
}

#[test]
fn test_nothing_to_submit() {
    let mut h = TestHarness::new();
    assert_eq!(
        h.editor.begin_submission().unwrap_err(),
        SubmitRejection::NoTarget
    );
    assert_eq!(
        h.editor.notifier.last_message(),
        Some("no trail selected for submission")
    );
}

#[tokio::test]
async fn test_removing_submitted_trail_sends_notice() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    h.editor.remove_trail(t).unwrap();
    let results = h.editor.flush_removal_notices(&submitter).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
    let notices = submitter.payloads(TRAILS_REMOVED_TABLE);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["trackId"], t.to_string());
    // Drained once
    assert!(h.editor.take_removal_notices().is_empty());
}

#[tokio::test]
async fn test_demoting_submitted_trail_sends_notice() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    h.middle_click(100.0, 0.0);

    assert_eq!(h.vertex_count(t), 0);
    let notices = h.editor.take_removal_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].track_id, t.to_string());
    assert!(!h.editor.is_submitted(t));
}

#[test]
fn test_removing_unsubmitted_trail_sends_nothing() {
    let (mut h, t) = harness_with_trail();
    h.editor.remove_trail(t).unwrap();
    assert!(h.editor.take_removal_notices().is_empty());
}

#[tokio::test]
async fn test_emptying_resumed_submitted_trail_sends_notice() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    // Resume from the last vertex, delete the other one, then finish
    h.click(100.0, 0.0);
    assert_eq!(h.active_trail(), Some(t));
    h.middle_click(0.0, 0.0);
    h.right_click(100.0, 0.0);

    assert_eq!(h.vertex_count(t), 0);
    let notices = h.editor.take_removal_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].track_id, t.to_string());
    assert!(h.editor.submit_target().is_none());
    assert!(h.editor.submissions().keys().is_empty());
}

#[tokio::test]
async fn test_removing_resumed_and_extended_trail_sends_notice() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    h.click(100.0, 0.0);
    h.click(100.0, 50.0);
    assert_eq!(h.vertex_count(t), 3);
    h.editor.remove_trail(t).unwrap();

    let notices = h.editor.take_removal_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].track_id, t.to_string());
    assert!(h.editor.submissions().keys().is_empty());
}

#[tokio::test]
async fn test_finishing_resumed_trail_sends_no_notice() {
    let (mut h, t) = harness_with_trail();
    let submitter = RecordingSubmitter::new();
    h.editor.submit(&submitter).await.unwrap();

    h.click(100.0, 0.0);
    h.double_click(200.0, 0.0);

    assert_eq!(h.vertex_count(t), 3);
    assert!(h.editor.take_removal_notices().is_empty());
    assert_eq!(h.editor.submit_target(), Some(t));
    assert!(!h.editor.is_submitted(t));
}
