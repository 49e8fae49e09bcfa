//! Integration tests for drawing and editing trails through the harness.
//!
//! The harness uses an identity plan view, so gesture coordinates are also
//! the ground coordinates of the vertices they create.

use trailmark_lib::fixtures::right_angle;
use trailmark_lib::harness::TestHarness;
use trailmark_lib::scene::{Phase, Role};
use trailmark_lib::state::{EditorSettings, TrailId};
use trailmark_lib::validation::TrailValidator;

fn assert_valid(h: &TestHarness) {
    let errors = TrailValidator::new(&h.editor).validate_all();
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
}

fn line_colors(h: &TestHarness, trail: TrailId) -> Vec<[u8; 3]> {
    h.editor
        .index()
        .segments_of(trail)
        .into_iter()
        .map(|(_, entry)| h.scene().get(entry.line).unwrap().style.color)
        .collect()
}

#[test]
fn test_three_point_trail_labels() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&right_angle((0.0, 0.0), 10.0)).unwrap();

    assert_eq!(h.labels_of(t), vec!["a0: 30.00 m", "b0: 40.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 70.00 m"));
    assert_eq!(h.editor.submit_target(), Some(t));
    assert_valid(&h);
}

#[test]
fn test_second_trail_gets_its_own_label_number() {
    let mut h = TestHarness::new();
    let first = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let second = h.draw_trail(&[(0.0, 100.0), (50.0, 100.0)]).unwrap();

    assert_ne!(first, second);
    assert_eq!(h.labels_of(first), vec!["a0: 100.00 m"]);
    assert_eq!(h.labels_of(second), vec!["a1: 50.00 m"]);
    assert_eq!(h.trail_count(), 2);
    assert_valid(&h);
}

#[test]
fn test_long_trail_uses_kilometers() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (800.0, 0.0), (1500.0, 0.0)]).unwrap();
    assert_eq!(h.labels_of(t), vec!["a0: 800.00 m", "b0: 700.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 1.50 km"));
}

#[test]
fn test_remove_interior_vertex_reconnects_neighbours() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (30.0, 0.0), (30.0, 40.0)]).unwrap();

    h.middle_click(30.0, 0.0);

    assert_eq!(h.positions(t), vec![(0.0, 0.0), (30.0, 40.0)]);
    assert_eq!(h.labels_of(t), vec!["a0: 50.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 50.00 m"));
    assert_eq!(h.editor.index().segment_count(), 1);
    assert_valid(&h);
}

#[test]
fn test_remove_endpoint_drops_its_segment_and_relabels() {
    let mut h = TestHarness::new();
    let t = h
        .draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0), (200.0, 50.0)])
        .unwrap();

    h.middle_click(0.0, 0.0);

    assert_eq!(h.positions(t), vec![(100.0, 0.0), (200.0, 0.0), (200.0, 50.0)]);
    assert_eq!(h.labels_of(t), vec!["a0: 100.00 m", "b0: 50.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 150.00 m"));
    assert_valid(&h);
}

#[test]
fn test_declined_confirmation_keeps_vertex() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (30.0, 0.0), (30.0, 40.0)]).unwrap();

    h.answer(false);
    h.middle_click(30.0, 0.0);

    assert_eq!(h.vertex_count(t), 3);
    assert_eq!(h.labels_of(t).len(), 2);
    assert!(h.messages().is_empty());
}

#[test]
fn test_removing_down_to_one_vertex_empties_the_trail() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    h.middle_click(0.0, 0.0);

    assert_eq!(h.vertex_count(t), 0);
    assert_eq!(h.trail_count(), 0);
    assert!(h.total_label(t).is_none());
    assert!(h.editor.submit_target().is_none());
    assert_eq!(h.editor.index().handle_count(), 0);
    assert!(h.scene().is_empty());
}

#[test]
fn test_pruning_removes_emptied_trails() {
    let mut settings = EditorSettings::default();
    settings.drawing.prune_empty_trails = true;
    let mut h = TestHarness::with_settings(settings);
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    h.middle_click(100.0, 0.0);

    assert!(h.editor.store().get(t).is_none());
    assert!(h.editor.store().is_empty());
}

#[test]
fn test_remove_vertex_while_drawing() {
    let mut h = TestHarness::new();
    h.click(0.0, 0.0);
    h.click(100.0, 0.0);
    h.click(200.0, 0.0);
    let t = h.active_trail().unwrap();

    h.middle_click(100.0, 0.0);
    assert_eq!(h.active_trail(), Some(t));
    assert_eq!(h.positions(t), vec![(0.0, 0.0), (200.0, 0.0)]);

    h.double_click(300.0, 0.0);
    assert!(h.active_trail().is_none());
    assert_eq!(h.labels_of(t), vec!["a0: 200.00 m", "b0: 100.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 300.00 m"));
    assert_valid(&h);
}

#[test]
fn test_reconnect_on_resumed_trail_stays_pending_until_finish() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    h.click(200.0, 0.0);
    h.click(300.0, 0.0);
    h.middle_click(200.0, 0.0);
    assert_eq!(h.active_trail(), Some(t));

    let phases: Vec<Phase> = h
        .editor
        .index()
        .segments_of(t)
        .into_iter()
        .map(|(_, entry)| entry.phase)
        .collect();
    assert_eq!(phases, vec![Phase::Committed, Phase::Pending]);
    assert_eq!(h.labels_of(t), vec!["a0: 100.00 m", "b0: 200.00 m"]);

    h.right_click(300.0, 0.0);
    assert!(h
        .editor
        .index()
        .segments_of(t)
        .iter()
        .all(|(_, entry)| entry.phase == Phase::Committed));
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 300.00 m"));
    assert_valid(&h);
}

#[test]
fn test_trail_with_one_point_is_discarded_on_finish() {
    let mut h = TestHarness::new();
    h.click(0.0, 0.0);
    // Finishing on top of the only vertex adds nothing
    h.right_click(0.0, 0.0);

    assert!(h.active_trail().is_none());
    assert_eq!(h.trail_count(), 0);
    assert!(h.scene().is_empty());
}

#[test]
fn test_rubber_band_follows_pointer_while_drawing() {
    let mut h = TestHarness::new();
    h.click(0.0, 0.0);
    h.pointer_move(40.0, 0.0);
    h.pointer_move(50.0, 10.0);

    assert!(h.editor.index().preview().is_some());
    assert_eq!(h.scene().count_tagged("trail_line_moving"), 1);

    h.double_click(60.0, 0.0);
    assert!(h.editor.index().preview().is_none());
    assert_eq!(h.scene().count_tagged("trail_line_moving"), 0);
}

#[test]
fn test_pending_primitives_are_promoted_on_finish() {
    let mut h = TestHarness::new();
    h.click(0.0, 0.0);
    h.click(100.0, 0.0);
    assert_eq!(h.scene().count_tagged("trail_line_pending"), 1);
    assert_eq!(h.scene().count_tagged("trail_label_total"), 0);

    h.double_click(100.0, 100.0);
    assert_eq!(h.scene().count_tagged("trail_line_pending"), 0);
    assert_eq!(h.scene().count_tagged("trail_line"), 2);
    assert_eq!(h.scene().count_tagged("trail_label_total"), 1);
}

#[test]
fn test_vertex_too_close_to_any_trail_is_rejected() {
    let mut settings = EditorSettings::default();
    settings.drawing.proximity_threshold = 20.0;
    let mut h = TestHarness::with_settings(settings);
    h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    // Outside the pick radius of the trail, inside the proximity threshold
    h.click(112.0, 0.0);

    assert!(h.active_trail().is_none());
    assert_eq!(h.trail_count(), 1);
    assert!(h.messages().last().unwrap().contains("within 20"));
}

#[test]
fn test_insert_vertex_cascades_labels() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    h.double_click(50.0, 0.0);
    assert!(h.editor.armed_segment().is_some());
    assert_eq!(h.scene().count_tagged("trail_line"), 2);

    h.click(50.0, 10.0);

    assert!(h.editor.armed_segment().is_none());
    assert_eq!(
        h.positions(t),
        vec![(0.0, 0.0), (50.0, 10.0), (100.0, 0.0), (200.0, 0.0)]
    );
    assert_eq!(
        h.labels_of(t),
        vec!["a0: 50.99 m", "b0: 50.99 m", "c0: 100.00 m"]
    );
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 201.98 m"));
    assert_valid(&h);
}

#[test]
fn test_insert_too_close_keeps_add_mode() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    h.double_click(50.0, 0.0);
    h.click(0.1, 0.0);

    assert!(h.editor.armed_segment().is_some());
    assert_eq!(h.vertex_count(t), 2);
    assert!(!h.messages().is_empty());

    h.right_click(0.0, 0.0);
    assert!(h.editor.armed_segment().is_none());
}

#[test]
fn test_add_mode_blocks_other_gestures() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    h.double_click(150.0, 0.0);
    // Removal is refused while a segment is armed
    h.middle_click(100.0, 0.0);
    assert_eq!(h.vertex_count(t), 3);
    assert!(!h.editor.is_dragging());

    h.editor.exit_add_mode();
    h.middle_click(100.0, 0.0);
    assert_eq!(h.vertex_count(t), 2);
}

#[test]
fn test_drag_endpoint_moves_vertex() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let before = h.editor.store().get(t).unwrap().fingerprint();

    assert!(h.drag((0.0, 0.0), (0.0, 60.0)));

    assert_eq!(h.positions(t), vec![(0.0, 60.0), (100.0, 0.0)]);
    assert_eq!(h.labels_of(t), vec!["a0: 116.62 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 116.62 m"));
    assert_ne!(h.editor.store().get(t).unwrap().fingerprint(), before);
    assert_eq!(h.editor.index().transient_count(), 0);
    assert_eq!(h.scene().count_tagged("trail_point_moving"), 0);
    assert!(h.scene().camera_navigation());
    assert_valid(&h);
}

#[test]
fn test_drag_interior_vertex_updates_both_segments() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    assert!(h.drag((100.0, 0.0), (100.0, 50.0)));

    assert_eq!(h.labels_of(t), vec!["a0: 111.80 m", "b0: 111.80 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 223.61 m"));
    assert_valid(&h);
}

#[test]
fn test_drag_shows_moving_geometry_until_release() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    assert!(h.editor.pointer_down(glam::DVec2::new(100.0, 0.0)));
    assert!(!h.scene().camera_navigation());
    h.pointer_move(100.0, 30.0);

    assert!(h.editor.is_dragging());
    assert_eq!(h.scene().count_tagged("trail_point_moving"), 1);
    assert_eq!(h.scene().count_tagged("trail_line_moving"), 2);
    // The originals are hidden, not deleted
    assert_eq!(h.editor.index().segments_of(t).len(), 2);
    assert_eq!(h.scene().count_visible(Role::Line), 2);
    assert_eq!(h.scene().count_visible(Role::Point), 3);

    assert!(h.editor.pointer_up(glam::DVec2::new(100.0, 30.0)));
    assert_eq!(h.scene().count_tagged("trail_line_moving"), 0);
    assert_eq!(h.positions(t)[1], (100.0, 30.0));
}

#[test]
fn test_small_drag_is_not_a_move() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    assert!(!h.drag((100.0, 0.0), (102.0, 0.0)));
    assert_eq!(h.positions(t), vec![(0.0, 0.0), (100.0, 0.0)]);
    assert!(h.scene().camera_navigation());
}

#[test]
fn test_drag_only_changes_adjacent_segments() {
    let mut h = TestHarness::new();
    let t = h
        .draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0), (300.0, 0.0)])
        .unwrap();
    let before = h.distances(t);
    assert_eq!(before, vec![100.0, 100.0, 100.0]);

    assert!(h.drag((0.0, 0.0), (0.0, 50.0)));
    let after = h.distances(t);
    assert!((after[0] - 111.803).abs() < 1e-3);
    assert_eq!(after[1..], before[1..]);

    // Interior vertex: its two segments change, the far one does not
    assert!(h.drag((200.0, 0.0), (200.0, 40.0)));
    let moved = h.distances(t);
    assert_eq!(moved[0], after[0]);
    assert_ne!(moved[1], after[1]);
    assert_ne!(moved[2], after[2]);
    assert_eq!(h.labels_of(t)[0], "a0: 111.80 m");
    assert_valid(&h);
}

#[test]
fn test_drag_onto_another_vertex_is_rolled_back() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]).unwrap();

    assert!(h.drag((0.0, 0.0), (100.1, 0.0)));

    assert_eq!(h.positions(t)[0], (0.0, 0.0));
    assert_eq!(h.labels_of(t), vec!["a0: 100.00 m", "b0: 100.00 m"]);
    assert!(!h.messages().is_empty());
    assert_valid(&h);
}

#[test]
fn test_resume_from_last_vertex_appends() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    h.click(100.0, 0.0);
    assert_eq!(h.active_trail(), Some(t));
    assert!(h.total_label(t).is_none());

    h.double_click(100.0, 50.0);
    assert_eq!(h.positions(t), vec![(0.0, 0.0), (100.0, 0.0), (100.0, 50.0)]);
    assert_eq!(h.labels_of(t), vec!["a0: 100.00 m", "b0: 50.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 150.00 m"));
}

#[test]
fn test_resume_from_first_vertex_prepends() {
    let mut h = TestHarness::new();
    let t = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();

    h.click(0.0, 0.0);
    assert!(h.editor.active_edit().unwrap().reverse);

    h.click(-100.0, 0.0);
    h.right_click(-100.0, 0.0);

    assert_eq!(h.positions(t), vec![(-100.0, 0.0), (0.0, 0.0), (100.0, 0.0)]);
    assert_eq!(h.labels_of(t), vec!["a0: 100.00 m", "b0: 100.00 m"]);
    assert_eq!(h.total_label(t).as_deref(), Some("Total: 200.00 m"));
    assert_valid(&h);
}

#[test]
fn test_click_on_segment_selects_trail() {
    let mut h = TestHarness::new();
    let a = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let b = h.draw_trail(&[(0.0, 100.0), (100.0, 100.0)]).unwrap();
    let palette = h.editor.settings.palette.clone();

    h.click(50.0, 0.0);
    assert_eq!(h.editor.selection().selected_trail, Some(a));
    assert_eq!(h.editor.submit_target(), Some(a));
    assert_eq!(line_colors(&h, a), vec![palette.line_selected]);
    assert_eq!(line_colors(&h, b), vec![palette.line_default]);

    h.click(50.0, 100.0);
    assert_eq!(h.editor.selection().selected_trail, Some(b));
    assert_eq!(line_colors(&h, a), vec![palette.line_default]);
    assert_eq!(line_colors(&h, b), vec![palette.line_selected]);
}

#[test]
fn test_hover_is_reset_on_every_move() {
    let mut h = TestHarness::new();
    let a = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let b = h.draw_trail(&[(0.0, 100.0), (100.0, 100.0)]).unwrap();
    let palette = h.editor.settings.palette.clone();
    h.click(50.0, 100.0);

    h.pointer_move(50.0, 3.0);
    assert_eq!(line_colors(&h, a), vec![palette.line_hovered]);

    // Selection wins over hover
    h.pointer_move(50.0, 101.0);
    assert_eq!(line_colors(&h, a), vec![palette.line_default]);
    assert_eq!(line_colors(&h, b), vec![palette.line_selected]);

    h.pointer_move(50.0, 50.0);
    assert_eq!(line_colors(&h, a), vec![palette.line_default]);
}

#[test]
fn test_remove_whole_trail() {
    let mut h = TestHarness::new();
    let a = h.draw_trail(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
    let b = h.draw_trail(&[(0.0, 100.0), (100.0, 100.0)]).unwrap();

    h.editor.remove_trail(a).unwrap();

    assert_eq!(h.vertex_count(a), 0);
    assert_eq!(h.trail_count(), 1);
    assert_eq!(h.labels_of(b), vec!["a1: 100.00 m"]);
    assert_valid(&h);
}

#[test]
fn test_remove_trail_being_drawn_returns_to_idle() {
    let mut h = TestHarness::new();
    h.click(0.0, 0.0);
    h.click(100.0, 0.0);
    let t = h.active_trail().unwrap();

    h.editor.remove_trail(t).unwrap();

    assert!(h.active_trail().is_none());
    assert!(h.scene().is_empty());

    // A fresh click starts a new trail
    h.click(0.0, 0.0);
    assert!(h.active_trail().is_some());
}

#[test]
fn test_edit_sequence_stays_consistent() {
    let mut h = TestHarness::new();
    let a = h
        .draw_trail(&trailmark_lib::fixtures::zigzag((0.0, 0.0), 6, 40.0))
        .unwrap();
    let b = h
        .draw_trail(&trailmark_lib::fixtures::straight_line((0.0, 200.0), 4, 50.0))
        .unwrap();

    h.middle_click(80.0, 0.0);
    h.double_click(25.0, 200.0);
    h.click(25.0, 220.0);
    h.drag((150.0, 200.0), (160.0, 240.0));
    h.middle_click(200.0, 40.0);

    assert_eq!(h.vertex_count(a), 4);
    assert_eq!(h.vertex_count(b), 5);
    assert_valid(&h);
}
