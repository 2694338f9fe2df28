// End-to-end gesture scenarios driven through `TimelineEditor`.

use clipline_core::interaction::Release;
use clipline_core::overlap::Resolution;
use clipline_core::types::{MediaSource, TimeRange, TrackKind};
use clipline_core::{CoreError, EditorConfig, TimelineEditor};
use uuid::Uuid;

// Default layout: video row 0 spans y in [50, 110), audio row 1 spans [120, 180).
const VIDEO_Y: f64 = 80.0;

fn make_editor(duration: f64) -> TimelineEditor {
    let mut editor = TimelineEditor::new(EditorConfig::default()).unwrap();
    editor
        .load_media(MediaSource {
            id: "sample".into(),
            src: "blob:sample".into(),
            duration,
            width: 1280,
            height: 720,
        })
        .unwrap();
    editor
}

/// Split the loaded video clip so row 0 holds exactly `ranges`.
///
/// Builds the layout with the public commands only: split at each boundary,
/// then delete the gaps.
fn layout_video_row(editor: &mut TimelineEditor, ranges: &[(f64, f64)]) -> Vec<Uuid> {
    let mut cuts: Vec<f64> = ranges.iter().flat_map(|&(s, e)| [s, e]).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let duration = editor.scene().duration();
    for &t in &cuts {
        if t <= 0.0 || t >= duration {
            continue;
        }
        let id = editor
            .scene()
            .tracks()[0]
            .clips
            .iter()
            .find(|c| c.start_time < t && c.end_time > t)
            .map(|c| c.id);
        if let Some(id) = id {
            editor.split_clip(id, t).unwrap();
        }
    }

    let unwanted: Vec<(Uuid, f64)> = editor.scene().tracks()[0]
        .clips
        .iter()
        .filter(|c| !ranges.iter().any(|&(s, e)| c.start_time == s && c.end_time == e))
        .map(|c| (c.id, c.start_time))
        .collect();
    for (_, start) in unwanted {
        let x = editor.scene().projector().time_to_pixel(start) + 30.0;
        editor.pointer_down(x, VIDEO_Y);
        editor.pointer_up();
        editor.delete_selected().unwrap();
    }

    editor.scene().tracks()[0].clips.iter().map(|c| c.id).collect()
}

fn range_of(editor: &TimelineEditor, id: Uuid) -> TimeRange {
    editor.scene().clip(id).unwrap().range()
}

fn assert_range(actual: TimeRange, start: f64, end: f64) {
    assert!(
        (actual.start - start).abs() < 1e-9 && (actual.end - end).abs() < 1e-9,
        "expected [{start}, {end}], got {actual}"
    );
}

#[test]
fn drag_into_empty_space() {
    let mut editor = make_editor(30.0);
    let ids = layout_video_row(&mut editor, &[(0.0, 5.0)]);
    let a = ids[0];

    assert!(editor.pointer_down(250.0, VIDEO_Y));
    editor.pointer_move(1250.0, VIDEO_Y);
    let release = editor.pointer_up();

    assert!(matches!(release, Release::Moved(Resolution::Accepted(_))));
    assert_range(range_of(&editor, a), 10.0, 15.0);
}

#[test]
fn drop_inside_neighbour_reverts() {
    let mut editor = make_editor(30.0);
    let ids = layout_video_row(&mut editor, &[(0.0, 2.0), (5.0, 10.0)]);
    let a = ids[0];

    editor.pointer_down(100.0, VIDEO_Y);
    editor.pointer_move(700.0, VIDEO_Y);
    assert_range(range_of(&editor, a), 6.0, 8.0);
    let release = editor.pointer_up();

    assert!(matches!(release, Release::Moved(Resolution::Reverted(_))));
    assert_eq!(range_of(&editor, a), TimeRange::new(0.0, 2.0));
}

#[test]
fn drop_overlapping_neighbour_snaps_before_it() {
    let mut editor = make_editor(30.0);
    let ids = layout_video_row(&mut editor, &[(0.0, 5.0), (6.0, 10.0)]);
    let (a, b) = (ids[0], ids[1]);

    editor.pointer_down(250.0, VIDEO_Y);
    editor.pointer_move(800.0, VIDEO_Y);
    editor.pointer_up();

    assert_range(range_of(&editor, a), 1.0, 6.0);
    assert!(range_of(&editor, a).end <= range_of(&editor, b).start + 1e-9);
}

#[test]
fn left_trim_is_bounded_by_previous_clip() {
    let mut editor = make_editor(30.0);
    let ids = layout_video_row(&mut editor, &[(0.0, 4.0), (5.0, 10.0)]);
    let b = ids[1];

    assert!(editor.pointer_down(505.0, VIDEO_Y));
    editor.pointer_move(300.0, VIDEO_Y);
    let release = editor.pointer_up();

    assert_eq!(release, Release::Trimmed(TimeRange::new(4.0, 10.0)));
    assert_eq!(range_of(&editor, b), TimeRange::new(4.0, 10.0));
}

#[test]
fn wheel_zoom_keeps_pointer_time() {
    let mut editor = make_editor(60.0);
    assert_eq!(editor.scene().scale(), 100.0);
    assert_eq!(editor.scene().scroll_left(), 0.0);

    // 100 - (-500 * 0.1) = 150
    editor.wheel(200.0, -500.0);
    assert_eq!(editor.scene().scale(), 150.0);
    assert!((editor.scene().scroll_left() - 100.0).abs() < 1e-9);
}

#[test]
fn delete_selected_clip() {
    let mut editor = make_editor(10.0);
    let id = editor.scene().tracks()[0].clips[0].id;
    editor.pointer_down(250.0, VIDEO_Y);
    editor.pointer_up();

    editor.delete_selected().unwrap();
    assert!(editor.scene().selection().is_none());
    assert!(editor.scene().tracks()[0].clips.iter().all(|c| c.id != id));
    assert!(matches!(editor.delete_selected(), Err(CoreError::NoSelection)));
}

#[test]
fn reverted_drag_restores_exact_origin() {
    let mut editor = make_editor(30.0);
    let ids = layout_video_row(&mut editor, &[(0.0, 3.0), (4.0, 6.0), (7.0, 20.0)]);
    let mid = ids[1];
    let origin = range_of(&editor, mid);

    // Drop the 2s clip onto the 13s clip with no room on either side of it.
    editor.pointer_down(500.0, VIDEO_Y);
    assert_eq!(editor.scene().selection().unwrap().origin_time, origin);
    editor.pointer_move(1300.0, VIDEO_Y);
    editor.pointer_up();

    assert_eq!(range_of(&editor, mid), origin);
}

#[test]
fn selecting_twice_is_idempotent() {
    let mut editor = make_editor(10.0);
    editor.pointer_down(250.0, VIDEO_Y);
    editor.pointer_up();
    let first = editor.scene().selection().cloned();
    let revision = editor.scene().revision();

    editor.pointer_down(250.0, VIDEO_Y);
    editor.pointer_up();
    assert_eq!(editor.scene().selection().cloned(), first);
    assert!(editor.scene().revision() > revision);
}

#[test]
fn text_clip_joins_its_own_row() {
    let mut editor = make_editor(10.0);
    let id = editor.add_text_clip().unwrap();
    let text = &editor.scene().tracks()[2];
    assert_eq!(text.kind, TrackKind::Text);
    assert_eq!(text.clips[0].id, id);
    assert_eq!(text.clips[0].content.as_deref(), Some("Text"));
}

#[test]
fn playhead_suspended_during_clip_drag() {
    let mut editor = make_editor(10.0);
    editor.pointer_down(250.0, VIDEO_Y);
    assert!(!editor.playhead_down());
    editor.pointer_up();
    assert!(editor.playhead_down());
    editor.playhead_move(420.0);
    assert!((editor.scene().playhead() - 4.2).abs() < 1e-9);
    assert!(!editor.pointer_down(250.0, VIDEO_Y));
    editor.release_all();
    assert!(editor.pointer_down(250.0, VIDEO_Y));
}
