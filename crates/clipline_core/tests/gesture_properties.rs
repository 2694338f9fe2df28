// Property-based checks over random gesture and command sequences.

use clipline_core::interaction::Gesture;
use clipline_core::projector::Projector;
use clipline_core::types::MediaSource;
use clipline_core::TimelineEditor;
use proptest::prelude::*;

const EPS: f64 = 1e-6;

#[derive(Debug, Clone)]
enum Op {
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Wheel(f64, f64),
    AddText,
    Split,
    Delete,
    Seek(f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-50.0..2_500.0f64, 40.0..260.0f64).prop_map(|(x, y)| Op::Down(x, y)),
        6 => (-200.0..3_000.0f64, 40.0..260.0f64).prop_map(|(x, y)| Op::Move(x, y)),
        3 => Just(Op::Up),
        1 => (0.0..800.0f64, -300.0..300.0f64).prop_map(|(x, d)| Op::Wheel(x, d)),
        1 => Just(Op::AddText),
        1 => Just(Op::Split),
        1 => Just(Op::Delete),
        1 => (0.0..20.0f64).prop_map(Op::Seek),
    ]
}

fn apply(editor: &mut TimelineEditor, op: &Op) {
    match *op {
        Op::Down(x, y) => {
            editor.pointer_down(x, y);
        }
        Op::Move(x, y) => editor.pointer_move(x, y),
        Op::Up => {
            editor.pointer_up();
        }
        Op::Wheel(x, d) => editor.wheel(x, d),
        Op::AddText => {
            let _ = editor.add_text_clip();
        }
        Op::Split => {
            let _ = editor.split_selected_at_playhead();
        }
        Op::Delete => {
            let _ = editor.delete_selected();
        }
        Op::Seek(t) => editor.seek(t),
    }
}

fn make_editor() -> TimelineEditor {
    let mut editor = TimelineEditor::default();
    editor
        .load_media(MediaSource {
            id: "prop".into(),
            src: "blob:prop".into(),
            duration: 20.0,
            width: 640,
            height: 360,
        })
        .unwrap();
    editor
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Once no gesture is in progress, clips on a track never overlap and
    /// every clip keeps the minimum length.
    #[test]
    fn committed_scene_is_consistent(ops in prop::collection::vec(op(), 1..80)) {
        let mut editor = make_editor();
        let min_gap = editor.config().min_gap;

        for op in &ops {
            apply(&mut editor, op);
            if editor.gesture() != Gesture::Idle {
                continue;
            }
            let duration = editor.scene().duration();
            for (row, track) in editor.scene().tracks().iter().enumerate() {
                prop_assert_eq!(track.track_index, row);
                for pair in track.clips.windows(2) {
                    prop_assert!(pair[0].start_time <= pair[1].start_time);
                    prop_assert!(
                        pair[0].end_time <= pair[1].start_time + EPS,
                        "overlap on row {}: {} vs {}", row, pair[0].range(), pair[1].range()
                    );
                }
                for clip in &track.clips {
                    prop_assert_eq!(clip.track_index, row);
                    prop_assert_eq!(clip.parent_id, track.id);
                    prop_assert!(clip.duration() + EPS >= min_gap);
                    prop_assert!(clip.start_time >= -EPS && clip.end_time <= duration + EPS);
                }
            }
            let viewport = editor.scene().viewport();
            prop_assert!(viewport.scroll_left >= 0.0);
            prop_assert!(viewport.scale >= 10.0 && viewport.scale <= 200.0);
        }
    }

    #[test]
    fn projection_round_trips(
        scale in 1.0..500.0f64,
        scroll in 0.0..10_000.0f64,
        x in -2_000.0..20_000.0f64,
    ) {
        let p = Projector::new(scale, scroll);
        prop_assert!((p.time_to_pixel(p.pixel_to_time(x)) - x).abs() < 1e-6);
    }
}
