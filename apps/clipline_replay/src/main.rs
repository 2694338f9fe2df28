use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clipline_core::types::MediaSource;
use clipline_core::{EditorConfig, TimelineEditor};
use serde::Deserialize;

/// A recorded session: what was loaded and the input that followed.
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: Option<EditorConfig>,
    media: MediaSource,
    #[serde(default)]
    audio_duration: Option<f64>,
    #[serde(default)]
    viewport_width: Option<f64>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Hover { x: f64, y: f64 },
    Wheel { x: f64, delta_y: f64 },
    ZoomIn,
    ZoomOut,
    AddText,
    Split,
    Delete,
    Seek { time: f64 },
    PlayheadDown,
    PlayheadMove { x: f64 },
    ReleaseAll,
}

fn apply(editor: &mut TimelineEditor, index: usize, step: &Step) {
    match *step {
        Step::PointerDown { x, y } => {
            if !editor.pointer_down(x, y) {
                tracing::debug!("Step {}: pointer down ignored", index);
            }
        }
        Step::PointerMove { x, y } => editor.pointer_move(x, y),
        Step::PointerUp => {
            let release = editor.pointer_up();
            tracing::info!("Step {}: released {:?}", index, release);
        }
        Step::Hover { x, y } => {
            editor.hover(x, y);
        }
        Step::Wheel { x, delta_y } => editor.wheel(x, delta_y),
        Step::ZoomIn => {
            editor.zoom_in();
        }
        Step::ZoomOut => {
            editor.zoom_out();
        }
        Step::AddText => match editor.add_text_clip() {
            Ok(id) => tracing::info!("Step {}: added text clip {}", index, id),
            Err(e) => tracing::warn!("Step {}: add text refused: {}", index, e),
        },
        Step::Split => match editor.split_selected_at_playhead() {
            Ok(id) => tracing::info!("Step {}: split into {}", index, id),
            Err(e) => tracing::warn!("Step {}: split refused: {}", index, e),
        },
        Step::Delete => match editor.delete_selected() {
            Ok(clip) => tracing::info!("Step {}: deleted clip {}", index, clip.id),
            Err(e) => tracing::warn!("Step {}: delete refused: {}", index, e),
        },
        Step::Seek { time } => editor.seek(time),
        Step::PlayheadDown => {
            if !editor.playhead_down() {
                tracing::debug!("Step {}: playhead busy", index);
            }
        }
        Step::PlayheadMove { x } => editor.playhead_move(x),
        Step::ReleaseAll => editor.release_all(),
    }
}

fn run(path: PathBuf) -> Result<()> {
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let script: Script = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse script {}", path.display()))?;

    let mut editor = TimelineEditor::new(script.config.unwrap_or_default())
        .context("Invalid editor config")?;
    if let Some(width) = script.viewport_width {
        editor.set_viewport_width(width);
    }
    editor
        .load_media(script.media)
        .context("Failed to load media")?;
    if let Some(duration) = script.audio_duration {
        editor
            .attach_audio(duration)
            .context("Failed to attach audio")?;
    }

    for (index, step) in script.steps.iter().enumerate() {
        apply(&mut editor, index, step);
        if let Some(ticket) = editor.take_frame() {
            tracing::debug!("Step {}: frame #{} {:?}", index, ticket.id, ticket.dirty);
        }
    }

    let out = serde_json::to_string_pretty(&editor.snapshot())?;
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: clipline-replay <script.json>");
    };
    run(PathBuf::from(path))
}
