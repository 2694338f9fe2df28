use clipline_core::types::{Generation, MediaSource};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::error::{MediaError, Result};
use crate::thumbnails::{ThumbnailRecord, ThumbnailStrip};
use crate::waveform::WaveformData;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The media load that async results must belong to.
#[derive(Debug, Clone, Default)]
pub struct MediaSession {
    generation: Generation,
    source: Option<MediaSource>,
}

impl MediaSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Anything tagged with an older generation becomes stale.
    pub fn begin(&mut self, source: MediaSource) -> Generation {
        self.generation = self.generation.next();
        tracing::info!("Media session {} started for {}", self.generation, source.id);
        self.source = Some(source);
        self.generation
    }

    /// Follow a generation chosen elsewhere, e.g. by `TimelineEditor::load_media`.
    pub fn adopt(&mut self, generation: Generation, source: MediaSource) {
        tracing::info!("Media session {} adopted for {}", generation, source.id);
        self.generation = generation;
        self.source = Some(source);
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn check(&self, generation: Generation) -> Result<()> {
        if self.is_current(generation) {
            Ok(())
        } else {
            Err(MediaError::StaleGeneration {
                expected: self.generation,
                got: generation,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum MediaPayload {
    Thumbnail(ThumbnailRecord),
    Waveform(WaveformData),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub generation: Generation,
    pub payload: MediaPayload,
}

/// Producer half handed to decode workers.
#[derive(Debug, Clone)]
pub struct MediaSender {
    tx: mpsc::UnboundedSender<MediaEvent>,
}

impl MediaSender {
    pub fn send(&self, generation: Generation, payload: MediaPayload) -> Result<()> {
        self.tx
            .send(MediaEvent { generation, payload })
            .map_err(|_| MediaError::ChannelClosed)
    }
}

/// Consumer half polled by the UI thread.
#[derive(Debug)]
pub struct MediaInbox {
    rx: mpsc::UnboundedReceiver<MediaEvent>,
}

pub fn channel() -> (MediaSender, MediaInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MediaSender { tx }, MediaInbox { rx })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub delivered: usize,
    pub stale: usize,
}

/// Receives results that belong to the current session.
pub trait MediaSink {
    fn accept(&mut self, payload: MediaPayload);
}

impl MediaInbox {
    /// Forward everything already queued without waiting for more.
    pub fn drain(&mut self, session: &MediaSession, sink: &mut impl MediaSink) -> DrainStats {
        let mut stats = DrainStats::default();
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if let Err(e) = session.check(event.generation) {
                        tracing::debug!("Dropping media result: {}", e);
                        stats.stale += 1;
                        continue;
                    }
                    sink.accept(event.payload);
                    stats.delivered += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        stats
    }

    /// Wait for the next event. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<MediaEvent> {
        self.rx.recv().await
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// What the renderer reads: thumbnails so far, the waveform once ready,
/// and the last failure message.
#[derive(Debug, Clone, Default)]
pub struct MediaStore {
    pub thumbnails: ThumbnailStrip,
    pub waveform: Option<WaveformData>,
    pub status: Option<String>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.thumbnails.clear();
        self.waveform = None;
        self.status = None;
    }
}

impl MediaSink for MediaStore {
    fn accept(&mut self, payload: MediaPayload) {
        match payload {
            MediaPayload::Thumbnail(record) => self.thumbnails.insert(record),
            MediaPayload::Waveform(data) => self.waveform = Some(data),
            MediaPayload::Failed(message) => {
                tracing::warn!("Media processing failed: {}", message);
                self.status = Some(message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Workers
// ---------------------------------------------------------------------------

/// Compute a waveform off the UI thread and post it tagged with `generation`.
pub fn spawn_waveform_analysis(
    sender: MediaSender,
    generation: Generation,
    channel: Vec<f32>,
    duration: f64,
    buckets: usize,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let payload = match WaveformData::analyze(&channel, duration, buckets) {
            Ok(data) => MediaPayload::Waveform(data),
            Err(e) => MediaPayload::Failed(e.to_string()),
        };
        if let Err(e) = sender.send(generation, payload) {
            tracing::debug!("Waveform for {} not delivered: {}", generation, e);
        }
    })
}
