pub mod error;
pub mod session;
pub mod thumbnails;
pub mod waveform;

pub use error::{MediaError, Result};
pub use session::{channel, MediaEvent, MediaInbox, MediaPayload, MediaSender, MediaSession, MediaSink, MediaStore};
