//! Capability Interfaces
//!
//! The assistant never talks to a speech engine, a browser or the system clock
//! directly. Each of those is an opaque, external service consumed through one
//! of the narrow traits below, so the dispatch flow can run against real
//! runtime backends or against in-memory fakes in tests.

use chrono::{Local, NaiveTime};
use tokio::sync::mpsc;

/// Failures raised by a capability backend.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// The capability does not exist in the running environment.
    #[error("{0} is not supported in this environment")]
    Unsupported(&'static str),
    /// The capability exists but the requested operation failed.
    #[error("capability failed: {0}")]
    Failed(String),
}

/// Events emitted by a speech capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The best single transcription candidate for the captured utterance.
    Transcript(String),
    /// The capture session ended.
    End,
    /// The underlying source is exhausted; no further sessions can produce input.
    Closed,
}

/// Speech-to-text capture.
///
/// `start` opens one capture session and hands back the channel on which that
/// session's events arrive. A session delivers at most one useful transcript;
/// the consumer stops it after the first one.
pub trait SpeechCapture: Send + Sync {
    fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CapabilityError>;

    fn stop(&mut self);
}

/// Text-to-speech playback. Implementations must not block until the speech
/// has finished playing.
pub trait SpeechPlayback: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), CapabilityError>;
}

/// Opens a URL in a new browsing context.
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), CapabilityError>;
}

/// Source of the current wall-clock time of day.
pub trait Clock: Send + Sync {
    fn time_of_day(&self) -> NaiveTime;
}

/// A `Clock` backed by the local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_of_day(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A `Clock` that always reports the same time. Useful for deterministic output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn time_of_day(&self) -> NaiveTime {
        self.0
    }
}
