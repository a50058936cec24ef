//! Capture and Dispatch
//!
//! The [`Assistant`] owns one capture session at a time and turns each
//! captured utterance into one spoken response:
//!
//! 1. `start_listening` opens a capture session on the injected [`SpeechCapture`].
//! 2. `next_utterance` waits for the session's first transcript, then stops it.
//! 3. `dispatch` resolves the text against the [`CommandSet`], performs any local
//!    effect or asks the gateway, speaks the answer and records the exchange.
//!
//! Launching URLs and speaking are fire-and-forget. Their failures are logged
//! and never leak into the response text.

use crate::{
    capability::{CapabilityError, CaptureEvent, Launcher, SpeechCapture, SpeechPlayback},
    commands::{Action, CommandSet, Effect},
    gateway_client::GatewayClient,
    history::{History, HistoryEntry},
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Spoken when the gateway cannot be reached or its reply cannot be parsed.
pub const SERVER_ERROR_RESPONSE: &str = "Error contacting server.";
/// Spoken when the gateway answered without any text.
pub const EMPTY_ANSWER_RESPONSE: &str = "Sorry, I couldn't get an answer.";

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The running environment has no such capability. Non-fatal.
    #[error("{0} is not supported in this environment")]
    UnsupportedCapability(&'static str),
    #[error("speech capture failed: {0}")]
    Capture(CapabilityError),
}

impl From<CapabilityError> for AssistantError {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::Unsupported(what) => AssistantError::UnsupportedCapability(what),
            other => AssistantError::Capture(other),
        }
    }
}

/// Flags a UI renders: the microphone state and the "Thinking..." indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssistantStatus {
    pub listening: bool,
    pub thinking: bool,
}

/// What a capture session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    Utterance(String),
    /// The session ended without a transcript.
    Silence,
    /// The capture source is exhausted.
    Closed,
}

/// The result of one full listen-and-answer interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    Heard(HistoryEntry),
    Silence,
    Closed,
}

/// Raises `thinking` for as long as it is alive.
struct ThinkingGuard<'a> {
    status: &'a watch::Sender<AssistantStatus>,
}

impl<'a> ThinkingGuard<'a> {
    fn raise(status: &'a watch::Sender<AssistantStatus>) -> Self {
        status.send_modify(|s| s.thinking = true);
        Self { status }
    }
}

impl Drop for ThinkingGuard<'_> {
    fn drop(&mut self) {
        self.status.send_modify(|s| s.thinking = false);
    }
}

/// The capture/dispatch client.
///
/// Every external service is injected, so independent instances never share
/// state. Taking `&mut self` for listening and dispatching keeps at most one
/// session and one dispatch in flight per instance.
pub struct Assistant {
    commands: CommandSet,
    gateway: Arc<dyn GatewayClient>,
    launcher: Arc<dyn Launcher>,
    capture: Option<Box<dyn SpeechCapture>>,
    playback: Option<Arc<dyn SpeechPlayback>>,
    events: Option<mpsc::Receiver<CaptureEvent>>,
    history: History,
    status: watch::Sender<AssistantStatus>,
}

impl Assistant {
    /// Creates an assistant with no capture or playback. Add them with
    /// [`Assistant::with_capture`] and [`Assistant::with_playback`].
    pub fn new(
        commands: CommandSet,
        gateway: Arc<dyn GatewayClient>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let (status, _) = watch::channel(AssistantStatus::default());
        Self {
            commands,
            gateway,
            launcher,
            capture: None,
            playback: None,
            events: None,
            history: History::new(),
            status,
        }
    }

    pub fn with_capture(mut self, capture: Box<dyn SpeechCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn with_playback(mut self, playback: Arc<dyn SpeechPlayback>) -> Self {
        self.playback = Some(playback);
        self
    }

    pub fn has_playback(&self) -> bool {
        self.playback.is_some()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> AssistantStatus {
        *self.status.borrow()
    }

    /// Returns a receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<AssistantStatus> {
        self.status.subscribe()
    }

    pub fn is_listening(&self) -> bool {
        self.events.is_some()
    }

    /// Opens a capture session. Calling it while already listening is a no-op.
    pub fn start_listening(&mut self) -> Result<(), AssistantError> {
        let Some(capture) = self.capture.as_mut() else {
            return Err(AssistantError::UnsupportedCapability("speech capture"));
        };
        if self.events.is_some() {
            debug!("Already listening; ignoring start request");
            return Ok(());
        }

        let events = capture.start()?;
        self.events = Some(events);
        self.status.send_modify(|s| s.listening = true);
        debug!("Listening started");
        Ok(())
    }

    /// Stops the current capture session, if any.
    pub fn stop_listening(&mut self) {
        if self.events.take().is_some() {
            if let Some(capture) = self.capture.as_mut() {
                capture.stop();
            }
            debug!("Listening stopped");
        }
        self.status.send_modify(|s| s.listening = false);
    }

    /// Waits for the current session's first transcript.
    ///
    /// The session is stopped as soon as it yields a result or ends, so a
    /// session produces at most one utterance. Returns [`Captured::Silence`]
    /// immediately when not listening.
    pub async fn next_utterance(&mut self) -> Captured {
        let Some(events) = self.events.as_mut() else {
            return Captured::Silence;
        };

        let captured = match events.recv().await {
            Some(CaptureEvent::Transcript(text)) => Captured::Utterance(text),
            Some(CaptureEvent::End) | None => Captured::Silence,
            Some(CaptureEvent::Closed) => Captured::Closed,
        };
        self.stop_listening();
        captured
    }

    /// One press of the microphone: listen, wait for an utterance, answer it.
    pub async fn listen_once(&mut self) -> Result<ListenOutcome, AssistantError> {
        self.start_listening()?;
        let outcome = match self.next_utterance().await {
            Captured::Utterance(text) => ListenOutcome::Heard(self.dispatch(&text).await),
            Captured::Silence => ListenOutcome::Silence,
            Captured::Closed => ListenOutcome::Closed,
        };
        Ok(outcome)
    }

    /// Resolves `text`, carries out the resulting action, speaks the response
    /// and appends the exchange to the history.
    pub async fn dispatch(&mut self, text: &str) -> HistoryEntry {
        let _thinking = ThinkingGuard::raise(&self.status);

        let response = match self.commands.resolve(text) {
            Action::Local { response, effect } => {
                if let Some(effect) = effect {
                    perform(self.launcher.as_ref(), &effect);
                }
                response
            }
            Action::Delegate { prompt } => ask_gateway(self.gateway.as_ref(), &prompt).await,
        };

        if let Some(playback) = &self.playback {
            if let Err(e) = playback.speak(&response) {
                warn!(error = %e, "Speech playback failed");
            }
        }

        let entry = HistoryEntry {
            command: text.to_string(),
            response,
        };
        self.history.push(entry.clone());
        info!(command = %entry.command, response = %entry.response, "Utterance dispatched");
        entry
    }
}

fn perform(launcher: &dyn Launcher, effect: &Effect) {
    match effect {
        Effect::OpenUrl(url) => {
            if let Err(e) = launcher.open(url) {
                warn!(%url, error = %e, "Failed to open URL");
            }
        }
    }
}

async fn ask_gateway(gateway: &dyn GatewayClient, prompt: &str) -> String {
    match gateway.ask(prompt).await {
        Ok(Some(answer)) if !answer.is_empty() => answer,
        Ok(_) => EMPTY_ANSWER_RESPONSE.to_string(),
        Err(e) => {
            warn!(error = %e, "Gateway request failed");
            SERVER_ERROR_RESPONSE.to_string()
        }
    }
}
