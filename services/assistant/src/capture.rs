//! Console-backed speech capture.
//!
//! Stands in for a speech-to-text engine on a terminal: each capture session
//! reads one line, and that line is the session's transcript. Dictation tools
//! that type into the terminal plug in here unchanged.

use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tracing::warn;
use vesper_core::capability::{CapabilityError, CaptureEvent, SpeechCapture};

pub struct ConsoleCapture<R> {
    lines: Arc<Mutex<Lines<R>>>,
    session: Option<JoinHandle<()>>,
}

impl ConsoleCapture<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleCapture<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
            session: None,
        }
    }
}

async fn read_session<R>(lines: Arc<Mutex<Lines<R>>>, tx: mpsc::Sender<CaptureEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let line = lines.lock().await.next_line().await;
    let events = match line {
        Ok(Some(line)) if !line.trim().is_empty() => vec![
            CaptureEvent::Transcript(line.trim().to_string()),
            CaptureEvent::End,
        ],
        Ok(Some(_)) => vec![CaptureEvent::End],
        Ok(None) => vec![CaptureEvent::Closed],
        Err(e) => {
            warn!(error = %e, "Failed to read from console");
            vec![CaptureEvent::Closed]
        }
    };
    for event in events {
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

impl<R> SpeechCapture for ConsoleCapture<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CapabilityError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CapabilityError::Failed(e.to_string()))?;
        let (tx, rx) = mpsc::channel(2);
        self.session = Some(runtime.spawn(read_session(self.lines.clone(), tx)));
        Ok(rx)
    }

    fn stop(&mut self) {
        // `next_line` is cancel-safe, so a half-typed line is kept for the next session.
        if let Some(session) = self.session.take() {
            session.abort();
        }
    }
}
