//! Speech playback through a local text-to-speech program.
//!
//! Engines are tried in order of preference: espeak-ng, espeak, spd-say
//! (speech-dispatcher) and macOS `say`. An explicit command overrides the
//! search.

use crate::process::spawn_detached;
use std::path::{Path, PathBuf};
use tracing::debug;
use vesper_core::capability::{CapabilityError, SpeechPlayback};

const ENGINES: &[&str] = &["espeak-ng", "espeak", "spd-say", "say"];

/// Speaks by running `program [args...] <text>`.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a command line such as `espeak-ng -s 160`. Returns `None` when
    /// it is blank.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts.map(str::to_string).collect()))
    }

    /// Finds the first known engine on `PATH`.
    pub fn detect() -> Option<Self> {
        ENGINES.iter().find_map(|name| {
            which::which(name).ok().map(|path| {
                debug!(engine = %path.display(), "Found text-to-speech engine");
                Self::new(path, vec![])
            })
        })
    }

    /// Uses `command` when given, otherwise searches `PATH`.
    pub fn resolve(command: Option<&str>) -> Option<Self> {
        match command {
            Some(command) => Self::from_command_line(command),
            None => Self::detect(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl SpeechPlayback for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<(), CapabilityError> {
        spawn_detached(&self.program, self.args.iter().map(String::as_str).chain([text]))
    }
}
