use crate::process::spawn_detached;
use std::path::PathBuf;
use vesper_core::capability::{CapabilityError, Launcher};

#[cfg(target_os = "macos")]
const OPENERS: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPENERS: &[&str] = &["explorer"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENERS: &[&str] = &["xdg-open", "gio", "sensible-browser"];

/// Opens URLs with the desktop's default handler.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    opener: PathBuf,
    args: Vec<&'static str>,
}

impl SystemLauncher {
    pub fn detect() -> Option<Self> {
        OPENERS.iter().find_map(|name| {
            let opener = which::which(name).ok()?;
            // `gio` needs its subcommand.
            let args = if *name == "gio" { vec!["open"] } else { vec![] };
            Some(Self { opener, args })
        })
    }
}

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        spawn_detached(&self.opener, self.args.iter().copied().chain([url]))
    }
}

/// Fallback for headless sessions: prints the URL so the user can follow it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        println!("Open: {url}");
        Ok(())
    }
}
