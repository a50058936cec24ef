//! vesper: terminal front-end for the voice assistant.
//!
//! Each line typed (or dictated) into the terminal is one utterance. Local
//! commands are handled on the spot; everything else is sent to the
//! completion gateway and the answer is spoken back.

mod capture;
mod launcher;
mod process;
mod speaker;

use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vesper_core::{
    Assistant, AssistantError, CommandSet, ListenOutcome,
    capability::{Launcher, SystemClock},
    gateway_client::HttpGatewayClient,
};

use crate::{
    capture::ConsoleCapture,
    launcher::{PrintLauncher, SystemLauncher},
    speaker::CommandSpeaker,
};

#[derive(Parser, Debug)]
#[command(name = "vesper", about = "Voice assistant front-end for the Vesper gateway")]
struct Args {
    /// Base URL of the completion gateway
    #[arg(long, env = "VESPER_GATEWAY_URL", default_value = "http://localhost:5000")]
    gateway_url: String,

    /// Text-to-speech command; the response is passed as its last argument
    #[arg(long, env = "VESPER_TTS_COMMAND")]
    tts_command: Option<String>,

    /// Print responses without speaking them
    #[arg(long)]
    no_speech: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let gateway = Arc::new(HttpGatewayClient::new(&args.gateway_url));
    info!(endpoint = gateway.endpoint(), "Using completion gateway");

    let launcher: Arc<dyn Launcher> = match SystemLauncher::detect() {
        Some(launcher) => Arc::new(launcher),
        None => {
            println!("No URL opener found; links will be printed instead.");
            Arc::new(PrintLauncher)
        }
    };

    let mut assistant = Assistant::new(
        CommandSet::standard(Arc::new(SystemClock)),
        gateway,
        launcher,
    )
    .with_capture(Box::new(ConsoleCapture::stdin()));

    if !args.no_speech {
        match CommandSpeaker::resolve(args.tts_command.as_deref()) {
            Some(speaker) => {
                info!(engine = %speaker.program().display(), "Speech playback enabled");
                assistant = assistant.with_playback(Arc::new(speaker));
            }
            None => println!(
                "{}; responses will only be printed.",
                AssistantError::UnsupportedCapability("speech playback")
            ),
        }
    }

    let mut status = assistant.subscribe();
    tokio::spawn(async move {
        let mut was_thinking = false;
        while status.changed().await.is_ok() {
            let thinking = status.borrow_and_update().thinking;
            if thinking && !was_thinking {
                println!("Thinking...");
            }
            was_thinking = thinking;
        }
    });

    println!(
        "Try saying: \"What is the time?\", \"Open Google\", \
         \"Search YouTube for relaxing music\", \"Tell me a joke\""
    );
    println!("Type an utterance and press Enter. Ctrl+D quits.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        match assistant.listen_once().await {
            Ok(ListenOutcome::Heard(entry)) => {
                println!("Heard: \"{}\"", entry.command);
                println!("{}", entry.response);
            }
            Ok(ListenOutcome::Silence) => continue,
            Ok(ListenOutcome::Closed) => break,
            Err(e @ AssistantError::UnsupportedCapability(_)) => {
                eprintln!("{e}");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(exchanges = assistant.history().len(), "Session finished");
    Ok(())
}
