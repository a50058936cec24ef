//! Vesper Core
//!
//! Everything the voice assistant does that is independent of a concrete
//! runtime: local command resolution, the capture/dispatch flow, the
//! capability traits it is wired through, and the clients for the completion
//! gateway and the upstream language model.

pub mod capability;
pub mod commands;
pub mod dispatcher;
pub mod gateway_client;
pub mod history;
pub mod llm_client;

pub use commands::{Action, CommandRule, CommandSet, Effect};
pub use dispatcher::{Assistant, AssistantError, AssistantStatus, ListenOutcome};
pub use history::{History, HistoryEntry};
