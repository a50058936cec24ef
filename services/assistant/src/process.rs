use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};
use vesper_core::capability::CapabilityError;

/// Spawns `program args...` without waiting for it to finish.
///
/// The child is reaped on a background task; a non-zero exit is only logged.
/// Must be called from within a Tokio runtime.
pub fn spawn_detached<I, S>(program: &Path, args: I) -> Result<(), CapabilityError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| CapabilityError::Failed(e.to_string()))?;
    let _guard = runtime.enter();

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CapabilityError::Failed(format!("{}: {e}", program.display())))?;

    let name = program.display().to_string();
    runtime.spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => debug!(program = %name, "Child process finished"),
            Ok(status) => warn!(program = %name, %status, "Child process exited unsuccessfully"),
            Err(e) => warn!(program = %name, error = %e, "Failed to wait for child process"),
        }
    });
    Ok(())
}
