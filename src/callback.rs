//! Post-generation command.

use std::process::{Command, ExitStatus};

use log::{info, warn};

use crate::error::Result;

/// Run `command` through `sh -c`.
///
/// Returns the exit status; a non-zero status is logged, not an error. Only a
/// failure to spawn the shell is returned as `Err`.
pub fn run_callback(command: &str) -> Result<ExitStatus> {
    info!("Running command: {} ...", command);

    let status = Command::new("sh").arg("-c").arg(command).status()?;
    if status.success() {
        info!("{} succeeded", command);
    } else {
        warn!("{} failed ({})", command, status);
    }
    Ok(status)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        let status = run_callback("true").unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_failing_command_is_not_an_error() {
        let status = run_callback("exit 3").unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn test_command_sees_shell_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        let status = run_callback(&format!("echo ok > '{}'", marker.display())).unwrap();
        assert!(status.success());
        assert_eq!(std::fs::read_to_string(marker).unwrap(), "ok\n");
    }
}
