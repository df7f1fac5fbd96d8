//! Desktop launchers.

use async_trait::async_trait;
use tokio::process::Command;

use super::Desktop;
use crate::error::ActionError;

/// Longest app name accepted from an utterance.
const MAX_APP_NAME: usize = 64;

/// Power and shell commands that are never launched by name.
const BLOCKED_APPS: &[&str] = &[
    "shutdown", "reboot", "poweroff", "halt", "restart", "logoff", "logout", "sudo", "su",
    "rm", "del", "format", "cmd", "powershell", "pwsh", "sh", "bash", "zsh", "kill", "killall",
];

/// Check a spoken app name before it reaches the platform launcher.
///
/// Only letters, digits, spaces, `.`, `-` and `_` pass, so shell
/// metacharacters and paths never get through. The name may not start with
/// `-` or `.`, and its first word may not be a power or shell command.
pub(crate) fn validate_app_name(name: &str) -> Result<&str, ActionError> {
    let name = name.trim();
    let reject = |reason: &str| ActionError::InvalidTarget {
        target: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() || name.len() > MAX_APP_NAME {
        return Err(reject("empty or too long"));
    }
    if name.starts_with(['-', '.']) {
        return Err(reject("leading option character"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_')))
    {
        return Err(reject(&format!("character '{}' not allowed", c)));
    }
    let first = name
        .split([' ', '-', '.'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if BLOCKED_APPS.contains(&first.as_str()) {
        return Err(reject("system command"));
    }
    Ok(name)
}

/// Hands URLs and app names to the platform opener.
///
/// Apps go through the desktop launcher, never straight to `exec`: desktop
/// entry ids via `gtk-launch` on Linux, `open -a` on macOS and
/// `Start-Process` on Windows. The child process is detached; only spawn
/// failures are reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl SystemDesktop {
    fn url_command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("explorer");
            cmd.arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }

    /// Launcher command for an already validated app name.
    fn app_command(name: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.args(["-a", name]);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("powershell");
            cmd.args([
                "-NoProfile",
                "-NonInteractive",
                "-Command",
                &format!("Start-Process -FilePath '{}'", name),
            ]);
            cmd
        } else {
            // Desktop entry ids are hyphenated.
            let mut cmd = Command::new("gtk-launch");
            cmd.arg(name.replace(' ', "-"));
            cmd
        }
    }

    fn spawn(mut cmd: Command, target: &str) -> Result<(), ActionError> {
        cmd.stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        cmd.spawn().map_err(|e| ActionError::Launch {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl Desktop for SystemDesktop {
    async fn open_url(&self, url: &str) -> Result<(), ActionError> {
        tracing::info!(url = %url, "Opening URL");
        Self::spawn(Self::url_command(url), url)
    }

    async fn launch_app(&self, name: &str) -> Result<(), ActionError> {
        let name = validate_app_name(name)?;
        tracing::info!(app = %name, "Launching application");
        Self::spawn(Self::app_command(name), name)
    }
}

/// Logs what would be opened without touching the desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunDesktop;

#[async_trait]
impl Desktop for DryRunDesktop {
    async fn open_url(&self, url: &str) -> Result<(), ActionError> {
        tracing::info!(url = %url, "Dry run: would open URL");
        Ok(())
    }

    async fn launch_app(&self, name: &str) -> Result<(), ActionError> {
        let name = validate_app_name(name)?;
        tracing::info!(app = %name, "Dry run: would launch application");
        Ok(())
    }
}
