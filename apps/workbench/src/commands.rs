//! Line commands read from stdin by the headless host.

use std::str::FromStr;

use shared::domain::{EmptyToolchainId, FolderId, OverlayKey, ToolchainId};
use shell_core::ScreenKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The user typed a new fragment into the address bar.
    Navigate(String),
    /// Open a toolchain (or close it with `switch -`) from inside the app.
    Switch(Option<ToolchainId>),
    Expand(String),
    Minimize(String),
    Show(OverlayKey),
    Hide,
    Keep,
    Screen(ScreenKind, String),
    /// A failed request; the message travels in the JSON body.
    ServerError { status: u16, message: String },
    Fault(String),
    Escape,
    ClickBackground,
    ClickClose,
    Link(FolderId),
    State,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("unknown overlay `{0}`")]
    UnknownOverlay(String),
    #[error("unknown screen kind `{0}`")]
    UnknownScreen(String),
    #[error("invalid status code `{0}`")]
    InvalidStatus(String),
    #[error(transparent)]
    InvalidToolchain(#[from] EmptyToolchainId),
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    Ok(rest)
}

fn parse_screen_kind(name: &str) -> Result<ScreenKind, CommandError> {
    match name {
        "loading" => Ok(ScreenKind::Loading),
        "error" => Ok(ScreenKind::Error),
        "user-error" => Ok(ScreenKind::UserError),
        "really-bad-error" => Ok(ScreenKind::ReallyBadError),
        "success" => Ok(ScreenKind::Success),
        other => Err(CommandError::UnknownScreen(other.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        match word {
            "" => Err(CommandError::Empty),
            // An empty fragment is a valid navigation target.
            "nav" => Ok(Command::Navigate(rest.to_string())),
            "switch" => {
                let id = required(rest, "switch", "a toolchain id or `-`")?;
                let id = (id != "-").then(|| ToolchainId::new(id)).transpose()?;
                Ok(Command::Switch(id))
            }
            "expand" => Ok(Command::Expand(
                required(rest, "expand", "a widget name")?.to_string(),
            )),
            "minimize" => Ok(Command::Minimize(
                required(rest, "minimize", "a widget name")?.to_string(),
            )),
            "show" => {
                let name = required(rest, "show", "an overlay name")?;
                OverlayKey::from_name(name)
                    .map(Command::Show)
                    .ok_or_else(|| CommandError::UnknownOverlay(name.to_string()))
            }
            "hide" => Ok(Command::Hide),
            "keep" => Ok(Command::Keep),
            "screen" => {
                let rest = required(rest, "screen", "a screen kind and a message")?;
                let (kind, message) = rest
                    .split_once(char::is_whitespace)
                    .map(|(kind, message)| (kind, message.trim()))
                    .unwrap_or((rest, ""));
                Ok(Command::Screen(parse_screen_kind(kind)?, message.to_string()))
            }
            "error" => {
                let rest = required(rest, "error", "a status code")?;
                let (status, message) = rest
                    .split_once(char::is_whitespace)
                    .map(|(status, message)| (status, message.trim()))
                    .unwrap_or((rest, ""));
                let status = status
                    .parse()
                    .map_err(|_| CommandError::InvalidStatus(status.to_string()))?;
                Ok(Command::ServerError {
                    status,
                    message: message.to_string(),
                })
            }
            "fault" => Ok(Command::Fault(
                required(rest, "fault", "a message")?.to_string(),
            )),
            "esc" => Ok(Command::Escape),
            "click-bg" => Ok(Command::ClickBackground),
            "click-close" => Ok(Command::ClickClose),
            "link" => Ok(Command::Link(FolderId::new(required(
                rest,
                "link",
                "a folder id",
            )?))),
            "state" => Ok(Command::State),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
