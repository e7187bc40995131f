//! User-facing status output.
//!
//! Every line createc prints for the user goes through [`Shell`]:
//! `{status:>12} {message}` on stderr, with the status word colored from a
//! [`Palette`] built from configuration. The palette is owned by the shell
//! instance; there is no process-wide color state.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::str::FromStr;

use crate::util::config::{ColorSettings, ConfigError};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// Also print commands as they are run
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

/// A named terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// Leave the text uncolored
    None,
}

impl Color {
    fn ansi_code(&self) -> Option<&'static str> {
        match self {
            Color::Black => Some("\x1b[1;30m"),
            Color::Red => Some("\x1b[1;31m"),
            Color::Green => Some("\x1b[1;32m"),
            Color::Yellow => Some("\x1b[1;33m"),
            Color::Blue => Some("\x1b[1;34m"),
            Color::Magenta => Some("\x1b[1;35m"),
            Color::Cyan => Some("\x1b[1;36m"),
            Color::White => Some("\x1b[1;37m"),
            Color::None => None,
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),
            "none" => Ok(Color::None),
            _ => Err(s.to_string()),
        }
    }
}

/// Colors per status role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    pub progress: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            info: Color::Blue,
            warning: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            progress: Color::Cyan,
        }
    }
}

impl Palette {
    /// Build a palette from configured color names.
    ///
    /// Fails on the first name that is not a known color.
    pub fn from_settings(settings: &ColorSettings) -> Result<Self, ConfigError> {
        fn pick(
            key: &'static str,
            name: &Option<String>,
            default: Color,
        ) -> Result<Color, ConfigError> {
            match name {
                Some(name) => name
                    .parse()
                    .map_err(|value| ConfigError::UnknownColor { key, value }),
                None => Ok(default),
            }
        }

        let defaults = Palette::default();
        Ok(Palette {
            info: pick("info", &settings.info, defaults.info)?,
            warning: pick("warning", &settings.warning, defaults.warning)?,
            error: pick("error", &settings.error, defaults.error)?,
            success: pick("success", &settings.success, defaults.success)?,
            progress: pick("progress", &settings.progress, defaults.progress)?,
        })
    }

    fn color_for(&self, status: Status) -> Color {
        match status {
            Status::Finished | Status::Removed | Status::Installed | Status::Uninstalled => {
                self.success
            }
            Status::Building | Status::Running | Status::Installing => self.progress,
            Status::Info => self.info,
            Status::Skipped | Status::Warning => self.warning,
            Status::Error => self.error,
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Finished,
    Removed,
    Installed,
    Uninstalled,

    Building,
    Running,
    Installing,

    Info,

    Skipped,
    Warning,

    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Installed => "Installed",
            Status::Uninstalled => "Uninstalled",
            Status::Building => "Building",
            Status::Running => "Running",
            Status::Installing => "Installing",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug, Clone)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    palette: Palette,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice, palette: Palette) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            palette,
        }
    }

    /// A shell that prints errors only. Used by tests.
    pub fn quiet() -> Self {
        Shell::new(Verbosity::Quiet, ColorChoice::Never, Palette::default())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// In quiet mode, only Error status is printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.verbosity == Verbosity::Quiet && status != Status::Error {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print a status message only in verbose mode.
    pub fn verbose(&self, status: Status, msg: impl Display) {
        if self.is_verbose() {
            self.status(status, msg);
        }
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        match self.palette.color_for(status).ansi_code() {
            Some(code) if self.use_color => format!("{}{:>12}\x1b[0m", code, text),
            _ => format!("{:>12}", text),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto, Palette::default())
    }
}
