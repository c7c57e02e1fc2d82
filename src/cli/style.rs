//! CLI styling utilities
//!
//! Semantic styling via the [`Stylize`] trait, with terminal color
//! support detection delegated to `owo-colors` (respects `NO_COLOR`,
//! `CLICOLOR`, `CLICOLOR_FORCE`, and TTY detection).

use std::fmt::{self, Display};

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const WARN: Style = Style::new().yellow();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();
const ERROR: Style = Style::new().red();

/// A value with semantic styling applied; renders with ANSI codes when
/// the target stream supports them.
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

const fn styled<T>(value: T, style: Style, stream: Stream) -> Styled<T> {
    Styled {
        value,
        style,
        stream,
    }
}

/// Extension trait for semantic terminal styling.
///
/// Automatically implemented for all [`Display`] types; methods take
/// `&self` so borrowed data can be styled.
pub trait Stylize: Display {
    /// Cyan, for primary information: PR numbers, branch names, URLs
    fn accent(&self) -> Styled<&Self> {
        styled(self, ACCENT, Stream::Stdout)
    }

    /// Green, for completion states
    fn success(&self) -> Styled<&Self> {
        styled(self, SUCCESS, Stream::Stdout)
    }

    /// Yellow, for attention-needed states
    fn warn(&self) -> Styled<&Self> {
        styled(self, WARN, Stream::Stdout)
    }

    /// Red, for failures
    fn error(&self) -> Styled<&Self> {
        styled(self, ERROR, Stream::Stdout)
    }

    /// Dimmed, for hints and secondary information
    fn muted(&self) -> Styled<&Self> {
        styled(self, MUTED, Stream::Stdout)
    }

    /// Bold, for headers and key information
    fn emphasis(&self) -> Styled<&Self> {
        styled(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green checkmark
pub const fn check() -> Styled<&'static str> {
    styled("✓", SUCCESS, Stream::Stdout)
}

/// Red cross
pub const fn cross() -> Styled<&'static str> {
    styled("✗", ERROR, Stream::Stdout)
}

/// Yellow circle for in-flight states
pub const fn dot() -> Styled<&'static str> {
    styled("○", WARN, Stream::Stdout)
}

/// Create a clickable hyperlink showing the URL itself.
///
/// Falls back to plain URL text in terminals without OSC 8 support.
pub fn hyperlink_url(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

use indicatif::ProgressStyle;
use std::sync::OnceLock;

/// Default spinner style - cyan dots
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("hardcoded spinner template is valid")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}
