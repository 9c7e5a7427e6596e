//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream};

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Styling shortcuts that respect whether stdout supports color
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Dimmed
    fn muted(&self) -> String;
    /// Cyan
    fn accent(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Bold red
    fn error(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    fn error(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.red().bold().to_string())
            .to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// `text` as a terminal hyperlink to `url` where supported
pub fn hyperlink(text: &str, url: &str) -> String {
    if !url.is_empty() && supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        text.to_string()
    }
}
