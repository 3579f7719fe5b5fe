//! Terminal output helpers: ANSI styling and one-line notes.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Info,
    Warn,
    Error,
    Success,
}

impl Note {
    fn style(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Note::Info => (CYAN, "ℹ", "INFO"),
            Note::Warn => (YELLOW, "⚠", "WARN"),
            Note::Error => (RED, "✗", "ERROR"),
            Note::Success => (GREEN, "✓", "OK"),
        }
    }
}

/// Render a note with or without ANSI styling.
pub fn format_note(kind: Note, msg: &str, color: bool) -> String {
    let (tint, glyph, label) = kind.style();
    if color {
        format!("{tint}{BOLD}{glyph}{RESET} {msg}")
    } else {
        format!("{label}: {msg}")
    }
}

pub fn note(kind: Note, msg: &str) {
    let line = format_note(kind, msg, supports_color());
    if kind == Note::Error {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn note_info(msg: &str) {
    note(Note::Info, msg);
}

pub fn note_warn(msg: &str) {
    note(Note::Warn, msg);
}

pub fn note_error(msg: &str) {
    note(Note::Error, msg);
}

pub fn note_success(msg: &str) {
    note(Note::Success, msg);
}
