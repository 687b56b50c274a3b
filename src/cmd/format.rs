/*!
format.rs

Styling helpers for human-facing diagnostics (`kcompose: ...` lines on stderr
and the plain `--dry-run` rendering).

  - StyleOptions::detect() -> StyleOptions
  - color(role, text, &StyleOptions) -> String
  - emoji(tag, &StyleOptions) -> &'static str
  - diagnostic(role, tag, message, &StyleOptions) -> String

Styling is off when stderr is not a terminal, or when NO_COLOR / NO_EMOJI is
set. Machine output (`--json`) never goes through here.
*/

use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        let tty = std::io::stderr().is_terminal();
        StyleOptions {
            use_color: tty && std::env::var_os("NO_COLOR").is_none(),
            use_emoji: tty && std::env::var_os("NO_EMOJI").is_none(),
        }
    }

    /// No color, no emoji.
    #[cfg(test)]
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Warning,
    Error,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Warning => "38;5;214", // orange
        Role::Error => "38;5;196",   // red
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "error" => "✖",
        "warn" => "⚠",
        "info" => "ℹ",
        _ => "",
    }
}

/// `kcompose: <message>` with optional emoji prefix and role color.
pub fn diagnostic(
    role: Role,
    tag: &str,
    message: impl AsRef<str>,
    style: &StyleOptions,
) -> String {
    let icon = emoji(tag, style);
    let prefix = if icon.is_empty() {
        "kcompose:".to_string()
    } else {
        format!("{icon} kcompose:")
    };
    format!("{} {}", color(role, prefix, style), message.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */
