//! Common utilities for the Discord dispatcher
//!
//! Log masking, public error sanitizing and message splitting.

/// Maximum length of text to log
pub const MAX_LOG_TEXT_LENGTH: usize = 80;

/// Maximum length of error message to show publicly (longer = likely internal)
pub const MAX_SAFE_ERROR_LENGTH: usize = 100;

/// Discord message character limit
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Patterns that indicate potentially sensitive content
pub const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "secret",
    "token",
    "api_key",
    "bearer",
    "authorization",
];

/// Mask potentially sensitive text for logging
///
/// Strike reasons are free text typed by staff, so they are redacted when
/// they look like credentials and truncated when long.
///
/// # Examples
/// ```
/// use strikebot_channels::util::mask_for_logging;
///
/// assert!(mask_for_logging("posted his bot token in #general").contains("REDACTED"));
/// assert_eq!(mask_for_logging("!strikes"), "!strikes");
/// ```
#[must_use]
pub fn mask_for_logging(text: &str) -> String {
    let lower = text.to_lowercase();

    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "[REDACTED - potentially sensitive content]".to_string();
    }

    if text.chars().count() > MAX_LOG_TEXT_LENGTH {
        let head: String = text.chars().take(MAX_LOG_TEXT_LENGTH).collect();
        format!("{}...[truncated]", head)
    } else {
        text.to_string()
    }
}

/// Sanitize error messages before posting them in a channel
///
/// # Examples
/// ```
/// use strikebot_channels::util::sanitize_error_for_user;
///
/// let sanitized = sanitize_error_for_user("failed to write /srv/bot/strikes.json");
/// assert!(!sanitized.contains("/srv"));
/// assert_eq!(sanitize_error_for_user("Unknown Member"), "Unknown Member");
/// ```
#[must_use]
pub fn sanitize_error_for_user(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("token") || lower.contains("unauthorized") || lower.contains("forbidden") {
        return "An authentication error occurred. Please check the bot configuration.".to_string();
    }

    if lower.contains("connection") || lower.contains("timeout") || lower.contains("network") {
        return "A network error occurred. Please try again later.".to_string();
    }

    if error.len() > MAX_SAFE_ERROR_LENGTH || error.contains('/') || error.contains('\\') {
        return "An internal error occurred. Please try again.".to_string();
    }

    error.to_string()
}

/// Split text into messages no longer than `limit` characters
///
/// Breaks on line boundaries where possible; a single line longer than the
/// limit is split on character boundaries.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
