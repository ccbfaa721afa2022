//! Shared helper functions.

/// Maximum length of a sanitized title.
const MAX_TITLE_LEN: usize = 100;

/// Sanitize a source title for use inside output file names.
///
/// Strips characters that are invalid on common filesystems
/// (`< > : " / \ | ? *` and control characters), trims leading/trailing
/// dots and spaces, and collapses whitespace/underscore runs into a single
/// underscore. An empty result becomes `"unnamed"`.
pub fn sanitize_title(title: &str) -> String {
    let mut cleaned = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => cleaned.push('_'),
            c if c.is_control() => {}
            c => cleaned.push(c),
        }
    }

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == ' ');

    // Collapse runs of whitespace and underscores.
    let mut out = String::with_capacity(trimmed.len());
    let mut last_sep = false;
    for c in trimmed.chars() {
        if c.is_whitespace() || c == '_' {
            if !last_sep {
                out.push('_');
                last_sep = true;
            }
        } else {
            out.push(c);
            last_sep = false;
        }
    }
    let out = out.trim_matches('_').to_string();

    if out.is_empty() {
        return "unnamed".to_string();
    }
    out.chars().take(MAX_TITLE_LEN).collect()
}

/// Format bytes as a human-readable string (KB, MB, GB).
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
