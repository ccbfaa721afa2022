//! Output file naming.
//!
//! Resolves naming patterns like `{title}_part{index:02d}_{date}` by literal
//! token replacement. The zero-padding token deliberately never reaches a
//! generic format-string evaluator: its `:02d` spec reads as a formatting
//! directive to most template engines and errors out, so `{index...}` tokens
//! are located and expanded by hand before the plain `{title}`/`{date}`
//! substring replacements run.

use thiserror::Error;

/// Naming resolution errors; structural, raised before a job starts.
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Unresolved placeholder in naming pattern: {0}")]
    UnresolvedPlaceholder(String),

    #[error("Invalid index padding spec '{0}', expected 0Nd (e.g. 02d)")]
    InvalidIndexWidth(String),

    #[error("Naming pattern resolves to the same file name twice: {0}")]
    FilenameCollision(String),
}

/// Resolve a naming pattern for one segment.
///
/// Supported placeholders:
/// - `{title}`  — sanitized source basename (caller sanitizes)
/// - `{index}`  — 1-based segment index, unpadded
/// - `{index:0Nd}` — index zero-padded to width N
/// - `{date}`   — compact date string (`YYYYMMDD`)
pub fn resolve_name(
    pattern: &str,
    index: u32,
    title: &str,
    date: &str,
) -> Result<String, NamingError> {
    let mut out = pattern.to_string();

    // Expand every {index...} token first.
    while let Some(start) = out.find("{index") {
        let close = out[start..]
            .find('}')
            .map(|rel| start + rel)
            .ok_or_else(|| NamingError::UnresolvedPlaceholder(out[start..].to_string()))?;
        let inner = &out[start + 1..close];

        let formatted = match inner.split_once(':') {
            None if inner == "index" => index.to_string(),
            Some(("index", spec)) => {
                let width = parse_pad_spec(spec)
                    .ok_or_else(|| NamingError::InvalidIndexWidth(spec.to_string()))?;
                format!("{:0width$}", index, width = width)
            }
            _ => {
                return Err(NamingError::UnresolvedPlaceholder(format!(
                    "{{{}}}",
                    inner
                )))
            }
        };
        out.replace_range(start..=close, &formatted);
    }

    out = out.replace("{title}", title);
    out = out.replace("{date}", date);

    if let Some(token) = first_brace_token(&out) {
        return Err(NamingError::UnresolvedPlaceholder(token));
    }

    Ok(out)
}

/// Parse a `0Nd` padding spec into the width N.
fn parse_pad_spec(spec: &str) -> Option<usize> {
    let digits = spec.strip_suffix('d')?.strip_prefix('0')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Find the first remaining `{...}` token, if any.
fn first_brace_token(s: &str) -> Option<String> {
    let start = s.find('{')?;
    match s[start..].find('}') {
        Some(rel) => Some(s[start..=start + rel].to_string()),
        None => Some(s[start..].to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_full_pattern() {
        let name = resolve_name("{title}_part{index:02d}_{date}", 3, "stream", "20250115").unwrap();
        assert_eq!(name, "stream_part03_20250115");
    }

    #[test]
    fn test_padding_applies_to_small_index() {
        // A naive format-string evaluator either errors on ":02d" or emits
        // "7"; the literal tokenizer must produce "07".
        let name = resolve_name("{index:02d}", 7, "x", "20250115").unwrap();
        assert_eq!(name, "07");
    }

    #[test]
    fn test_wider_padding() {
        let name = resolve_name("seg_{index:04d}", 12, "x", "20250115").unwrap();
        assert_eq!(name, "seg_0012");
    }

    #[test]
    fn test_unpadded_index() {
        let name = resolve_name("{title}-{index}", 11, "vod", "20250115").unwrap();
        assert_eq!(name, "vod-11");
    }

    #[test]
    fn test_index_wider_than_pad_width() {
        let name = resolve_name("{index:02d}", 123, "x", "20250115").unwrap();
        assert_eq!(name, "123");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = resolve_name("{title}_{channel}", 1, "t", "20250115").unwrap_err();
        assert!(matches!(err, NamingError::UnresolvedPlaceholder(ref tok) if tok == "{channel}"));
    }

    #[test]
    fn test_bad_pad_spec_rejected() {
        assert!(matches!(
            resolve_name("{index:2d}", 1, "t", "20250115"),
            Err(NamingError::InvalidIndexWidth(_))
        ));
        assert!(matches!(
            resolve_name("{index:0xd}", 1, "t", "20250115"),
            Err(NamingError::InvalidIndexWidth(_))
        ));
    }

    #[test]
    fn test_unclosed_brace_rejected() {
        assert!(matches!(
            resolve_name("{title}_{index:02d", 1, "t", "20250115"),
            Err(NamingError::UnresolvedPlaceholder(_))
        ));
    }

    #[test]
    fn test_literal_text_untouched() {
        let name = resolve_name("part{index}", 2, "ignored", "ignored").unwrap();
        assert_eq!(name, "part2");
    }
}
