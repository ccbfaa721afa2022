//! Duration-string parsing and formatting.
//!
//! The CLI accepts segment lengths in several human forms: plain seconds
//! (`1200`, `90s`), unit suffixes (`20m`, `1h30m`), and clock notation
//! (`1:30:00`, `MM:SS`).

use thiserror::Error;

/// Duration parsing error.
#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("Empty duration string")]
    Empty,

    #[error("Unable to parse duration string: {0}")]
    Unparseable(String),
}

/// Parse a duration string to whole seconds.
///
/// Supported forms:
/// - `"1200"` or `"1200s"` → 1200
/// - `"20m"` → 1200, `"1h30m"` → 5400, `"1h2m3s"` → 3723
/// - `"1:30:00"` → 5400, `"05:30"` → 330
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    // Plain seconds.
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s
            .parse()
            .map_err(|_| DurationError::Unparseable(input.to_string()));
    }

    // Clock notation HH:MM:SS or MM:SS.
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        let nums: Option<Vec<u64>> = parts.iter().map(|p| p.parse().ok()).collect();
        return match nums.as_deref() {
            Some([h, m, sec]) => Ok(h * 3600 + m * 60 + sec),
            Some([m, sec]) => Ok(m * 60 + sec),
            _ => Err(DurationError::Unparseable(input.to_string())),
        };
    }

    // Unit suffixes: any of <N>h, <N>m, <N>s in order.
    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut matched = false;
    for c in s.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'h' | 'm' | 's' => {
                let value: u64 = digits
                    .parse()
                    .map_err(|_| DurationError::Unparseable(input.to_string()))?;
                digits.clear();
                matched = true;
                total += match c {
                    'h' => value * 3600,
                    'm' => value * 60,
                    _ => value,
                };
            }
            c if c.is_whitespace() => {}
            _ => return Err(DurationError::Unparseable(input.to_string())),
        }
    }

    if !matched || !digits.is_empty() {
        return Err(DurationError::Unparseable(input.to_string()));
    }
    Ok(total)
}

/// Format seconds as a human-readable duration (`1h 2m 3s`).
pub fn format_duration(total_secs: f64) -> String {
    let total = total_secs.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_seconds() {
        assert_eq!(parse_duration("1200").unwrap(), 1200);
        assert_eq!(parse_duration("90s").unwrap(), 90);
        assert_eq!(parse_duration("0").unwrap(), 0);
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(parse_duration("20m").unwrap(), 1200);
        assert_eq!(parse_duration("2h").unwrap(), 7200);
        assert_eq!(parse_duration("1h30m").unwrap(), 5400);
        assert_eq!(parse_duration("1h2m3s").unwrap(), 3723);
        assert_eq!(parse_duration("1h 30m").unwrap(), 5400);
    }

    #[test]
    fn test_clock_notation() {
        assert_eq!(parse_duration("1:30:00").unwrap(), 5400);
        assert_eq!(parse_duration("05:30").unwrap(), 330);
        assert_eq!(parse_duration("00:00:45").unwrap(), 45);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert!(matches!(
            parse_duration("abc"),
            Err(DurationError::Unparseable(_))
        ));
        assert!(matches!(
            parse_duration("1:2:3:4"),
            Err(DurationError::Unparseable(_))
        ));
        assert!(matches!(
            parse_duration("20x"),
            Err(DurationError::Unparseable(_))
        ));
        // Trailing digits without a unit are ambiguous.
        assert!(matches!(
            parse_duration("1h30"),
            Err(DurationError::Unparseable(_))
        ));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(330.0), "5m 30s");
        assert_eq!(format_duration(5445.0), "1h 30m 45s");
        assert_eq!(format_duration(3600.0), "1h 0m 0s");
    }
}
