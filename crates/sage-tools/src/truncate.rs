//! UTF-8-safe truncation of tool output.

/// Truncate a string at the nearest char boundary at or before `max_bytes`.
///
/// ```
/// use sage_tools::truncate_at_char_boundary;
///
/// assert_eq!(truncate_at_char_boundary("hello world", 5), "hello");
/// // 'é' is two bytes; cutting inside it backs off to the previous boundary.
/// assert_eq!(truncate_at_char_boundary("café", 4), "caf");
/// ```
#[must_use]
pub fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    &s[..end]
}

/// Cap `output` at `max_bytes`, appending a notice when anything was cut.
#[must_use]
pub fn truncate_output(output: String, max_bytes: usize) -> String {
    if output.len() <= max_bytes {
        return output;
    }
    let mut truncated = truncate_at_char_boundary(&output, max_bytes).to_string();
    truncated.push_str(&format!(
        "\n\n... (content truncated, exceeded {max_bytes} character limit)"
    ));
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_unchanged() {
        assert_eq!(truncate_output("hello".into(), 100), "hello");
        assert_eq!(truncate_output("x".repeat(10), 10), "x".repeat(10));
    }

    #[test]
    fn long_output_gets_notice() {
        let result = truncate_output("x".repeat(400), 100);
        assert!(result.starts_with(&"x".repeat(100)));
        assert!(!result.starts_with(&"x".repeat(101)));
        assert!(result.ends_with("exceeded 100 character limit)"));
    }

    #[test]
    fn multibyte_boundary() {
        let mut s = "x".repeat(98);
        s.push('🦀');
        assert_eq!(truncate_at_char_boundary(&s, 100), "x".repeat(98));
        assert_eq!(truncate_at_char_boundary("", 0), "");
    }
}
