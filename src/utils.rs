//! Common utility functions shared across the codebase.

/// 1-based line and column for a byte offset into `text`.
///
/// The column counts characters, not bytes, so reports line up with
/// editor positions.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|pos| pos + 1).unwrap_or(0);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// The full source line containing a byte offset, without the trailing
/// newline.
pub fn source_line(text: &str, offset: usize) -> String {
    let offset = offset.min(text.len());
    let start = text[..offset].rfind('\n').map(|pos| pos + 1).unwrap_or(0);
    let end = text[offset..]
        .find('\n')
        .map(|pos| offset + pos)
        .unwrap_or(text.len());
    text[start..end].trim_end_matches('\r').to_string()
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_line_col_first_line() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("abc", 2), (1, 3));
    }

    #[test]
    fn test_line_col_later_lines() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_col(text, 4), (2, 1));
        assert_eq!(line_col(text, 9), (3, 2));
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        assert_eq!(line_col("ab", 10), (1, 3));
    }

    #[test]
    fn test_source_line() {
        let text = "first\nsecond\nthird";
        assert_eq!(source_line(text, 8), "second");
        assert_eq!(source_line(text, 0), "first");
        assert_eq!(source_line(text, text.len()), "third");
    }
}
