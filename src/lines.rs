//! Paragraph derivation.
//!
//! A paragraph here is a single non-blank line. Blank and whitespace-only
//! lines are separators, not content:
//!
//! ```text
//! "Intro\n\n  \nBody line one\r\nBody line two\n"
//!
//! Paragraph 0: "Intro"
//! Paragraph 1: "Body line one"
//! Paragraph 2: "Body line two"
//! ```
//!
//! ## Line Breaks
//!
//! Text pasted from different editors mixes `\n`, `\r\n` and bare `\r`, and
//! occasionally carries form feeds or Unicode line/paragraph separators. All
//! of them end a line. `\r\n` is split as two breaks; the empty line between
//! them is blank and dropped, so it behaves as one.
//!
//! Paragraph text is returned untrimmed. Interior and leading indentation
//! belongs to the content; chunk assembly trims only the chunk edges.

/// Whether `c` terminates a line.
///
/// `\n`, `\r`, vertical tab, form feed, the file/group/record separators,
/// NEL, and the Unicode line and paragraph separators.
#[must_use]
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Whether `c` counts as blank when trimming lines and chunks.
///
/// Unicode whitespace plus the information separators `\x1c`-`\x1f`, which
/// carry no visible content.
#[must_use]
pub fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Trim [`is_blank`] characters from both ends.
pub(crate) fn trim_blank(s: &str) -> &str {
    s.trim_matches(is_blank)
}

/// Iterator over the paragraphs of a text, in order.
///
/// Created by [`paragraphs`].
#[derive(Debug, Clone)]
pub struct Paragraphs<'a> {
    lines: std::str::Split<'a, fn(char) -> bool>,
}

impl<'a> Iterator for Paragraphs<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find(|line| !trim_blank(line).is_empty())
    }
}

impl std::iter::FusedIterator for Paragraphs<'_> {}

/// Split `text` into its non-blank lines.
///
/// ## Example
///
/// ```rust
/// use paraslab::paragraphs;
///
/// let paras: Vec<&str> = paragraphs("one\r\n\r\n  two\n \t\nthree").collect();
/// assert_eq!(paras, ["one", "  two", "three"]);
///
/// assert_eq!(paragraphs("\n\n  \n").count(), 0);
/// ```
#[must_use]
pub fn paragraphs(text: &str) -> Paragraphs<'_> {
    Paragraphs {
        lines: text.split(is_line_break as fn(char) -> bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<&str> {
        paragraphs(text).collect()
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(collect("").is_empty());
        assert!(collect("   ").is_empty());
        assert!(collect("\n\n  \n").is_empty());
        assert!(collect("\t\r\n\u{3000}\n").is_empty());
    }

    #[test]
    fn test_separator_only_lines_are_blank() {
        assert_eq!(collect("a\n\u{1f}\nb"), ["a", "b"]);
        assert_eq!(collect("a\n \u{1f}\t\nb"), ["a", "b"]);
        assert!(collect("\u{1f}").is_empty());
    }

    #[test]
    fn test_trim_blank() {
        assert_eq!(trim_blank("\u{1f} a b \u{1f}\n"), "a b");
        assert_eq!(trim_blank("a\u{1f}b"), "a\u{1f}b");
        assert_eq!(trim_blank("\u{1f}\u{3000}"), "");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(collect("hello"), ["hello"]);
    }

    #[test]
    fn test_mixed_line_endings() {
        assert_eq!(collect("a\r\nb\rc\nd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unicode_separators() {
        assert_eq!(
            collect("a\u{2028}b\u{2029}c\u{85}d\u{0c}e"),
            ["a", "b", "c", "d", "e"]
        );
    }

    #[test]
    fn test_indentation_preserved() {
        assert_eq!(collect("  indented\n\ttabbed  "), ["  indented", "\ttabbed  "]);
    }

    #[test]
    fn test_order_preserved() {
        let text = "third\n\nfirst\nsecond";
        assert_eq!(collect(text), ["third", "first", "second"]);
    }
}
