//! Minimal markdown-to-HTML conversion for bot messages.
//!
//! Supports `**bold**`, `*italic*` and lines starting with `* ` as list
//! items. Anything else passes through untouched, including raw HTML.
//! The output is not meant to be fed back in: rendering already rendered
//! markup wraps tags twice, so callers always render the accumulated plain
//! text.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\r\n]*?)\*\*").expect("bold pattern is valid"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^\* ([^\r\n]*)$").expect("bullet pattern is valid"));

const LIST_SEAM: &str = "</ul>\n<ul>";

/// Converts `text` to display markup.
///
/// Rules run in a fixed order over the previous rule's output: bold,
/// italic, bullet lines, then adjacent lists are merged into one.
pub fn render_markdown(text: &str) -> String {
    let bolded = BOLD.replace_all(text, "<strong>${1}</strong>");
    let italicised = replace_italic(&bolded);
    let listed = BULLET.replace_all(&italicised, "<ul><li>${1}</li></ul>");
    listed.replace(LIST_SEAM, "")
}

/// Wraps `*x*` in `<em>` where neither asterisk is followed by another `*`.
///
/// The match is the shortest one on a single line, so the content is never
/// empty and never crosses a `\n` or `\r`.
fn replace_italic(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) != Some(&b'*') {
            if let Some(close) = closing_asterisk(bytes, i + 1) {
                out.push_str(&text[copied..i]);
                out.push_str("<em>");
                out.push_str(&text[i + 1..close]);
                out.push_str("</em>");
                i = close + 1;
                copied = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&text[copied..]);
    out
}

fn closing_asterisk(bytes: &[u8], from: usize) -> Option<usize> {
    for (offset, &b) in bytes[from..].iter().enumerate() {
        let j = from + offset;
        match b {
            b'\n' | b'\r' => return None,
            b'*' if bytes.get(j + 1) != Some(&b'*') => return Some(j),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render_markdown("Hello, world"), "Hello, world");
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn bold_is_wrapped() {
        assert_eq!(
            render_markdown("**Machine Learning** is a subset"),
            "<strong>Machine Learning</strong> is a subset"
        );
    }

    #[test]
    fn bold_is_lazy() {
        assert_eq!(
            render_markdown("**AI** and **ML**"),
            "<strong>AI</strong> and <strong>ML</strong>"
        );
    }

    #[test]
    fn italic_is_wrapped() {
        assert_eq!(render_markdown("a *quick* note"), "a <em>quick</em> note");
    }

    #[test]
    fn italic_does_not_consume_bold() {
        assert_eq!(
            render_markdown("**bold** and *soft*"),
            "<strong>bold</strong> and <em>soft</em>"
        );
    }

    #[test]
    fn italic_closer_cannot_be_followed_by_asterisk() {
        assert_eq!(render_markdown("*a** b*"), "<em>a*</em> b*");
    }

    #[test]
    fn italic_never_spans_lines() {
        assert_eq!(render_markdown("*open\nclose*"), "*open\nclose*");
    }

    #[test]
    fn carriage_return_ends_a_line() {
        assert_eq!(render_markdown("*\r**"), "*\r**");
        assert_eq!(render_markdown("*open\rclose*"), "*open\rclose*");
        assert_eq!(render_markdown("**open\rclose**"), "**open\rclose**");
    }

    #[test]
    fn crlf_bullets_stop_before_carriage_return() {
        assert_eq!(
            render_markdown("* a\r\n* b"),
            "<ul><li>a</li></ul>\r\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn unmatched_asterisk_is_literal() {
        assert_eq!(render_markdown("2 * 3 = 6"), "2 * 3 = 6");
    }

    #[test]
    fn single_bullet_becomes_list() {
        assert_eq!(render_markdown("* item"), "<ul><li>item</li></ul>");
    }

    #[test]
    fn adjacent_bullets_share_one_list() {
        let html = render_markdown("* a\n* b");
        assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn separated_bullets_get_separate_lists() {
        assert_eq!(
            render_markdown("* a\n\n* b"),
            "<ul><li>a</li></ul>\n\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn bullets_keep_inline_bold() {
        assert_eq!(
            render_markdown("Topics:\n* **Bias** in data\n* **Privacy**"),
            "Topics:\n<ul><li><strong>Bias</strong> in data</li><li><strong>Privacy</strong></li></ul>"
        );
    }

    #[test]
    fn italic_runs_before_bullets() {
        assert_eq!(render_markdown("* a *b*"), "<em> a </em>b*");
    }

    #[test]
    fn other_syntax_is_literal() {
        assert_eq!(render_markdown("# Title\n`code`"), "# Title\n`code`");
    }
}
