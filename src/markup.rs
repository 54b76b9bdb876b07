//! Markup classification primitives.
//!
//! Tag scanning is regex based: the functions here classify markup the host
//! already rendered, they never build a DOM and never produce markup.
//! Every function allocates a fresh string and none of them fail; malformed
//! input degrades to a best-effort result.

use std::sync::LazyLock;

use regex::Regex;

/// Tags that carry meaning a plaintext projection would lose.
///
/// Inline emphasis, headings, lists, tables, code and quote blocks, images
/// and links. Everything else (paragraphs, line breaks, layout containers) is
/// decoration.
pub const SEMANTIC_TAGS: &[&str] = &[
    "a",
    "abbr",
    "b",
    "blockquote",
    "cite",
    "code",
    "dd",
    "del",
    "dl",
    "dt",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "i",
    "img",
    "ins",
    "kbd",
    "li",
    "ol",
    "pre",
    "q",
    "s",
    "strike",
    "strong",
    "sub",
    "sup",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "u",
    "ul",
];

/// Tags whose removal must leave a word break behind.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*>").unwrap());

// Elements whose text content is never visible.
static RAW_TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

/// Removes `<!-- ... -->` comments, including multi-line ones.
pub fn strip_comments(input: &str) -> String {
    COMMENT.replace_all(input, "").into_owned()
}

/// Strips every tag except those named in `keep`.
///
/// Kept tags are copied through verbatim, attributes included. Text content
/// of stripped tags is preserved. Removing a block-level tag leaves a single
/// space between the surrounding words, never a leading or trailing one.
///
/// # Examples
///
/// ```
/// use content_exposure::markup::strip_tags_except;
///
/// let out = strip_tags_except("<p>Hi <em>there</em></p><p>you</p>", &["em"]);
/// assert_eq!(out, "Hi <em>there</em> you");
/// ```
pub fn strip_tags_except(input: &str, keep: &[&str]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_break = false;
    let mut last = 0;

    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &input[last..whole.start()], &mut pending_break);
        last = whole.end();

        let name = caps[1].to_ascii_lowercase();
        if keep.contains(&name.as_str()) {
            push_text(&mut out, whole.as_str(), &mut pending_break);
        } else if BLOCK_TAGS.contains(&name.as_str()) {
            pending_break = true;
        }
    }

    push_text(&mut out, &input[last..], &mut pending_break);
    out
}

fn push_text(out: &mut String, text: &str, pending_break: &mut bool) {
    if text.is_empty() {
        return;
    }
    if *pending_break
        && !out.is_empty()
        && !out.ends_with(char::is_whitespace)
        && !text.starts_with(char::is_whitespace)
    {
        out.push(' ');
    }
    *pending_break = false;
    out.push_str(text);
}

/// Strips every tag.
pub fn strip_all_tags(input: &str) -> String {
    strip_tags_except(input, &[])
}

/// Collapses whitespace runs to single spaces and trims both ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Projects rendered content to plain text.
///
/// Decodes numeric and named HTML entities, drops `script` and `style`
/// elements along with their contents, strips the remaining markup and trims
/// the result.
///
/// # Examples
///
/// ```
/// use content_exposure::markup::to_plaintext;
///
/// assert_eq!(to_plaintext("<p>Tom &amp; Jerry</p>"), "Tom & Jerry");
/// assert_eq!(to_plaintext("<p>Hello <script>bad()</script></p>"), "Hello");
/// assert_eq!(to_plaintext("<p>one</p><p>two</p>"), "one two");
/// ```
pub fn to_plaintext(rendered: &str) -> String {
    let decoded = html_escape::decode_html_entities(rendered);
    let uncommented = COMMENT.replace_all(&decoded, "");
    let visible = RAW_TEXT_ELEMENT.replace_all(&uncommented, "");

    strip_all_tags(&visible).trim().to_string()
}

/// Does `raw` carry semantic markup that `plaintext` lost?
///
/// Comments are removed, everything outside [`SEMANTIC_TAGS`] is stripped,
/// and the result is compared with `plaintext` after whitespace collapsing.
/// Any difference means meaningful markup (or hidden text such as a script
/// body) is present.
///
/// # Examples
///
/// ```
/// use content_exposure::markup::{detects_markup, to_plaintext};
///
/// let decorated = "<div><p>just text</p></div>";
/// assert!(!detects_markup(decorated, &to_plaintext(decorated)));
///
/// let emphasized = "<p>some <strong>bold</strong> text</p>";
/// assert!(detects_markup(emphasized, &to_plaintext(emphasized)));
/// ```
pub fn detects_markup(raw: &str, plaintext: &str) -> bool {
    let uncommented = strip_comments(raw);
    let semantic = strip_tags_except(&uncommented, SEMANTIC_TAGS);

    collapse_whitespace(&semantic) != collapse_whitespace(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_comments_spans_lines() {
        let input = "before<!-- one\ntwo\nthree -->after";

        assert_eq!(strip_comments(input), "beforeafter");
    }

    #[test]
    fn strip_comments_is_not_greedy() {
        let input = "a<!-- x -->b<!-- y -->c";

        assert_eq!(strip_comments(input), "abc");
    }

    #[test]
    fn strip_all_tags_breaks_words_at_block_boundaries() {
        assert_eq!(strip_all_tags("<p>Hello</p><p>World</p>"), "Hello World");
        assert_eq!(strip_all_tags("line<br>next"), "line next");
        assert_eq!(strip_all_tags("line<br/>next"), "line next");
    }

    #[test]
    fn strip_all_tags_keeps_inline_words_together() {
        assert_eq!(strip_all_tags("Hel<span>lo</span>"), "Hello");
        assert_eq!(strip_all_tags("<a href=\"x\">link</a>ed"), "linked");
    }

    #[test]
    fn strip_all_tags_reuses_existing_whitespace() {
        assert_eq!(strip_all_tags("a </p><p> b"), "a  b");
        assert_eq!(strip_all_tags("a</p>\n<p>b"), "a\nb");
        assert_eq!(strip_all_tags("<p>edge</p>"), "edge");
    }

    #[test]
    fn strip_all_tags_leaves_stray_angle_brackets() {
        assert_eq!(strip_all_tags("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn strip_tags_except_keeps_attributes_of_kept_tags() {
        let input = r#"<div class="x"><a href="https://example.com" title="t">go</a></div>"#;

        assert_eq!(
            strip_tags_except(input, SEMANTIC_TAGS),
            r#"<a href="https://example.com" title="t">go</a>"#
        );
    }

    #[test]
    fn strip_tags_except_matches_case_insensitively() {
        assert_eq!(strip_tags_except("<EM>x</EM><P>y", &["em"]), "<EM>x</EM> y");
    }

    #[test]
    fn collapse_whitespace_normalizes_runs() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace("a\u{a0}b"), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn to_plaintext_decodes_named_and_numeric_entities() {
        assert_eq!(to_plaintext("caf&eacute; &#8212; &#x263A;"), "café — ☺");
        assert_eq!(to_plaintext("&hellip;&nbsp;done"), "…\u{a0}done");
    }

    #[test]
    fn to_plaintext_strips_decoded_markup() {
        assert_eq!(to_plaintext("&lt;b&gt;bold&lt;/b&gt;"), "bold");
    }

    #[test]
    fn to_plaintext_drops_script_and_style_bodies() {
        let input = "<style>p { color: red }</style><p>Text</p><SCRIPT type=\"x\">\nrun()\n</SCRIPT>";

        assert_eq!(to_plaintext(input), "Text");
    }

    #[test]
    fn to_plaintext_drops_comments() {
        assert_eq!(to_plaintext("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn to_plaintext_trims() {
        assert_eq!(to_plaintext("  \n<p> spaced </p>\n "), "spaced");
    }

    #[test]
    fn to_plaintext_on_unterminated_tag_is_best_effort() {
        assert_eq!(to_plaintext("text <b unclosed"), "text <b unclosed");
    }

    #[test]
    fn decoration_only_is_not_markup() {
        let rendered = "<div>\n<p>First paragraph.</p>\n<p>Second<br />line.</p>\n</div>";

        assert!(!detects_markup(rendered, &to_plaintext(rendered)));
    }

    #[test]
    fn semantic_tags_are_markup() {
        for rendered in [
            "<p>see <a href=\"https://example.com\">this</a></p>",
            "<h2>Heading</h2>",
            "<ul><li>one</li></ul>",
            "<pre><code>let x = 1;</code></pre>",
            "<img src=\"a.png\" alt=\"\">",
        ] {
            assert!(
                detects_markup(rendered, &to_plaintext(rendered)),
                "expected markup in {rendered}"
            );
        }
    }

    #[test]
    fn script_with_attributes_is_markup() {
        let rendered = "<p>Hi</p><script type=\"text/javascript\">alert(1)</script>";

        assert!(detects_markup(rendered, &to_plaintext(rendered)));
    }

    #[test]
    fn comments_do_not_count_as_markup() {
        let rendered = "<p>plain<!-- wp:paragraph --> text</p>";

        assert!(!detects_markup(rendered, &to_plaintext(rendered)));
    }

    #[test]
    fn whitespace_differences_are_ignored() {
        assert!(!detects_markup("<p>a\n\n   b</p>", "a b"));
    }
}
