use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blocks::{Block, Line};

const BULLET_LIST_OPEN: &str = r#"<ul class="recipe-list">"#;
const BULLET_LIST_CLOSE: &str = "</ul>";
const STEP_LIST_OPEN: &str = r#"<ol class="recipe-steps">"#;
const STEP_LIST_CLOSE: &str = "</ol>";

// Bold runs before italic so `**` is never split into two `*` spans.
static INLINE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
        (r"__(.+?)__", "<strong>${1}</strong>"),
        (r"\*(.+?)\*", "<em>${1}</em>"),
        (r"_(.+?)_", "<em>${1}</em>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("inline pattern is valid"),
            replacement,
        )
    })
    .collect()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Escape HTML special characters in the text before adding markup.
    pub escape_html: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullets,
    Steps,
}

impl ListKind {
    fn of(block: &Block<'_>) -> Option<Self> {
        match block {
            Block::Bullet(_) => Some(ListKind::Bullets),
            Block::Step(_) => Some(ListKind::Steps),
            _ => None,
        }
    }

    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            ListKind::Bullets => (BULLET_LIST_OPEN, BULLET_LIST_CLOSE),
            ListKind::Steps => (STEP_LIST_OPEN, STEP_LIST_CLOSE),
        }
    }
}

/// Maps classified lines to markup.
///
/// Lines stay separated by `\n` exactly as in the input. Consecutive list
/// items share one wrapper, and the separator after the last item of a run
/// stays inside that wrapper.
pub fn render(lines: &[Line<'_>], options: &RenderOptions) -> String {
    let mut out = String::new();
    let mut open_list: Option<ListKind> = None;

    for (index, line) in lines.iter().enumerate() {
        let kind = ListKind::of(&line.block);

        if kind != open_list {
            if let Some(previous) = open_list {
                out.push_str(previous.delimiters().1);
            }
            if let Some(next) = kind {
                out.push_str(next.delimiters().0);
            }
            open_list = kind;
        }

        render_block(&mut out, &line.block, options);
        if line.carriage_return {
            out.push('\r');
        }
        if index + 1 < lines.len() {
            out.push('\n');
        }
    }

    if let Some(kind) = open_list {
        out.push_str(kind.delimiters().1);
    }

    out
}

fn render_block(out: &mut String, block: &Block<'_>, options: &RenderOptions) {
    match block {
        Block::Heading { level, text } => {
            let tag = level.tag();
            out.push_str(&format!(
                r#"<{tag} class="recipe-{tag}">{}</{tag}>"#,
                inline(text, options)
            ));
        }
        Block::Bullet(text) => {
            out.push_str(&format!(
                r#"<li class="recipe-bullet">{}</li>"#,
                inline(text, options)
            ));
        }
        Block::Step(text) => {
            out.push_str(&format!(
                r#"<li class="recipe-step">{}</li>"#,
                inline(text, options)
            ));
        }
        Block::Paragraph(text) => out.push_str(&inline(text, options)),
    }
}

/// Applies bold then italic spans to a single line of content.
pub fn inline<'a>(text: &'a str, options: &RenderOptions) -> Cow<'a, str> {
    let mut text = if options.escape_html {
        escape(text)
    } else {
        Cow::Borrowed(text)
    };

    for (pattern, replacement) in INLINE_RULES.iter() {
        let replaced = match pattern.replace_all(&text, *replacement) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(replaced) => replaced,
        };
        text = Cow::Owned(replaced);
    }

    text
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{HeadingLevel, parse};

    fn plain(block: Block<'_>) -> Line<'_> {
        Line {
            block,
            carriage_return: false,
        }
    }

    #[test]
    fn test_inline_bold_before_italic() {
        let options = RenderOptions::default();

        assert_eq!(inline("**bold**", &options), "<strong>bold</strong>");
        assert_eq!(inline("__bold__", &options), "<strong>bold</strong>");
        assert_eq!(inline("*soft*", &options), "<em>soft</em>");
        assert_eq!(inline("_soft_", &options), "<em>soft</em>");
        assert_eq!(
            inline("**a** and *b*", &options),
            "<strong>a</strong> and <em>b</em>"
        );
    }

    #[test]
    fn test_inline_unmatched_markers_pass_through() {
        let options = RenderOptions::default();

        assert_eq!(inline("2 * 3", &options), "2 * 3");
        assert_eq!(inline("**", &options), "**");
        assert!(matches!(inline("nothing here", &options), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_is_opt_in() {
        let raw = RenderOptions::default();
        let escaped = RenderOptions { escape_html: true };

        assert_eq!(inline("<b>hi</b>", &raw), "<b>hi</b>");
        assert_eq!(
            inline("<b>*hi*</b> & 'x'", &escaped),
            "&lt;b&gt;<em>hi</em>&lt;/b&gt; &amp; &#39;x&#39;"
        );
    }

    #[test]
    fn test_render_heading() {
        let lines = [plain(Block::Heading {
            level: HeadingLevel::H2,
            text: "**Spicy** Dal",
        })];

        assert_eq!(
            render(&lines, &RenderOptions::default()),
            r#"<h2 class="recipe-h2"><strong>Spicy</strong> Dal</h2>"#
        );
    }

    #[test]
    fn test_render_list_followed_by_text() {
        let lines = [
            plain(Block::Bullet("a")),
            plain(Block::Bullet("b")),
            plain(Block::Paragraph("after")),
        ];

        assert_eq!(
            render(&lines, &RenderOptions::default()),
            concat!(
                r#"<ul class="recipe-list"><li class="recipe-bullet">a</li>"#,
                "\n",
                r#"<li class="recipe-bullet">b</li>"#,
                "\n</ul>after"
            )
        );
    }

    #[test]
    fn test_render_bullets_then_steps_use_separate_wrappers() {
        let lines = [plain(Block::Bullet("salt")), plain(Block::Step("stir"))];

        assert_eq!(
            render(&lines, &RenderOptions::default()),
            concat!(
                r#"<ul class="recipe-list"><li class="recipe-bullet">salt</li>"#,
                "\n</ul>",
                r#"<ol class="recipe-steps"><li class="recipe-step">stir</li></ol>"#
            )
        );
    }

    #[test]
    fn test_render_blank_line_splits_list() {
        let html = render(&parse("* a\n\n* b"), &RenderOptions::default());

        assert_eq!(html.matches(BULLET_LIST_OPEN).count(), 2);
    }

    #[test]
    fn test_render_preserves_carriage_returns() {
        let html = render(&parse("plain\r\nline\r"), &RenderOptions::default());

        assert_eq!(html, "plain\r\nline\r");
    }
}
