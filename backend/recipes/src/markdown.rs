//! # Recommendation Renderer
//!
//! Turns the loosely formatted recommendation text returned by the AI service
//! into an HTML fragment.
//!
//! ## Stages
//!
//! 1. [`normalize`]: bullets and numbers that the model wrote inline
//!    (`"Ingredients: * eggs * milk"`) are moved onto their own lines.
//! 2. [`blocks::parse`](crate::blocks::parse): every line is classified as a
//!    heading, bullet, step or paragraph.
//! 3. [`html::render`](crate::html::render): blocks become markup, emphasis is
//!    applied inside each block and consecutive list items are wrapped.
//!
//! Classifying lines before touching emphasis means a `*` bullet marker can
//! never be eaten by the italic rule.
//!
//! ## Trust
//!
//! Output is raw markup meant to be inserted into a page as is. The input comes
//! from the AI service, not from end users, so escaping is off unless
//! [`RenderOptions::escape_html`] is set.
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

pub use crate::html::RenderOptions;
use crate::{blocks, html};

static LOOSE_BULLET_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s)\*(\s+)").expect("bullet pattern is valid"));
static LOOSE_BULLET_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s)-(\s+)").expect("bullet pattern is valid"));
static LOOSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s)([0-9]+)\.(\s+)").expect("number pattern is valid"));

pub fn format_markdown(text: &str) -> String {
    format_markdown_with(text, &RenderOptions::default())
}

pub fn format_markdown_with(text: &str, options: &RenderOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = normalize(text);
    html::render(&blocks::parse(&normalized), options)
}

/// Absent recommendations stay absent.
pub fn format_recommendation(text: Option<String>, options: &RenderOptions) -> Option<String> {
    text.map(|text| format_markdown_with(&text, options))
}

/// Forces markers preceded by whitespace onto a new line.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let mut text = Cow::Borrowed(text);

    for (pattern, replacement) in [
        (&*LOOSE_BULLET_STAR, "\n* "),
        (&*LOOSE_BULLET_DASH, "\n- "),
        (&*LOOSE_NUMBER, "\n${2}. "),
    ] {
        let replaced = match pattern.replace_all(&text, replacement) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(replaced) => replaced,
        };
        text = Cow::Owned(replaced);
    }

    text
}
