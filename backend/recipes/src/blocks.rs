//! Line classifier.
//!
//! Splits normalized text on `\n` and tags every line with the block it
//! starts. Nothing is rewritten here; each node borrows its content from the
//! input so the renderer can reproduce untouched lines byte for byte.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    fn from_hashes(count: usize) -> Option<Self> {
        match count {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: HeadingLevel, text: &'a str },
    Bullet(&'a str),
    Step(&'a str),
    Paragraph(&'a str),
}

/// A classified line plus the carriage return it ended with, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub block: Block<'a>,
    pub carriage_return: bool,
}

pub fn parse(text: &str) -> Vec<Line<'_>> {
    text.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> Line<'_> {
    let (body, carriage_return) = match line.strip_suffix('\r') {
        Some(body) => (body, true),
        None => (line, false),
    };

    Line {
        block: classify(body),
        carriage_return,
    }
}

pub fn classify(line: &str) -> Block<'_> {
    if let Some(block) = heading(line) {
        return block;
    }

    if let Some(text) = line
        .strip_prefix(['*', '-'])
        .and_then(marker_content)
    {
        return Block::Bullet(text);
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(text) = line[digits..].strip_prefix('.').and_then(marker_content) {
            return Block::Step(text);
        }
    }

    Block::Paragraph(line)
}

fn heading(line: &str) -> Option<Block<'_>> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    let level = HeadingLevel::from_hashes(hashes)?;
    let text = marker_content(&line[hashes..])?;

    Some(Block::Heading { level, text })
}

/// A marker must be followed by whitespace and then something to show.
fn marker_content(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim_start();
    (!text.is_empty()).then_some(text)
}
