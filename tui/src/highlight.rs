//! Code presentation for `code` blocks.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Palette;

const TAB_WIDTH: usize = 4;

/// Turns source text into styled lines. The renderer decides when to call it;
/// how the code looks is entirely up to the implementation.
pub trait Highlighter {
    fn highlight(&self, language: &str, code: &str, palette: &Palette) -> Vec<Line<'static>>;
}

/// Line-based fallback: one style for code, a dimmer one for whole-line comments.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, language: &str, code: &str, palette: &Palette) -> Vec<Line<'static>> {
        let prefixes = comment_prefixes(language);
        let code_style = Style::default().fg(palette.text_secondary);
        let comment_style = Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::ITALIC);

        code.lines()
            .map(|line| {
                let line = sanitize_code_line(line);
                let trimmed = line.trim_start();
                let style = if prefixes.iter().any(|prefix| trimmed.starts_with(prefix)) {
                    comment_style
                } else {
                    code_style
                };
                Line::from(Span::styled(line, style))
            })
            .collect()
    }
}

fn comment_prefixes(language: &str) -> &'static [&'static str] {
    match language.trim().to_ascii_lowercase().as_str() {
        "python" | "py" | "bash" | "sh" | "shell" | "zsh" | "ruby" | "rb" | "yaml" | "yml"
        | "toml" | "dockerfile" | "make" | "makefile" => &["#"],
        "sql" | "lua" | "haskell" | "hs" => &["--"],
        "html" | "xml" | "markdown" | "md" => &["<!--"],
        "lisp" | "clojure" | "scheme" | "ini" | "asm" => &[";"],
        "" | "text" | "plain" | "plaintext" | "json" => &[],
        _ => &["//", "/*", "* ", "*/"],
    }
}

/// Expand tabs and drop control characters that would move the terminal cursor.
fn sanitize_code_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
