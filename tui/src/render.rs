//! Render-dispatch engine: topic content blocks to styled terminal lines.
//!
//! Each block goes through exactly one renderer chosen by its tag. Renderers see
//! only their own block plus the shared [`RenderContext`], so the order of the
//! content array is the only thing that relates one node to another.

use std::iter;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use primer_types::{
    AlertBlock, AlertVariant, BlockKind, CodeBlock, ContentBlock, HeadingBlock, ListBlock,
    ListStyle, ParagraphBlock, TableBlock,
};

use crate::highlight::Highlighter;
use crate::inline::{inline_lines, inline_spans, strip_controls};
use crate::theme::{Glyphs, Palette, styles};

/// Widest a table column may grow before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 3;

/// Shared, read-only inputs for every block renderer.
pub struct RenderContext<'a> {
    pub palette: &'a Palette,
    pub glyphs: &'a Glyphs,
    pub highlighter: &'a dyn Highlighter,
    /// Content index of the code block with keyboard focus.
    pub focused_code: Option<usize>,
    /// Content index of the code block showing "copied".
    pub copied_code: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading { level: u8 },
    Paragraph,
    Code,
    List,
    Table,
    Alert(AlertVariant),
}

impl NodeKind {
    #[must_use]
    pub const fn block_kind(self) -> BlockKind {
        match self {
            Self::Heading { .. } => BlockKind::Heading,
            Self::Paragraph => BlockKind::Paragraph,
            Self::Code => BlockKind::Code,
            Self::List => BlockKind::List,
            Self::Table => BlockKind::Table,
            Self::Alert(_) => BlockKind::Alert,
        }
    }
}

/// One rendered content block.
#[derive(Debug, Clone)]
pub struct RenderedNode {
    pub kind: NodeKind,
    /// Index of the source block in the topic's content.
    pub source: usize,
    pub lines: Vec<Line<'static>>,
    /// Text placed on the clipboard by the copy affordance (code blocks only).
    pub copy_text: Option<String>,
    /// Link target for headings.
    pub anchor: Option<String>,
}

impl RenderedNode {
    /// The node's lines as plain text, one entry per line.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        self.plain_lines().join("\n")
    }
}

/// Render blocks in order. Unsupported blocks produce no node.
#[must_use]
pub fn render_blocks(blocks: &[ContentBlock], ctx: &RenderContext) -> Vec<RenderedNode> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| render_block(index, block, ctx))
        .collect()
}

/// Render a single block, or `None` for a kind this build does not know.
#[must_use]
pub fn render_block(index: usize, block: &ContentBlock, ctx: &RenderContext) -> Option<RenderedNode> {
    let node = match block {
        ContentBlock::Heading(heading) => render_heading(index, heading, ctx),
        ContentBlock::Paragraph(paragraph) => render_paragraph(index, paragraph, ctx),
        ContentBlock::Code(code) => render_code(index, code, ctx),
        ContentBlock::List(list) => render_list(index, list, ctx),
        ContentBlock::Table(table) => render_table(index, table, ctx),
        ContentBlock::Alert(alert) => render_alert(index, alert, ctx),
        ContentBlock::Unsupported => {
            tracing::trace!(index, "Dropping unsupported content block");
            return None;
        }
    };
    Some(node)
}

fn node(kind: NodeKind, source: usize, lines: Vec<Line<'static>>) -> RenderedNode {
    RenderedNode {
        kind,
        source,
        lines,
        copy_text: None,
        anchor: None,
    }
}

fn render_heading(index: usize, heading: &HeadingBlock, ctx: &RenderContext) -> RenderedNode {
    let palette = ctx.palette;
    let text = strip_controls(heading.text.trim()).into_owned();
    let style = match heading.level {
        0 | 1 => styles::title(palette).add_modifier(Modifier::UNDERLINED),
        2 => Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    };

    let mut rendered = node(
        NodeKind::Heading {
            level: heading.level,
        },
        index,
        vec![Line::from(Span::styled(text.clone(), style))],
    );
    rendered.anchor = Some(
        heading
            .anchor
            .clone()
            .filter(|anchor| !anchor.trim().is_empty())
            .unwrap_or_else(|| slugify(&text)),
    );
    rendered
}

fn render_paragraph(index: usize, paragraph: &ParagraphBlock, ctx: &RenderContext) -> RenderedNode {
    let lines = inline_lines(&paragraph.text, styles::body(ctx.palette), ctx.palette);
    node(NodeKind::Paragraph, index, lines)
}

fn render_code(index: usize, code: &CodeBlock, ctx: &RenderContext) -> RenderedNode {
    let palette = ctx.palette;
    let glyphs = ctx.glyphs;
    let focused = ctx.focused_code == Some(index);
    let copied = ctx.copied_code == Some(index);
    let border = Style::default().fg(if focused { palette.accent } else { palette.border });

    let language = strip_controls(code.language.trim());
    let label = if language.is_empty() {
        "text".to_string()
    } else {
        language.to_lowercase()
    };

    let mut header = vec![
        Span::styled(
            if focused {
                format!("{} ", glyphs.focus)
            } else {
                "  ".to_string()
            },
            border,
        ),
        Span::styled(
            label,
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", glyphs.separator), styles::muted(palette)),
    ];
    if copied {
        header.push(Span::styled(
            glyphs.copied,
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        header.push(Span::styled(
            glyphs.copy,
            if focused {
                styles::key_highlight(palette)
            } else {
                styles::key_hint(palette)
            },
        ));
    }

    let mut lines = vec![Line::from(header)];
    for line in ctx.highlighter.highlight(&code.language, &code.code, palette) {
        let mut spans = vec![Span::styled(format!("  {} ", glyphs.gutter), border)];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }

    if let Some(explanation) = code
        .explanation
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        let style = styles::muted(palette).add_modifier(Modifier::ITALIC);
        for line in inline_lines(explanation, style, palette) {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
    }

    let mut rendered = node(NodeKind::Code, index, lines);
    rendered.copy_text = Some(code.code.clone());
    rendered
}

fn render_list(index: usize, list: &ListBlock, ctx: &RenderContext) -> RenderedNode {
    let palette = ctx.palette;
    let marker_style = Style::default().fg(palette.primary);
    let body = styles::body(palette);

    let lines = list
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = match list.style {
                ListStyle::Ordered => format!("  {}. ", i + 1),
                ListStyle::Unordered => format!("  {} ", ctx.glyphs.bullet),
            };
            let mut spans = vec![Span::styled(marker, marker_style)];
            spans.extend(inline_spans(item, body, palette));
            Line::from(spans)
        })
        .collect();

    node(NodeKind::List, index, lines)
}

fn render_table(index: usize, table: &TableBlock, ctx: &RenderContext) -> RenderedNode {
    let palette = ctx.palette;
    let glyphs = &ctx.glyphs.table;
    let columns = table.column_count();
    if columns == 0 {
        return node(NodeKind::Table, index, Vec::new());
    }

    // Short rows are padded with empty cells; long rows widen the table.
    let normalize = |cells: &[String]| -> Vec<String> {
        (0..columns)
            .map(|col| {
                cells
                    .get(col)
                    .map(|cell| truncate_to_width(&strip_controls(cell.trim()), MAX_COLUMN_WIDTH))
                    .unwrap_or_default()
            })
            .collect()
    };
    let header = normalize(table.headers.as_slice());
    let rows: Vec<Vec<String>> = table.rows.iter().map(|row| normalize(row.as_slice())).collect();

    let mut widths = vec![MIN_COLUMN_WIDTH; columns];
    for row in iter::once(&header).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let border_style = styles::muted(palette);
    let header_style = Style::default()
        .fg(palette.text_primary)
        .add_modifier(Modifier::BOLD);
    let cell_style = styles::body(palette);

    let border = |[left, mid, right]: [char; 3]| -> Line<'static> {
        let mut out = String::from("  ");
        out.push(left);
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                out.push(mid);
            }
            out.extend(iter::repeat_n(glyphs.horizontal, width + 2));
        }
        out.push(right);
        Line::from(Span::styled(out, border_style))
    };
    let row_line = |cells: &[String], style: Style| -> Line<'static> {
        let mut spans = vec![Span::styled(format!("  {}", glyphs.vertical), border_style)];
        for (cell, width) in cells.iter().zip(&widths) {
            let pad = width.saturating_sub(cell.width());
            spans.push(Span::styled(format!(" {cell}{} ", " ".repeat(pad)), style));
            spans.push(Span::styled(glyphs.vertical, border_style));
        }
        Line::from(spans)
    };

    let mut lines = vec![border(glyphs.top)];
    let has_header = table.headers.iter().any(|cell| !cell.trim().is_empty());
    if has_header {
        lines.push(row_line(&header, header_style));
        lines.push(border(glyphs.mid));
    }
    for row in &rows {
        lines.push(row_line(row, cell_style));
    }
    lines.push(border(glyphs.bottom));

    node(NodeKind::Table, index, lines)
}

fn render_alert(index: usize, alert: &AlertBlock, ctx: &RenderContext) -> RenderedNode {
    let palette = ctx.palette;
    let color = palette.alert(alert.variant);
    let bar = Span::styled(format!("{} ", ctx.glyphs.alert_bar), Style::default().fg(color));

    let mut lines = vec![Line::from(vec![
        bar.clone(),
        Span::styled(
            format!(
                "{} {}",
                ctx.glyphs.alert_icon(alert.variant),
                alert.variant.label()
            ),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])];
    for line in inline_lines(&alert.content, styles::body(palette), palette) {
        let mut spans = vec![bar.clone()];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }

    node(NodeKind::Alert(alert.variant), index, lines)
}

/// Lowercase, alphanumerics kept, runs of anything else collapsed to `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Cut `text` to at most `max` display columns on a grapheme boundary, adding `…`.
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        used += width;
        out.push_str(grapheme);
    }
    out.push('…');
    out
}
