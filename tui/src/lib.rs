//! TUI rendering for Primer using ratatui.

mod clipboard;
mod highlight;
mod inline;
mod input;
pub mod render;
mod theme;

pub use clipboard::{Clipboard, NoopClipboard, RecordingClipboard, SystemClipboard};
pub use highlight::{Highlighter, PlainHighlighter};
pub use inline::{inline_lines, inline_spans};
pub use input::{InputPump, apply_event, apply_key, handle_events};
pub use render::{NodeKind, RenderContext, RenderedNode, render_blocks};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use primer_core::{App, DetailLayout, Screen};
use primer_types::{Topic, TopicId};

const GATE_WIDTH: u16 = 46;
const GATE_HEIGHT: u16 = 9;

/// Main draw function, with the plain code highlighter.
pub fn draw(frame: &mut Frame, app: &mut App, tick: usize) {
    draw_with(frame, app, tick, &PlainHighlighter);
}

/// Draw the current screen. `tick` advances the loading spinner.
pub fn draw_with(frame: &mut Frame, app: &mut App, tick: usize, highlighter: &dyn Highlighter) {
    let options = app.ui_options();
    let palette = palette(app.theme().scheme(), options);
    let glyphs = glyphs(options);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette, &glyphs);

    let hints = match app.screen() {
        Screen::Gate => {
            draw_gate(frame, app, chunks[1], &palette, &glyphs);
            gate_hints()
        }
        Screen::Listing => {
            draw_listing(frame, app, chunks[1], &palette, &glyphs);
            if app.view().listing.editing_filter {
                filter_hints()
            } else {
                listing_hints()
            }
        }
        Screen::Loading(id) => {
            draw_loading(frame, id, chunks[1], &palette, spinner_frame(tick, options));
            loading_hints()
        }
        Screen::Detail(_) => detail_hints(),
    };
    // Detail records its layout back into the app.
    if matches!(app.screen(), Screen::Detail(_)) {
        draw_detail(frame, app, chunks[1], &palette, &glyphs, highlighter);
    }

    draw_key_hints(frame, &hints, chunks[2], &palette);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let scheme = if app.theme().dark_mode() {
        "dark"
    } else {
        "light"
    };
    let registry = app.registry();
    let left = Line::from(vec![
        Span::styled(format!(" {} ", glyphs.logo), styles::title(palette)),
        Span::styled("Primer", styles::title(palette)),
        Span::styled(
            format!(
                "  {} {} in {}",
                glyphs.separator,
                counted(registry.len(), "topic"),
                counted(registry.categories().len(), "category")
            ),
            styles::muted(palette),
        ),
    ]);
    let right = Line::from(Span::styled(format!("{scheme} "), styles::muted(palette)))
        .alignment(Alignment::Right);

    let bar = Block::default().style(Style::default().bg(palette.bg_panel));
    frame.render_widget(bar, area);
    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(Paragraph::new(right), area);
}

fn counted(n: usize, noun: &str) -> String {
    match (n, noun.strip_suffix('y')) {
        (1, _) => format!("1 {noun}"),
        (_, Some(stem)) => format!("{n} {stem}ies"),
        (_, None) => format!("{n} {noun}s"),
    }
}

// ============================================================================
// Gate
// ============================================================================

fn draw_gate(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let width = GATE_WIDTH.min(area.width.saturating_sub(2));
    let height = GATE_HEIGHT.min(area.height);
    let gate_area = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    frame.render_widget(Clear, gate_area);

    let gate = &app.view().gate;
    let masked = glyphs.mask.repeat(gate.draft.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "Enter the access code to continue.",
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", glyphs.selected), styles::key_highlight(palette)),
            Span::styled(masked.clone(), styles::body(palette)),
        ]),
        Line::from(""),
    ];
    if let Some(err) = &gate.error {
        lines.push(Line::from(Span::styled(err.to_string(), styles::error(palette))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
        .title(Line::from(vec![Span::styled(
            format!(" {} Access required ", glyphs.lock),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )]));
    let inner = block.inner(gate_area);
    frame.render_widget(Paragraph::new(lines).block(block), gate_area);

    // Cursor after the masked draft
    let prompt_width = glyphs.selected.width() + 1 + masked.width();
    let cursor_x = inner
        .x
        .saturating_add(u16::try_from(prompt_width).unwrap_or(u16::MAX))
        .min(inner.right().saturating_sub(1));
    frame.set_cursor_position((cursor_x, inner.y + 2));
}

// ============================================================================
// Listing
// ============================================================================

fn draw_listing(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let listing = &app.view().listing;
    let show_filter = listing.editing_filter || !listing.filter.is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(u16::from(show_filter)),
            Constraint::Min(1),
        ])
        .split(area);

    if show_filter {
        let mut spans = vec![
            Span::styled("/ ", styles::key_highlight(palette)),
            Span::styled(listing.filter.clone(), styles::body(palette)),
        ];
        if listing.editing_filter {
            spans.push(Span::styled("_", styles::muted(palette)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    }

    let topics = app.visible_topics();
    if topics.is_empty() {
        let message = if app.registry().is_empty() {
            "No topics available.".to_string()
        } else {
            format!("No topics match \"{}\".", listing.filter)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, styles::muted(palette)))),
            chunks[1],
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;
    let mut last_category: Option<&str> = None;
    for (i, topic) in topics.iter().enumerate() {
        let category = topic.meta.category.as_str();
        if last_category != Some(category) {
            if last_category.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                category.to_uppercase(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            last_category = Some(category);
        }
        let selected = i == listing.cursor;
        if selected {
            selected_line = lines.len();
        }
        lines.extend(topic_rows(topic, selected, palette, glyphs));
    }

    // Keep the cursor row (and its description) on screen.
    let visible = usize::from(chunks[1].height);
    let scroll = (selected_line + 2).saturating_sub(visible);
    frame.render_widget(
        Paragraph::new(lines).scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        chunks[1],
    );
}

fn topic_rows(topic: &Topic, selected: bool, palette: &Palette, glyphs: &Glyphs) -> [Line<'static>; 2] {
    let meta = &topic.meta;
    let marker = if selected {
        format!("{} ", glyphs.selected)
    } else {
        "  ".to_string()
    };
    let title_style = if selected {
        styles::selected_row(palette).fg(palette.text_primary)
    } else {
        styles::body(palette)
    };

    let title = Line::from(vec![
        Span::styled(marker, styles::key_highlight(palette)),
        Span::styled(meta.title.clone(), title_style),
        Span::styled(format!("  {} ", glyphs.separator), styles::muted(palette)),
        Span::styled(
            meta.difficulty.label(),
            Style::default().fg(palette.difficulty(meta.difficulty)),
        ),
        Span::styled(
            format!(" {} {} min", glyphs.separator, meta.duration),
            styles::muted(palette),
        ),
    ]);
    let description = Line::from(Span::styled(
        format!("    {}", meta.description),
        styles::muted(palette),
    ));
    [title, description]
}

// ============================================================================
// Loading
// ============================================================================

fn draw_loading(frame: &mut Frame, id: &TopicId, area: Rect, palette: &Palette, spinner: &str) {
    let y = area.y + area.height / 2;
    let line_area = Rect {
        x: area.x,
        y: y.min(area.bottom().saturating_sub(1)),
        width: area.width,
        height: 1.min(area.height),
    };
    let line = Line::from(vec![
        Span::styled(format!("{spinner} "), styles::key_highlight(palette)),
        Span::styled(format!("Loading {id}…"), styles::muted(palette)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(line), line_area);
}

// ============================================================================
// Detail
// ============================================================================

fn draw_detail(
    frame: &mut Frame,
    app: &mut App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    highlighter: &dyn Highlighter,
) {
    let Screen::Detail(topic) = app.screen() else {
        return;
    };
    let detail = &app.view().detail;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title + meta
            Constraint::Min(1),    // Document
        ])
        .split(area);

    let meta = &topic.meta;
    let header = vec![
        Line::from(Span::styled(meta.title.clone(), styles::title(palette))),
        Line::from(vec![
            Span::styled(meta.category.clone(), Style::default().fg(palette.accent)),
            Span::styled(format!(" {} ", glyphs.separator), styles::muted(palette)),
            Span::styled(
                meta.difficulty.label(),
                Style::default().fg(palette.difficulty(meta.difficulty)),
            ),
            Span::styled(
                format!(" {} {} min", glyphs.separator, meta.duration),
                styles::muted(palette),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let ctx = RenderContext {
        palette,
        glyphs,
        highlighter,
        focused_code: detail.focused_code,
        copied_code: detail.copied.map(|copied| copied.block),
    };
    let nodes = render_blocks(&topic.content, &ctx);

    let doc_area = chunks[1];
    // Two columns reserved for the scrollbar gutter.
    let text_width = doc_area.width.saturating_sub(2).max(1);
    let (lines, mut layout) = document_lines(topic, &nodes, text_width, palette, glyphs);
    let total = wrapped_line_count(&lines, text_width);
    layout.max_scroll = total.saturating_sub(doc_area.height);
    layout.viewport = doc_area.height;

    let view = &mut app.view_mut().detail;
    view.layout = layout;
    view.scroll = view.scroll.min(view.layout.max_scroll);
    let scroll = view.scroll;
    let max_scroll = view.layout.max_scroll;

    let text_area = Rect {
        width: doc_area.width.saturating_sub(2),
        ..doc_area
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        text_area,
    );

    // Only render scrollbar when content exceeds viewport
    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .track_symbol(Some(glyphs.track))
            .thumb_symbol(glyphs.thumb)
            .style(Style::default().fg(palette.text_muted));

        // content_length = scrollable range, so the thumb reaches the bottom at max_scroll
        let mut scrollbar_state =
            ScrollbarState::new(usize::from(max_scroll)).position(usize::from(scroll));

        frame.render_stateful_widget(
            scrollbar,
            doc_area.inner(Margin {
                vertical: 0,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Lay rendered nodes out one after another, then the summary and next steps,
/// recording where each heading and code block starts.
fn document_lines(
    topic: &Topic,
    nodes: &[RenderedNode],
    width: u16,
    palette: &Palette,
    glyphs: &Glyphs,
) -> (Vec<Line<'static>>, DetailLayout) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut layout = DetailLayout::default();
    let mut offset: u16 = 0;

    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
            offset = offset.saturating_add(1);
        }
        match node.kind {
            NodeKind::Heading { .. } => layout.heading_offsets.push(offset),
            NodeKind::Code => layout.code_offsets.push((node.source, offset)),
            _ => {}
        }
        offset = offset.saturating_add(wrapped_line_count(&node.lines, width));
        lines.extend(node.lines.iter().cloned());
    }

    let section_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    if let Some(summary) = topic
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
    {
        lines.push(Line::from(""));
        layout
            .heading_offsets
            .push(wrapped_line_count(&lines, width));
        lines.push(Line::from(Span::styled(
            format!("{} Summary", glyphs.rule),
            section_style,
        )));
        lines.extend(inline_lines(summary, styles::body(palette), palette));
    }

    if !topic.next_steps.is_empty() {
        lines.push(Line::from(""));
        layout
            .heading_offsets
            .push(wrapped_line_count(&lines, width));
        lines.push(Line::from(Span::styled(
            format!("{} Next steps", glyphs.rule),
            section_style,
        )));
        for (i, step) in topic.next_steps.iter().enumerate() {
            let mut spans = vec![Span::styled(
                format!("  {}. ", i + 1),
                Style::default().fg(palette.primary),
            )];
            spans.extend(inline_spans(step, styles::body(palette), palette));
            lines.push(Line::from(spans));
        }
    }

    (lines, layout)
}

/// Rows `lines` occupy once word-wrapped to `width`.
fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let count = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width.max(1));
    u16::try_from(count).unwrap_or(u16::MAX)
}

// ============================================================================
// Key hints
// ============================================================================

type Hint = (&'static str, &'static str);

fn gate_hints() -> Vec<Hint> {
    vec![("Enter", "submit"), ("Ctrl+C", "quit")]
}

fn listing_hints() -> Vec<Hint> {
    vec![
        ("j/k", "move"),
        ("Enter", "open"),
        ("/", "filter"),
        ("t", "theme"),
        ("q", "quit"),
    ]
}

fn filter_hints() -> Vec<Hint> {
    vec![("Enter", "done"), ("Esc", "clear"), ("↑↓", "move")]
}

fn loading_hints() -> Vec<Hint> {
    vec![("Esc", "back"), ("q", "quit")]
}

fn detail_hints() -> Vec<Hint> {
    vec![
        ("j/k", "scroll"),
        ("[ ]", "headings"),
        ("Tab", "code"),
        ("c", "copy"),
        ("Esc", "back"),
        ("t", "theme"),
    ]
}

fn draw_key_hints(frame: &mut Frame, hints: &[Hint], area: Rect, palette: &Palette) {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {label}  "), styles::key_hint(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
