//! Render-dispatch engine over whole documents

use serde_json::json;

use primer_tui::{
    Glyphs, NodeKind, Palette, PlainHighlighter, RenderContext, RenderedNode, glyphs,
    render_blocks,
};
use primer_types::{ContentBlock, Topic, UiOptions};

use crate::common::embedded_topics;

fn render(blocks: &[ContentBlock], palette: &Palette, glyphs: &Glyphs) -> Vec<RenderedNode> {
    let ctx = RenderContext {
        palette,
        glyphs,
        highlighter: &PlainHighlighter,
        focused_code: None,
        copied_code: None,
    };
    render_blocks(blocks, &ctx)
}

fn render_default(blocks: &[ContentBlock]) -> Vec<RenderedNode> {
    render(blocks, &Palette::dark(), &glyphs(UiOptions::default()))
}

#[test]
fn title_body_mystery() {
    let content: Vec<ContentBlock> = serde_json::from_value(json!([
        {"type": "heading", "level": 1, "text": "Title"},
        {"type": "paragraph", "text": "Body"},
        {"type": "mystery", "foo": 1}
    ]))
    .unwrap();

    let nodes = render_default(&content);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].kind, NodeKind::Heading { level: 1 });
    assert_eq!(nodes[0].plain_text(), "Title");
    assert_eq!(nodes[1].kind, NodeKind::Paragraph);
    assert_eq!(nodes[1].plain_text(), "Body");
}

#[test]
fn embedded_documents_render_in_order() {
    for topic in embedded_topics() {
        let nodes = render_default(&topic.content);
        let supported: Vec<usize> = topic
            .content
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_supported())
            .map(|(index, _)| index)
            .collect();
        let sources: Vec<usize> = nodes.iter().map(|node| node.source).collect();
        assert_eq!(sources, supported, "topic {}", topic.id);

        for node in &nodes {
            assert_eq!(
                Some(node.kind.block_kind()),
                topic.content[node.source].kind()
            );
        }
    }
}

#[test]
fn unknown_block_anywhere_changes_nothing_else() {
    let base = json!([
        {"type": "heading", "level": 2, "text": "A"},
        {"type": "list", "style": "ordered", "items": ["x", "y"]},
        {"type": "alert", "variant": "danger", "content": "z"}
    ]);
    let base_blocks: Vec<ContentBlock> = serde_json::from_value(base.clone()).unwrap();
    let expected: Vec<Vec<String>> = render_default(&base_blocks)
        .iter()
        .map(RenderedNode::plain_lines)
        .collect();

    for position in 0..=3 {
        let mut noisy = base.as_array().unwrap().clone();
        noisy.insert(position, json!({"type": "carousel", "slides": [1, 2, 3]}));
        let blocks: Vec<ContentBlock> = serde_json::from_value(json!(noisy)).unwrap();
        let rendered: Vec<Vec<String>> = render_default(&blocks)
            .iter()
            .map(RenderedNode::plain_lines)
            .collect();
        assert_eq!(rendered, expected, "unknown block at {position}");
    }
}

#[test]
fn ascii_glyphs_render_without_box_drawing() {
    let options = UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    };
    let glyphs = glyphs(options);
    let palette = Palette::dark();

    for topic in embedded_topics() {
        for node in render(&topic.content, &palette, &glyphs) {
            for line in node.plain_lines() {
                assert!(
                    !line.contains(['│', '┌', '•', '▌']),
                    "non-ascii chrome in {line:?}"
                );
            }
        }
    }
}

#[test]
fn code_nodes_carry_copy_text() {
    for topic in embedded_topics() {
        for node in render_default(&topic.content) {
            match &topic.content[node.source] {
                ContentBlock::Code(code) => {
                    assert_eq!(node.copy_text.as_deref(), Some(code.code.as_str()));
                }
                _ => assert!(node.copy_text.is_none()),
            }
        }
    }
}

#[test]
fn malformed_blocks_leave_the_rest_of_the_topic() {
    let topic: Topic = serde_json::from_value(json!({
        "id": "rough-draft",
        "meta": {
            "title": "Rough Draft",
            "description": "Half-finished content",
            "category": "Drafts",
            "difficulty": "beginner",
            "duration": 5
        },
        "content": [
            {"type": "heading", "text": "Untitled level"},
            {"type": "alert", "variant": "tip", "content": "dropped"},
            {"type": "paragraph", "text": "still here"},
            {"type": "list", "style": "bullet", "items": ["dropped"]},
            {"type": "table", "headers": ["port"], "rows": [[443]]}
        ]
    }))
    .unwrap();

    let nodes = render_default(&topic.content);
    let kinds: Vec<NodeKind> = nodes.iter().map(|node| node.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Heading { level: 2 },
            NodeKind::Paragraph,
            NodeKind::Table
        ]
    );
    assert_eq!(nodes[0].plain_text(), "Untitled level");
    assert_eq!(nodes[1].plain_text(), "still here");
    assert!(nodes[2].plain_text().contains("443"));
}
