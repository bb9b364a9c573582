//! Integration tests for content walking over editor JSON.

use stepdoc::model::{ContentNode, MarkColor};
use stepdoc::parser::{EditorReader, ErrorMode, ParseOptions};
use stepdoc::render::{walk, ContentWalker, JsonLinesSink, RenderCommand, RenderOptions};
use stepdoc::Error;

const PROCEDURE: &str = r#"{
    "type": "doc",
    "content": [
        {"type": "paragraph", "content": [
            {"type": "text", "text": "Check bath temperature "},
            {"type": "text", "text": "before loading", "marks": [{"type": "textStyle", "attrs": {"color": "rgb(0, 0, 255)"}}, {"type": "underline"}]}
        ]},
        {"type": "bulletList", "content": [
            {"type": "listItem", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Gloves"}]}
            ]},
            {"type": "listItem", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Goggles"}]}
            ]}
        ]},
        {"type": "paragraph", "content": [
            {"type": "text", "text": "Line one"},
            {"type": "hardBreak"},
            {"type": "text", "text": "Line two"}
        ]},
        {"type": "image", "attrs": {"src": "files/rack.jpg"}}
    ]
}"#;

fn paragraphs(commands: &[RenderCommand]) -> Vec<(String, f32)> {
    commands
        .iter()
        .filter_map(|c| c.as_paragraph())
        .map(|p| (p.plain_text(), p.indent))
        .collect()
}

#[test]
fn test_walk_editor_document() {
    let doc = EditorReader::default().read_str(PROCEDURE).unwrap();
    let options = RenderOptions::default();
    let commands = walk(&doc, 1, &options).unwrap();

    assert_eq!(
        paragraphs(&commands),
        vec![
            ("Check bath temperature before loading".to_string(), 21.0),
            ("Gloves".to_string(), 63.0),
            ("Goggles".to_string(), 63.0),
            ("Line one\nLine two".to_string(), 21.0),
        ]
    );

    let first = commands[0].as_paragraph().unwrap();
    assert_eq!(first.runs[1].color, MarkColor::Blue);
    assert!(first.runs[1].underline);
    assert!(!first.runs[0].underline);

    assert!(matches!(
        commands.last(),
        Some(RenderCommand::AddImage { source, width }) if source == "files/rack.jpg" && *width == options.inline_image_width
    ));
}

#[test]
fn test_indent_linear_in_tier() {
    let options = RenderOptions::default();
    let para = ContentNode::paragraph_text("x");
    let indents: Vec<f32> = (1..=8)
        .map(|tier| walk(&para, tier, &options).unwrap()[0].as_paragraph().unwrap().indent)
        .collect();

    for pair in indents.windows(2) {
        assert_eq!(pair[1] - pair[0], options.base_indent);
    }
    assert_eq!(indents[0], 0.0);
    assert_eq!(indents[4], 4.0 * options.base_indent);
    assert_eq!(indents[7], 7.0 * options.base_indent);
}

#[test]
fn test_walker_is_lazy() {
    let doc = EditorReader::default().read_str(PROCEDURE).unwrap();
    let options = RenderOptions::default();
    let mut walker = ContentWalker::new(&doc, 1, &options);
    assert!(walker.next().is_some());
    assert!(!walker.is_done());
    let rest: Vec<_> = walker.collect::<stepdoc::Result<_>>().unwrap();
    assert_eq!(rest.len(), 4);
}

#[test]
fn test_emit_to_json_lines_file() {
    let doc = EditorReader::default().read_str(PROCEDURE).unwrap();
    let options = RenderOptions::default();

    let file = tempfile::tempfile().unwrap();
    let mut sink = JsonLinesSink::new(file);
    let count = ContentWalker::new(&doc, 1, &options)
        .emit_to(&mut sink)
        .unwrap();
    assert_eq!(count, 5);
    assert_eq!(sink.written(), 5);
    sink.into_inner().unwrap();
}

#[test]
fn test_strict_reader_rejects_unknown_node() {
    let json = r#"{"type": "doc", "content": [{"type": "blockquote", "content": []}]}"#;
    match EditorReader::default().read_str(json) {
        Err(Error::MalformedNode { path, .. }) => assert_eq!(path, "$.content[0]"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_lenient_reader_unwraps_unknown_containers() {
    let json = r#"{"type": "doc", "content": [
        {"type": "blockquote", "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "quoted"}]}
        ]},
        {"type": "mention", "attrs": {"id": "u1"}}
    ]}"#;
    let reader = EditorReader::new(ParseOptions::new().with_error_mode(ErrorMode::Lenient));
    let doc = reader.read_str(json).unwrap();
    let commands = walk(&doc, 1, &RenderOptions::default()).unwrap();
    assert_eq!(paragraphs(&commands), vec![("quoted".to_string(), 42.0)]);
}

#[test]
fn test_deep_tree_fails_instead_of_overflowing() {
    let mut node = ContentNode::paragraph_text("bottom");
    for _ in 0..1_000 {
        node = ContentNode::document(vec![node]);
    }
    let options = RenderOptions::default();
    assert!(matches!(
        walk(&node, 1, &options),
        Err(Error::DepthExceeded { limit: 64, .. })
    ));
}
