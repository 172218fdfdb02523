use arjun_core::{
    BlockData, Document, extract_frontmatter, parse_markdown_at, render_frontmatter,
    serialize_document, serialize_json,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const FIXTURES: &[&str] = &[
    "",
    "# Title\n\nSome text",
    "## Install\n\nRun the installer.\nThen restart.\n\n- one\n- two\n- three",
    "1. first\n2. second\n\n- bullet\n\n---\n\nTail paragraph",
    "> quoted line\n> second line\n>\n> after gap\n\nplain",
    "```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n### After code",
    "```\nuntagged\n\n```",
    "Intro\n# Heading right after text\nmore text\n***\n___",
    "- a\n\n- b\n1. c\n2. d",
    "```py\nprint(1)",
    "  # x\ny",
    "  - a\nb",
    "  ---",
    "   1. one\ntwo",
    "text with trailing space   \n\n\tindented by tab",
];

const FRONTMATTER_FIXTURES: &[&str] = &[
    "---\ntitle: Plain\ndraft: false\n---\n\nBody",
    "---\ntitle: \"#1 post\"\nsection: '[draft]'\nsummary: \"a, b: c\"\n---\n\ntext\n\n  # indented\nmore",
    "---\ntitle: Notes\ndescription: >\n  folded line\n  continues here\nnotes: |\n  one\n  two\n---\n\n- item",
    "---\ntitle: Part 1: Start\ncount: 3\n---\nBody",
];

fn block_data(document: &Document) -> Vec<BlockData> {
    document
        .blocks
        .iter()
        .map(|block| block.data.clone())
        .collect()
}

fn round_trip(markdown: &str) -> String {
    serialize_document(&parse_markdown_at(markdown, 0))
}

#[test]
fn reparsing_serialized_output_keeps_blocks() {
    for markdown in FIXTURES {
        let first = parse_markdown_at(markdown, 0);
        let reparsed = parse_markdown_at(&serialize_document(&first), 0);
        assert_eq!(
            block_data(&first),
            block_data(&reparsed),
            "fixture {markdown:?}"
        );
    }
}

#[test]
fn round_trip_is_idempotent() {
    for markdown in FIXTURES {
        let once = round_trip(markdown);
        assert_eq!(round_trip(&once), once, "fixture {markdown:?}");
    }
}

/// Load then save, the way the editor does.
fn save_cycle(file: &str) -> String {
    let extracted = extract_frontmatter(file);
    let body = serialize_document(&parse_markdown_at(&extracted.body, 0));
    format!("{}{body}", render_frontmatter(&extracted.data))
}

#[test]
fn saving_preserves_frontmatter_and_blocks() {
    for file in FRONTMATTER_FIXTURES {
        let original = extract_frontmatter(file);
        let saved = save_cycle(file);
        let reloaded = extract_frontmatter(&saved);
        assert_eq!(reloaded.data, original.data, "fixture {file:?}");
        assert_eq!(
            block_data(&parse_markdown_at(&reloaded.body, 0)),
            block_data(&parse_markdown_at(&original.body, 0)),
            "fixture {file:?}"
        );
        assert_eq!(save_cycle(&saved), saved, "fixture {file:?}");
    }
}

#[test]
fn ids_are_sequential_and_restart_per_call() {
    let markdown = "# A\n\nb\n\n- c";
    for _ in 0..2 {
        let ids: Vec<String> = parse_markdown_at(markdown, 0)
            .blocks
            .into_iter()
            .map(|block| block.id)
            .collect();
        assert_eq!(ids, vec!["block_0", "block_1", "block_2"]);
    }
}

#[test]
fn editor_payload_serializes_like_typed_document() {
    let payload = json!({
        "time": 1_700_000_000_000_i64,
        "version": "2.28.2",
        "blocks": [
            { "id": "a", "type": "header", "data": { "text": "Notes", "level": 2 } },
            { "id": "b", "type": "paragraph", "data": { "text": "Body" } },
            { "id": "c", "type": "list", "data": { "style": "ordered", "items": ["x", "y"] } },
            { "id": "d", "type": "linkTool", "data": { "link": "https://example.com", "meta": { "title": "Ex" } } },
            { "id": "e", "type": "image", "data": { "file": { "url": "/a.png" }, "caption": "A" } },
            { "id": "f", "type": "delimiter", "data": {} }
        ]
    });

    let expected = "## Notes\n\nBody\n\n1. x\n2. y\n\n[Ex](https://example.com)\n\n![A](/a.png)\n\n---";
    assert_eq!(serialize_json(&payload), expected);

    let document: Document = serde_json::from_value(payload).unwrap();
    assert_eq!(serialize_document(&document), expected);
}

#[test]
fn document_json_survives_the_wire() {
    let document = parse_markdown_at("# T\n\n> q\n\n```sh\nls\n```", 42);
    let wire = serde_json::to_value(&document).unwrap();
    assert_eq!(wire["time"], json!(42));
    assert_eq!(wire["blocks"][0]["type"], json!("heading"));
    assert_eq!(wire["blocks"][1]["data"]["caption"], json!(""));
    assert_eq!(wire["blocks"][2]["data"]["language"], json!("sh"));

    let back: Document = serde_json::from_value(wire).unwrap();
    assert_eq!(back, document);
}
