//! Tests for the renderers, end to end from a decoded tree.

use serde_json::{json, Value};

use mechtree::cli::args::OutputFormat;
use mechtree::cli::commands::render_tree;
use mechtree::config::Settings;
use mechtree::domain::{Mechanic, TreeNode};
use mechtree::render::{render, CanvasStyle, CanvasSurface, DrawCommand};

fn sample_tree() -> TreeNode {
    TreeNode::from_value(json!({
        "root": {
            "id": 1, "name": "Jump", "description": "Leave the ground", "year": 1981,
            "children": [
                {"type": "extends", "node": {"id": 2, "name": "Double Jump", "year": 1985, "children": [
                    {"type": "evolves_to", "node": {"id": 1, "name": "Jump", "cycle": true}}
                ]}},
                {"type": "replaces", "node": {"id": 3, "name": "Glide", "year": 1990}}
            ]
        }
    }))
    .unwrap()
}

#[test]
fn given_missing_surface_when_rendering_canvas_then_silent_noop() {
    let tree = sample_tree();
    assert!(render(Some(&tree), None, &CanvasStyle::default()).is_empty());
    let surface = CanvasSurface {
        width: 800.0,
        height: 600.0,
    };
    assert!(render(None, Some(&surface), &CanvasStyle::default()).is_empty());
}

#[test]
fn given_tree_when_rendering_canvas_then_one_card_and_arrow_per_edge() {
    let tree = sample_tree();
    let surface = CanvasSurface {
        width: 800.0,
        height: 600.0,
    };

    let commands = render(Some(&tree), Some(&surface), &CanvasStyle::default());

    let count = |pred: fn(&DrawCommand) -> bool| commands.iter().filter(|c| pred(c)).count();
    assert_eq!(count(|c| matches!(c, DrawCommand::RoundRect { .. })), 3);
    assert_eq!(count(|c| matches!(c, DrawCommand::Line { .. })), 2);
    assert_eq!(count(|c| matches!(c, DrawCommand::Arrowhead { .. })), 2);
    assert_eq!(count(|c| matches!(c, DrawCommand::Clear { .. })), 1);
}

#[test]
fn given_flow_format_when_rendering_then_labels_follow_link_kinds() {
    let out = render_tree(&sample_tree(), &Settings::default(), OutputFormat::Flow).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["edges"][0]["id"], "edge-node-0-node-1");
    assert_eq!(value["edges"][0]["label"], "extends");
    assert_eq!(value["edges"][1]["label"], "replaces");
    assert_eq!(value["edges"][1]["animated"], true);
}

#[test]
fn given_elements_format_when_rendering_then_cycle_left_out() {
    let out = render_tree(&sample_tree(), &Settings::default(), OutputFormat::Elements).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["layout"]["name"], "cose-bilkent");
    let elements = value["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 5);
    assert!(elements
        .iter()
        .all(|e| e["data"]["id"] != "edge-2-1"));
}

#[test]
fn given_svg_format_when_rendering_then_document_uses_canvas_size() {
    let mut settings = Settings::default();
    settings.canvas.width = 1024.0;

    let out = render_tree(&sample_tree(), &settings, OutputFormat::Svg).unwrap();

    assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1024""#));
    assert!(out.contains("Double Jump"));
}

#[test]
fn given_text_format_when_rendering_then_shows_kinds_and_cycle() {
    let out = render_tree(&sample_tree(), &Settings::default(), OutputFormat::Text).unwrap();

    assert!(out.starts_with("Jump (1981)"));
    assert!(out.contains("[extends] Double Jump (1985)"));
    assert!(out.contains("[replaces] Glide (1990)"));
    assert!(out.contains("↻ Jump (cycle)"));
}

#[test]
fn given_canvas_format_when_rendering_then_json_tagged_by_op() {
    let tree = TreeNode::leaf(Mechanic {
        id: 1,
        name: "Jump".into(),
        description: None,
        year: None,
    });
    let out = render_tree(&tree, &Settings::default(), OutputFormat::Canvas).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value[0]["op"], "clear");
    assert_eq!(value[1]["op"], "round_rect");
    assert_eq!(value[2]["text"], "Jump");
}
