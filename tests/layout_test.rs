//! Tests for tree decoding and the shared layout rule.

use std::collections::HashSet;

use rstest::rstest;
use serde_json::json;

use mechtree::domain::layout::SkipReason;
use mechtree::domain::{layout_tree, LinkKind, Mechanic, Point, Spacing, TreeNode};

const CANVAS: Spacing = Spacing {
    horizontal: 200.0,
    vertical: 140.0,
};

fn leaf(id: i64) -> TreeNode {
    TreeNode::leaf(Mechanic {
        id,
        name: format!("m{id}"),
        description: None,
        year: None,
    })
}

#[test]
fn given_acyclic_tree_when_laying_out_then_every_node_placed_once() {
    let tree = leaf(1)
        .with_child(None, leaf(2).with_child(None, leaf(4)).with_child(None, leaf(5)))
        .with_child(None, leaf(3).with_child(None, leaf(6)));

    let layout = layout_tree(&tree, CANVAS, Point::new(400.0, 70.0));

    let ids: Vec<i64> = layout.nodes.iter().map(|n| n.mechanic.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 3, 6]);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), tree.node_count());
    assert!(layout.skipped.is_empty());
    assert_eq!(layout.edges.len(), 5);
}

#[test]
fn given_cycle_marker_when_laying_out_then_not_expanded_or_duplicated() {
    let tree = leaf(1).with_child(
        Some(LinkKind::EvolvesTo),
        leaf(2).with_cycle(Some(LinkKind::EvolvesTo), Some(1)),
    );

    let layout = layout_tree(&tree, CANVAS, Point::new(0.0, 0.0));

    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(
        layout.nodes.iter().filter(|n| n.mechanic.id == 1).count(),
        1
    );
    assert_eq!(layout.skipped.len(), 1);
    assert_eq!(layout.skipped[0].reason, SkipReason::CycleMarker);
    assert_eq!(layout.skipped[0].parent, 1);
}

#[test]
fn given_cycle_between_siblings_when_laying_out_then_siblings_keep_their_slots() {
    let tree = leaf(1)
        .with_child(None, leaf(2))
        .with_cycle(Some(LinkKind::EvolvesTo), Some(1))
        .with_child(None, leaf(3));

    let layout = layout_tree(&tree, CANVAS, Point::new(400.0, 70.0));

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.position_of(2), Some(Point::new(200.0, 210.0)));
    assert_eq!(layout.position_of(3), Some(Point::new(600.0, 210.0)));
    assert_eq!(layout.skipped[0].reason, SkipReason::CycleMarker);
}

#[rstest]
#[case(CANVAS, Point::new(400.0, 70.0))]
#[case(Spacing { horizontal: 250.0, vertical: 150.0 }, Point::new(0.0, 0.0))]
fn given_three_children_when_laying_out_then_evenly_spaced_and_symmetric(
    #[case] spacing: Spacing,
    #[case] origin: Point,
) {
    let tree = leaf(1)
        .with_child(None, leaf(2))
        .with_child(None, leaf(3))
        .with_child(None, leaf(4));

    let layout = layout_tree(&tree, spacing, origin);

    let children: Vec<Point> = layout.nodes[1..].iter().map(|n| n.position).collect();
    assert_eq!(children.len(), 3);
    for child in &children {
        assert_eq!(child.y, origin.y + spacing.vertical);
    }
    assert_eq!(children[1].x - children[0].x, spacing.horizontal);
    assert_eq!(children[2].x - children[1].x, spacing.horizontal);
    assert_eq!((children[0].x + children[2].x) / 2.0, origin.x);
    assert_eq!(children[1].x, origin.x);
}

#[test]
fn given_root_wrapper_json_when_decoding_then_cycles_kept_as_markers() {
    let value = json!({
        "root": {
            "id": 1, "name": "Jump", "description": null, "year": 1981,
            "children": [
                {"type": "extends", "node": {
                    "id": 2, "name": "Double Jump", "year": 1985,
                    "children": [
                        {"type": "evolves_to", "node": {"id": 1, "name": "Jump", "cycle": true}}
                    ]
                }}
            ]
        }
    });

    let tree = TreeNode::from_value(value).unwrap();
    let layout = layout_tree(&tree, CANVAS, Point::new(0.0, 0.0));

    assert_eq!(tree.node_count(), 2);
    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.edges[0].kind, Some(LinkKind::Extends));
    assert_eq!(layout.skipped[0].mechanic_id, Some(1));
}

#[test]
fn given_nested_mechanic_json_when_decoding_then_same_layout() {
    let value = json!({
        "mechanic": {"id": 1, "name": "Jump"},
        "children": [
            {"mechanic": {"id": 2, "name": "Wall Jump"}, "children": []},
            {"mechanic": {"id": 3, "name": "Dash"}}
        ]
    });

    let tree = TreeNode::from_value(value).unwrap();
    let layout = layout_tree(&tree, CANVAS, Point::new(400.0, 70.0));

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.position_of(2), Some(Point::new(300.0, 210.0)));
    assert_eq!(layout.position_of(3), Some(Point::new(500.0, 210.0)));
}

#[test]
fn given_layout_when_computed_then_source_tree_untouched() {
    let tree = leaf(1).with_child(None, leaf(2)).with_cycle(None, Some(1));
    let before = tree.clone();

    let _ = layout_tree(&tree, CANVAS, Point::new(0.0, 0.0));

    assert_eq!(tree, before);
}
