//! Node and edge lists for an interactive flow-graph component.

use serde::Serialize;
use tracing::instrument;

use crate::config::FlowConfig;
use crate::domain::{layout_tree, LinkKind, Point, Spacing, TreeNode};

pub const NODE_TYPE: &str = "mechanicNode";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNodeData {
    pub label: String,
    pub description: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub position: Point,
    pub data: FlowNodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

fn node_id(index: usize) -> String {
    format!("node-{index}")
}

/// Flow graph for `tree`, root at the origin.
#[instrument(level = "debug", skip_all, fields(root = tree.id()))]
pub fn build(tree: &TreeNode, style: &FlowConfig) -> FlowGraph {
    let layout = layout_tree(
        tree,
        Spacing {
            horizontal: style.level_width,
            vertical: style.level_height,
        },
        Point::new(0.0, 0.0),
    );

    let nodes = layout
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| FlowNode {
            id: node_id(i),
            node_type: NODE_TYPE,
            position: n.position,
            data: FlowNodeData {
                label: n.mechanic.name.clone(),
                description: n.mechanic.description.clone(),
                year: n.mechanic.year,
            },
        })
        .collect();

    let edges = layout
        .edges
        .iter()
        .map(|e| {
            let (source, target) = (node_id(e.source), node_id(e.target));
            FlowEdge {
                id: format!("edge-{source}-{target}"),
                source,
                target,
                animated: true,
                label: e.kind.unwrap_or_default().label(),
            }
        })
        .collect();

    FlowGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mechanic;
    use serde_json::json;

    fn node(id: i64) -> TreeNode {
        TreeNode::leaf(Mechanic {
            id,
            name: format!("m{id}"),
            description: None,
            year: Some(2000),
        })
    }

    #[test]
    fn given_tree_when_building_then_ids_follow_preorder() {
        let tree = node(10)
            .with_child(Some(LinkKind::Extends), node(20).with_child(None, node(30)))
            .with_child(None, node(40));
        let graph = build(&tree, &FlowConfig::default());

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["node-0", "node-1", "node-2", "node-3"]);
        assert_eq!(graph.nodes[3].data.label, "m40");
        assert_eq!(graph.edges[0].id, "edge-node-0-node-1");
        assert_eq!(graph.edges[0].label, "extends");
        assert_eq!(graph.edges[1].label, "evolves to");
    }

    #[test]
    fn given_two_children_when_building_then_spaced_by_level_width() {
        let tree = node(1).with_child(None, node(2)).with_child(None, node(3));
        let graph = build(&tree, &FlowConfig::default());
        assert_eq!(graph.nodes[1].position, Point::new(-125.0, 150.0));
        assert_eq!(graph.nodes[2].position, Point::new(125.0, 150.0));
    }

    #[test]
    fn given_node_when_serialising_then_uses_component_field_names() {
        let graph = build(&node(1), &FlowConfig::default());
        let value = serde_json::to_value(&graph.nodes[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "node-0",
                "type": "mechanicNode",
                "position": {"x": 0.0, "y": 0.0},
                "data": {"label": "m1", "description": null, "year": 2000}
            })
        );
    }
}
