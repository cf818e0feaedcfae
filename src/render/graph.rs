//! Element sets for the legacy full-graph display.
//!
//! Every call builds a fresh set; the consumer replaces whatever it showed before
//! and runs the named layout.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{ChildTarget, Link, LinkKind, Mechanic, MechanicId, TreeNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub mechanic_id: MechanicId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: Option<LinkKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Node { data: NodeData },
    Edge { data: EdgeData },
}

/// Layout the graph component should run after loading the elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutHint {
    pub name: String,
    pub directed: bool,
    pub animate: bool,
}

impl LayoutHint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directed: true,
            animate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphElements {
    pub elements: Vec<Element>,
    pub layout: LayoutHint,
}

fn node_key(id: MechanicId) -> String {
    format!("node-{id}")
}

fn node_element(m: &Mechanic) -> Element {
    Element::Node {
        data: NodeData {
            id: node_key(m.id),
            label: m.name.clone(),
            description: m.description.clone(),
            year: m.year,
            mechanic_id: m.id,
        },
    }
}

impl GraphElements {
    /// Every cached mechanic and link.
    ///
    /// Links pointing at a mechanic that is not in `mechanics` are dropped.
    pub fn from_catalog(mechanics: &[Mechanic], links: &[Link], layout: LayoutHint) -> Self {
        let known: HashSet<MechanicId> = mechanics.iter().map(|m| m.id).collect();
        let mut elements: Vec<Element> = mechanics.iter().map(node_element).collect();

        for link in links {
            if !(known.contains(&link.from_id) && known.contains(&link.to_id)) {
                warn!(
                    "skipping link {} ({} -> {}): unknown endpoint",
                    link.id, link.from_id, link.to_id
                );
                continue;
            }
            elements.push(Element::Edge {
                data: EdgeData {
                    id: format!("edge-{}", link.id),
                    source: node_key(link.from_id),
                    target: node_key(link.to_id),
                    kind: Some(link.kind),
                },
            });
        }
        debug!("catalog graph: {} elements", elements.len());
        Self { elements, layout }
    }

    /// Elements for one rooted tree.
    ///
    /// A mechanic reached twice gets a single node; the second parent still gets
    /// an edge to it. Cycle-marked children are left out.
    pub fn from_tree(tree: &TreeNode, layout: LayoutHint) -> Self {
        let mut walk = TreeWalk::default();
        walk.visit(tree);
        debug!("tree graph: {} elements", walk.elements.len());
        Self {
            elements: walk.elements,
            layout,
        }
    }

    pub fn node_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Node { .. }))
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.elements.len() - self.node_count()
    }
}

#[derive(Default)]
struct TreeWalk {
    visited: HashSet<MechanicId>,
    edge_ids: HashSet<String>,
    elements: Vec<Element>,
}

impl TreeWalk {
    fn visit(&mut self, node: &TreeNode) {
        if !self.visited.insert(node.id()) {
            return;
        }
        self.elements.push(node_element(&node.mechanic));

        for child in &node.children {
            let ChildTarget::Node(sub) = &child.target else {
                continue;
            };
            self.visit(sub);
            let id = format!("edge-{}-{}", node.id(), sub.id());
            if self.edge_ids.insert(id.clone()) {
                self.elements.push(Element::Edge {
                    data: EdgeData {
                        id,
                        source: node_key(node.id()),
                        target: node_key(sub.id()),
                        kind: child.kind,
                    },
                });
            }
        }
    }
}
