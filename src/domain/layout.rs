//! Recursive tree layout shared by the canvas and flow renderers.
//!
//! The root sits at the origin. A node with `k` children spreads them over `k`
//! slots of `horizontal` width centred under the parent, one `vertical` step below
//! it. Cycle markers and revisited mechanics keep their slot but leave it empty.
//! Nothing resolves overlap between subtrees.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{ChildTarget, LinkKind, Mechanic, MechanicId, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal slot width and per-level vertical step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

/// A mechanic with its assigned position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub mechanic: Mechanic,
    pub position: Point,
    pub depth: usize,
    /// Index of the parent in `TreeLayout::nodes`.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    pub kind: Option<LinkKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The backend flagged the child as a cycle.
    CycleMarker,
    /// The mechanic is already placed elsewhere in this layout.
    AlreadyPlaced,
}

/// A child that was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedChild {
    pub parent: usize,
    pub mechanic_id: Option<MechanicId>,
    pub kind: Option<LinkKind>,
    pub reason: SkipReason,
}

/// Positioned projection of a tree. `nodes` are in pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<LayoutEdge>,
    pub skipped: Vec<SkippedChild>,
}

impl TreeLayout {
    /// Edge leading into `node`, if it is not the root.
    pub fn incoming(&self, node: usize) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.target == node)
    }

    pub fn outgoing(&self, node: usize) -> impl Iterator<Item = &LayoutEdge> {
        self.edges.iter().filter(move |e| e.source == node)
    }

    pub fn skipped_under(&self, node: usize) -> impl Iterator<Item = &SkippedChild> {
        self.skipped.iter().filter(move |s| s.parent == node)
    }

    pub fn position_of(&self, id: MechanicId) -> Option<Point> {
        self.nodes
            .iter()
            .find(|n| n.mechanic.id == id)
            .map(|n| n.position)
    }
}

/// x coordinates of `count` children centred under `parent_x`.
pub fn child_slots(parent_x: f64, count: usize, horizontal: f64) -> Vec<f64> {
    let start = parent_x - (count as f64 * horizontal) / 2.0 + horizontal / 2.0;
    (0..count).map(|i| start + i as f64 * horizontal).collect()
}

/// Lay out `tree` with the root at `origin`.
#[instrument(level = "debug", skip(tree), fields(root = tree.id()))]
pub fn layout_tree(tree: &TreeNode, spacing: Spacing, origin: Point) -> TreeLayout {
    let mut layout = TreeLayout::default();
    let mut visited = HashSet::new();
    visited.insert(tree.id());
    place(tree, origin, 0, None, &spacing, &mut visited, &mut layout);
    debug!(
        "layout: {} nodes, {} skipped",
        layout.nodes.len(),
        layout.skipped.len()
    );
    layout
}

/// `node` has already been claimed in `visited` by its caller.
fn place(
    node: &TreeNode,
    at: Point,
    depth: usize,
    incoming: Option<(usize, Option<LinkKind>)>,
    spacing: &Spacing,
    visited: &mut HashSet<MechanicId>,
    layout: &mut TreeLayout,
) -> usize {
    let index = layout.nodes.len();
    layout.nodes.push(PlacedNode {
        mechanic: node.mechanic.clone(),
        position: at,
        depth,
        parent: incoming.map(|(parent, _)| parent),
    });
    if let Some((parent, kind)) = incoming {
        layout.edges.push(LayoutEdge {
            source: parent,
            target: index,
            kind,
        });
    }

    // Claim children before descending so a mechanic further down never
    // duplicates a sibling placed later.
    let xs = child_slots(at.x, node.children.len(), spacing.horizontal);
    let mut placeable = Vec::new();
    for (child, x) in node.children.iter().zip(xs) {
        match &child.target {
            ChildTarget::Cycle(id) => layout.skipped.push(SkippedChild {
                parent: index,
                mechanic_id: *id,
                kind: child.kind,
                reason: SkipReason::CycleMarker,
            }),
            ChildTarget::Node(sub) if !visited.insert(sub.id()) => {
                layout.skipped.push(SkippedChild {
                    parent: index,
                    mechanic_id: Some(sub.id()),
                    kind: child.kind,
                    reason: SkipReason::AlreadyPlaced,
                })
            }
            ChildTarget::Node(sub) => placeable.push((child.kind, sub, x)),
        }
    }

    for (kind, sub, x) in placeable {
        place(
            sub,
            Point::new(x, at.y + spacing.vertical),
            depth + 1,
            Some((index, kind)),
            spacing,
            visited,
            layout,
        );
    }
    index
}
