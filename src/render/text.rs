//! Terminal rendering of a tree layout.

use termtree::Tree;

use crate::domain::layout::{SkipReason, SkippedChild};
use crate::domain::{LinkKind, TreeLayout};

/// Convert a laid-out tree into a printable `termtree::Tree`.
///
/// Children appear in layout order, followed by the children the layout skipped.
pub fn to_tree_string(layout: &TreeLayout) -> Tree<String> {
    if layout.nodes.is_empty() {
        return Tree::new("Empty tree".to_string());
    }
    build(layout, 0, None)
}

fn build(layout: &TreeLayout, index: usize, kind: Option<Option<LinkKind>>) -> Tree<String> {
    let node = &layout.nodes[index];
    let label = match kind {
        Some(kind) => format!("{}{}", kind_prefix(kind), node.mechanic),
        None => node.mechanic.to_string(),
    };

    let leaves: Vec<Tree<String>> = layout
        .outgoing(index)
        .map(|e| build(layout, e.target, Some(e.kind)))
        .chain(layout.skipped_under(index).map(|s| Tree::new(skipped_label(layout, s))))
        .collect();

    Tree::new(label).with_leaves(leaves)
}

fn kind_prefix(kind: Option<LinkKind>) -> String {
    kind.map(|k| format!("[{}] ", k.label())).unwrap_or_default()
}

fn skipped_label(layout: &TreeLayout, skipped: &SkippedChild) -> String {
    let name = skipped
        .mechanic_id
        .and_then(|id| layout.nodes.iter().find(|n| n.mechanic.id == id))
        .map(|n| n.mechanic.name.clone())
        .or_else(|| skipped.mechanic_id.map(|id| format!("#{id}")))
        .unwrap_or_else(|| "?".into());
    let note = match skipped.reason {
        SkipReason::CycleMarker => "cycle",
        SkipReason::AlreadyPlaced => "shown above",
    };
    format!("{}↻ {} ({})", kind_prefix(skipped.kind), name, note)
}
