//! Rooted evolution tree as returned by the tree-fetch endpoint.
//!
//! The backend has shipped two shapes for the same data:
//!
//! ```text
//! { "mechanic": {...}, "children": [ { "mechanic": {...}, "children": [] } ] }
//! { "root": { "id": 1, "name": "..", "children": [ { "type": "extends", "node": {..} } ] } }
//! ```
//!
//! A node carrying `"cycle": true` marks a mechanic reached again further down the
//! traversal. It is kept as a marker and never expanded.

use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult, LinkKind, Mechanic, MechanicId};

/// A mechanic and its ordered outgoing children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub mechanic: Mechanic,
    pub children: Vec<TreeChild>,
}

/// One outgoing edge of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChild {
    /// Relationship kind, when the backend reports it.
    pub kind: Option<LinkKind>,
    pub target: ChildTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTarget {
    Node(TreeNode),
    /// Back-reference to a mechanic already visited higher up.
    Cycle(Option<MechanicId>),
}

impl TreeNode {
    pub fn leaf(mechanic: Mechanic) -> Self {
        Self {
            mechanic,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, kind: Option<LinkKind>, child: TreeNode) -> Self {
        self.children.push(TreeChild {
            kind,
            target: ChildTarget::Node(child),
        });
        self
    }

    pub fn with_cycle(mut self, kind: Option<LinkKind>, id: Option<MechanicId>) -> Self {
        self.children.push(TreeChild {
            kind,
            target: ChildTarget::Cycle(id),
        });
        self
    }

    pub fn id(&self) -> MechanicId {
        self.mechanic.id
    }

    /// Number of nested nodes including self; cycle markers are not counted.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| match &c.target {
                ChildTarget::Node(n) => n.node_count(),
                ChildTarget::Cycle(_) => 0,
            })
            .sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|c| match &c.target {
                ChildTarget::Node(n) => Some(n.depth()),
                ChildTarget::Cycle(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Decode a tree-fetch response body.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        let obj = as_object(&value, "tree")?;
        if let Some(root) = obj.get("root") {
            if !obj.contains_key("mechanic") && !obj.contains_key("id") {
                return parse_node(root);
            }
        }
        parse_node(&value)
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> DomainResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| DomainError::MalformedTree(format!("{what} is not an object")))
}

fn is_cycle_marker(obj: &Map<String, Value>) -> bool {
    obj.get("cycle").and_then(Value::as_bool).unwrap_or(false)
}

fn parse_node(value: &Value) -> DomainResult<TreeNode> {
    let obj = as_object(value, "node")?;
    let mechanic_value = match obj.get("mechanic") {
        Some(m) if m.is_object() => m.clone(),
        _ => value.clone(),
    };
    let mechanic: Mechanic = serde_json::from_value(mechanic_value)
        .map_err(|e| DomainError::MalformedTree(format!("mechanic: {e}")))?;

    let children = match obj.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_child)
            .collect::<DomainResult<Vec<_>>>()?,
        Some(_) => {
            return Err(DomainError::MalformedTree(format!(
                "children of mechanic {} is not an array",
                mechanic.id
            )))
        }
    };

    Ok(TreeNode { mechanic, children })
}

fn parse_child(value: &Value) -> DomainResult<TreeChild> {
    let obj = as_object(value, "child")?;
    let (kind, inner) = match obj.get("node") {
        Some(node) => {
            let kind = match obj.get("type") {
                Some(Value::String(s)) => Some(s.parse::<LinkKind>()?),
                _ => None,
            };
            (kind, node)
        }
        None => (None, value),
    };

    let inner_obj = as_object(inner, "child node")?;
    if is_cycle_marker(inner_obj) {
        let id = inner_obj
            .get("id")
            .or_else(|| inner_obj.get("mechanic").and_then(|m| m.get("id")))
            .and_then(Value::as_i64);
        return Ok(TreeChild {
            kind,
            target: ChildTarget::Cycle(id),
        });
    }

    Ok(TreeChild {
        kind,
        target: ChildTarget::Node(parse_node(inner)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_nested_mechanic_shape_when_parsing_then_builds_tree() {
        let value = json!({
            "mechanic": {"id": 1, "name": "Jump", "description": "up", "year": 1981},
            "children": [
                {"mechanic": {"id": 2, "name": "Double Jump", "description": null, "year": 1985}, "children": []}
            ]
        });
        let tree = TreeNode::from_value(value).unwrap();
        assert_eq!(tree.id(), 1);
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children[0].kind, None);
    }

    #[test]
    fn given_root_wrapped_flat_shape_when_parsing_then_reads_kinds_and_cycles() {
        let value = json!({
            "root": {
                "id": 1, "name": "Jump", "description": null, "year": null,
                "children": [
                    {"type": "extends", "node": {"id": 2, "name": "Wall Jump", "children": [
                        {"type": "evolves_to", "node": {"id": 1, "name": "Jump", "cycle": true}}
                    ]}}
                ]
            }
        });
        let tree = TreeNode::from_value(value).unwrap();
        assert_eq!(tree.children[0].kind, Some(LinkKind::Extends));
        let ChildTarget::Node(wall) = &tree.children[0].target else {
            panic!("expected node");
        };
        assert_eq!(wall.children[0].target, ChildTarget::Cycle(Some(1)));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn given_missing_children_when_parsing_then_node_is_leaf() {
        let tree = TreeNode::from_value(json!({"id": 5, "name": "Dash"})).unwrap();
        assert!(tree.children.is_empty());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn given_non_object_when_parsing_then_errors() {
        let err = TreeNode::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DomainError::MalformedTree(_)));
    }

    #[test]
    fn given_unknown_child_type_when_parsing_then_errors() {
        let value = json!({"id": 1, "name": "A", "children": [
            {"type": "mutates", "node": {"id": 2, "name": "B"}}
        ]});
        assert_eq!(
            TreeNode::from_value(value).unwrap_err(),
            DomainError::UnknownLinkKind("mutates".into())
        );
    }
}
