//! Canvas tree view as a display list.
//!
//! Cards are centred on their layout position. Each non-root card gets a line
//! from the parent card's bottom edge to its own top edge, with an arrowhead at
//! the line end.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::CanvasConfig;
use crate::domain::{layout_tree, Mechanic, Point, Spacing, TreeNode};

pub const CARD_FILL: &str = "#1f2937";
pub const ACCENT: &str = "#60a5fa";
pub const TITLE_COLOR: &str = "#e5e7eb";
pub const BODY_COLOR: &str = "#9ca3af";

pub const TITLE_FONT: &str = "bold 14px Arial";
pub const BODY_FONT: &str = "12px Arial";

pub const TITLE_MAX_CHARS: usize = 20;
pub const BODY_MAX_CHARS: usize = 24;

const LINE_WIDTH: f64 = 2.0;
/// Offset of the title and body baselines from the card centre.
const TEXT_OFFSET: f64 = 10.0;

/// The drawing target. Missing surface means nothing is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSurface {
    pub width: f64,
    pub height: f64,
}

/// Card geometry and spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasStyle {
    pub node_width: f64,
    pub node_height: f64,
    pub corner_radius: f64,
    pub vertical_gap: f64,
    pub horizontal_gap: f64,
    pub top_margin: f64,
    pub arrow_size: f64,
}

impl From<&CanvasConfig> for CanvasStyle {
    fn from(c: &CanvasConfig) -> Self {
        Self {
            node_width: c.node_width,
            node_height: c.node_height,
            corner_radius: c.corner_radius,
            vertical_gap: c.vertical_gap,
            horizontal_gap: c.horizontal_gap,
            top_margin: c.top_margin,
            arrow_size: c.arrow_size,
        }
    }
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

impl CanvasSurface {
    pub fn from_config(c: &CanvasConfig) -> Self {
        Self {
            width: c.width,
            height: c.height,
        }
    }
}

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    RoundRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        fill: &'static str,
        stroke: &'static str,
        line_width: f64,
    },
    Line {
        from: Point,
        to: Point,
        stroke: &'static str,
        line_width: f64,
    },
    /// Filled triangle: tip plus two wing points.
    Arrowhead {
        tip: Point,
        left: Point,
        right: Point,
        fill: &'static str,
    },
    /// Centred text.
    Text {
        at: Point,
        text: String,
        font: &'static str,
        fill: &'static str,
    },
}

/// Display list for `tree` on `surface`. Either missing yields no commands.
#[instrument(level = "debug", skip_all)]
pub fn render(
    tree: Option<&TreeNode>,
    surface: Option<&CanvasSurface>,
    style: &CanvasStyle,
) -> Vec<DrawCommand> {
    let (Some(tree), Some(surface)) = (tree, surface) else {
        debug!("nothing to draw");
        return Vec::new();
    };

    let layout = layout_tree(
        tree,
        Spacing {
            horizontal: style.horizontal_gap,
            vertical: style.vertical_gap,
        },
        Point::new(surface.width / 2.0, style.top_margin),
    );

    let mut out = vec![DrawCommand::Clear {
        width: surface.width,
        height: surface.height,
    }];
    let half_h = style.node_height / 2.0;

    for (index, node) in layout.nodes.iter().enumerate() {
        let at = node.position;
        if let Some(edge) = layout.incoming(index) {
            let parent = layout.nodes[edge.source].position;
            let from = Point::new(parent.x, parent.y + half_h);
            let to = Point::new(at.x, at.y - half_h);
            out.push(DrawCommand::Line {
                from,
                to,
                stroke: ACCENT,
                line_width: LINE_WIDTH,
            });
            out.push(arrowhead(parent, at, to, style.arrow_size));
        }
        out.extend(card(&node.mechanic, at, style));
    }

    debug!("{} draw commands", out.len());
    out
}

fn card(mechanic: &Mechanic, at: Point, style: &CanvasStyle) -> [DrawCommand; 3] {
    [
        DrawCommand::RoundRect {
            x: at.x - style.node_width / 2.0,
            y: at.y - style.node_height / 2.0,
            width: style.node_width,
            height: style.node_height,
            radius: style.corner_radius,
            fill: CARD_FILL,
            stroke: ACCENT,
            line_width: LINE_WIDTH,
        },
        DrawCommand::Text {
            at: Point::new(at.x, at.y - TEXT_OFFSET),
            text: truncate(&mechanic.name, TITLE_MAX_CHARS),
            font: TITLE_FONT,
            fill: TITLE_COLOR,
        },
        DrawCommand::Text {
            at: Point::new(at.x, at.y + TEXT_OFFSET),
            text: truncate(mechanic.description_or_empty(), BODY_MAX_CHARS),
            font: BODY_FONT,
            fill: BODY_COLOR,
        },
    ]
}

/// Arrowhead at `tip`, oriented along the parent-to-child direction.
fn arrowhead(parent: Point, child: Point, tip: Point, size: f64) -> DrawCommand {
    let angle = (child.y - parent.y).atan2(child.x - parent.x);
    let wing = |a: f64| Point::new(tip.x - size * a.cos(), tip.y - size * a.sin());
    DrawCommand::Arrowhead {
        tip,
        left: wing(angle - PI / 6.0),
        right: wing(angle + PI / 6.0),
        fill: ACCENT,
    }
}

/// First `max` characters of `s`.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str) -> TreeNode {
        TreeNode::leaf(Mechanic {
            id,
            name: name.into(),
            description: Some("a description that is clearly too long".into()),
            year: None,
        })
    }

    const SURFACE: CanvasSurface = CanvasSurface {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn given_no_tree_when_rendering_then_no_commands() {
        assert!(render(None, Some(&SURFACE), &CanvasStyle::default()).is_empty());
    }

    #[test]
    fn given_no_surface_when_rendering_then_no_commands() {
        let tree = node(1, "Jump");
        assert!(render(Some(&tree), None, &CanvasStyle::default()).is_empty());
    }

    #[test]
    fn given_single_node_when_rendering_then_card_centred_at_top() {
        let tree = node(1, "Jump");
        let cmds = render(Some(&tree), Some(&SURFACE), &CanvasStyle::default());
        assert_eq!(cmds.len(), 4);
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
        let DrawCommand::RoundRect { x, y, .. } = cmds[1] else {
            panic!("expected card");
        };
        assert_eq!((x, y), (400.0 - 90.0, 70.0 - 40.0));
    }

    #[test]
    fn given_long_texts_when_rendering_then_truncated() {
        let tree = node(1, "An extremely long mechanic name");
        let cmds = render(Some(&tree), Some(&SURFACE), &CanvasStyle::default());
        let texts: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts[0].chars().count(), 20);
        assert_eq!(texts[1].chars().count(), 24);
    }

    #[test]
    fn given_child_straight_below_when_rendering_then_arrow_points_down() {
        let tree = node(1, "A").with_child(None, node(2, "B"));
        let cmds = render(Some(&tree), Some(&SURFACE), &CanvasStyle::default());
        let DrawCommand::Arrowhead { tip, left, right, .. } = cmds
            .iter()
            .find(|c| matches!(c, DrawCommand::Arrowhead { .. }))
            .cloned()
            .unwrap()
        else {
            unreachable!()
        };
        assert_eq!(tip, Point::new(400.0, 70.0 + 140.0 - 40.0));
        assert!(left.y < tip.y && right.y < tip.y);
        assert!((left.x - tip.x + (right.x - tip.x)).abs() < 1e-9);
    }
}
