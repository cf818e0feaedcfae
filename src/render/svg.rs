//! SVG serialisation of a canvas display list.

use std::fmt::{self, Write};

use quick_xml::escape::escape;

use crate::render::canvas::{CanvasSurface, DrawCommand};

/// Render `commands` as a standalone SVG document of the surface size.
pub fn to_svg(commands: &[DrawCommand], surface: &CanvasSurface) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_svg(&mut out, commands, surface)?;
    Ok(out)
}

fn write_svg(out: &mut impl Write, commands: &[DrawCommand], surface: &CanvasSurface) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = surface.width,
        h = surface.height
    )?;
    for cmd in commands {
        match cmd {
            DrawCommand::Clear { width, height } => writeln!(
                out,
                r##"  <rect x="0" y="0" width="{width}" height="{height}" fill="#111827"/>"##
            ),
            DrawCommand::RoundRect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
                line_width,
            } => writeln!(
                out,
                r#"  <rect x="{x}" y="{y}" width="{width}" height="{height}" rx="{radius}" fill="{fill}" stroke="{stroke}" stroke-width="{line_width}"/>"#
            ),
            DrawCommand::Line {
                from,
                to,
                stroke,
                line_width,
            } => writeln!(
                out,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                from.x, from.y, to.x, to.y
            ),
            DrawCommand::Arrowhead {
                tip,
                left,
                right,
                fill,
            } => writeln!(
                out,
                r#"  <polygon points="{},{} {},{} {},{}" fill="{fill}"/>"#,
                tip.x, tip.y, left.x, left.y, right.x, right.y
            ),
            DrawCommand::Text {
                at,
                text,
                font,
                fill,
            } => writeln!(
                out,
                r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" style="font: {font}" fill="{fill}">{}</text>"#,
                at.x,
                at.y,
                escape(text.as_str())
            ),
        }?;
    }
    writeln!(out, "</svg>")
}
