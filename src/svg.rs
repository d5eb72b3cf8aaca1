use std::fmt::Write;

use crate::scene::{DrawCommand, Outline, Scene, Viewport};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn outline_shape(out: &mut String, outline: &Outline, attrs: &str) {
    if outline.full_circle {
        // an arc whose ends meet draws nothing, so use a real circle
        let _ = writeln!(
            out,
            r#"  <circle cx="{c}" cy="{c}" r="{r}" {attrs}/>"#,
            c = outline.center,
            r = outline.radius,
        );
    } else {
        let _ = writeln!(out, r#"  <path d="{}" {attrs}/>"#, outline.path());
    }
}

/// The part of the viewBox that lands inside the display box, as
/// `(x, y, width, height)`. Keeps the full-size scale so overflow is cut off
/// rather than shrunk into view.
fn visible_box(scene: &Scene, viewport: &Viewport) -> (f64, f64, f64, f64) {
    if viewport.scale <= 0.0 {
        return (0.0, 0.0, scene.view_box, scene.view_box);
    }
    let (x, y) = viewport.from_pixels(0.0, 0.0);
    (
        x,
        y,
        scene.display.width / viewport.scale,
        scene.display.height / viewport.scale,
    )
}

/// Serializes a scene as a standalone SVG document, cropped to the display box.
///
/// Everything except the readout is drawn in viewBox units; the readout is
/// mapped back from output pixels so it lands where the scene placed it.
pub fn render_svg(scene: &Scene) -> String {
    let viewport = Viewport::new(scene);
    let (vb_x, vb_y, vb_width, vb_height) = visible_box(scene, &viewport);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{vb_x} {vb_y} {vb_width} {vb_height}">"#,
        scene.display.width,
        scene.display.height,
    );

    for command in scene.commands() {
        match command {
            DrawCommand::Ring {
                class,
                arc,
                opacity,
            } => {
                let _ = writeln!(
                    out,
                    r#"  <circle cx="{cx}" cy="{cy}" r="{r}" fill="transparent" stroke="{stroke}" stroke-opacity="{opacity}" stroke-width="{w}" stroke-dasharray="{dash}" transform="{rot}" class="{class}"/>"#,
                    cx = arc.rotation.cx,
                    cy = arc.rotation.cy,
                    r = arc.radius,
                    stroke = escape(arc.color.as_deref().unwrap_or("")),
                    w = arc.stroke_width,
                    dash = arc.dash,
                    rot = arc.rotation,
                );
            }
            DrawCommand::Face {
                outline,
                fill,
                opacity,
            } => {
                let attrs = format!(
                    r#"class="face" fill="{}" fill-opacity="{opacity}""#,
                    escape(fill)
                );
                outline_shape(&mut out, outline, &attrs);
            }
            DrawCommand::Axis {
                outline,
                stroke,
                stroke_width,
            } => {
                let attrs = format!(
                    r#"class="axis" fill="transparent" stroke="{}" stroke-width="{stroke_width}""#,
                    escape(stroke)
                );
                outline_shape(&mut out, outline, &attrs);
            }
            DrawCommand::Tick { start, end, stroke } => {
                let _ = writeln!(
                    out,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" class="axis-tick"/>"#,
                    start.0,
                    start.1,
                    end.0,
                    end.1,
                    escape(stroke)
                );
            }
            DrawCommand::Label {
                anchor,
                text,
                font_size,
                fill,
            } => {
                let _ = writeln!(
                    out,
                    r#"  <text x="{}" y="{}" dominant-baseline="middle" text-anchor="middle" font-size="{font_size}" fill="{}" class="axis-label">{}</text>"#,
                    anchor.0,
                    anchor.1,
                    escape(fill),
                    escape(text)
                );
            }
            DrawCommand::Readout {
                x,
                y,
                text,
                font_size,
                fill,
            } => {
                if viewport.scale <= 0.0 {
                    continue;
                }
                let (x, y) = viewport.from_pixels(*x, *y);
                let _ = writeln!(
                    out,
                    r#"  <text x="{}" y="{}" dominant-baseline="middle" text-anchor="middle" font-size="{}" fill="{}" class="value">{}</text>"#,
                    x,
                    y,
                    font_size / viewport.scale,
                    escape(fill),
                    escape(text)
                );
            }
        }
    }

    out.push_str("</svg>\n");
    out
}
