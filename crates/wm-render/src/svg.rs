//! SVG export of a map, honouring a presentation [`RevealPlan`].
//!
//! Paint order: background, axes, connections, components, notes, then
//! overlays (paths, shapes, text, icons, images) so annotations sit on top.

use crate::project::{PixelShape, project_shape};
use crate::reveal::RevealPlan;
use wm_core::{
    Component, FontWeight, MARGIN, OverlayKind, ShapeOverlay, Viewport, WardleyMap,
};

const COMPONENT_RADIUS: f64 = 6.0;
const AXIS_COLOR: &str = "#333333";

pub fn render_svg(map: &WardleyMap, vp: &Viewport, plan: &RevealPlan) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = vp.width,
        h = vp.height
    ));
    out.push('\n');
    out.push_str(
        r##"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="#666666"/></marker></defs>"##,
    );
    out.push('\n');
    out.push_str(&format!(
        r##"<rect width="{}" height="{}" fill="#FFFFFF"/>"##,
        vp.width, vp.height
    ));
    out.push('\n');

    render_axes(&mut out, map, vp);
    render_connections(&mut out, map, vp, plan);
    for component in &map.components {
        if let Some(opacity) = plan.component(&component.name) {
            render_component(&mut out, component, vp, opacity);
        }
    }
    for note in &map.notes {
        if let Some(opacity) = plan.note(note) {
            let p = vp.to_pixel(note.x, note.y);
            out.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" font-size="12" font-style="italic" fill="#555555" opacity="{opacity}">{}</text>"##,
                p.x,
                p.y,
                escape(&note.text)
            ));
            out.push('\n');
        }
    }
    render_overlays(&mut out, map, vp, plan);

    out.push_str("</svg>\n");
    log::trace!("rendered svg: {} bytes", out.len());
    out
}

fn render_axes(out: &mut String, map: &WardleyMap, vp: &Viewport) {
    let left = MARGIN;
    let right = vp.width - MARGIN;
    let top = MARGIN;
    let bottom = vp.height - MARGIN;

    if !map.title.is_empty() {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="20" font-weight="bold" text-anchor="middle">{}</text>"#,
            vp.width / 2.0,
            top / 2.0 + 7.0,
            escape(&map.title)
        ));
        out.push('\n');
    }

    out.push_str(&format!(
        r#"<line x1="{left}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="{AXIS_COLOR}" stroke-width="2" marker-end="url(#arrow)"/>"#
    ));
    out.push_str(&format!(
        r#"<line x1="{left}" y1="{bottom}" x2="{left}" y2="{top}" stroke="{AXIS_COLOR}" stroke-width="2" marker-end="url(#arrow)"/>"#
    ));
    out.push('\n');

    let stages = map.evolution_stages();
    let band = vp.scale_x() / stages.len() as f64;
    for (i, stage) in stages.iter().enumerate() {
        let x0 = left + band * i as f64;
        if i > 0 {
            out.push_str(&format!(
                r##"<line x1="{x0:.1}" y1="{top}" x2="{x0:.1}" y2="{bottom}" stroke="#CCCCCC" stroke-dasharray="4 4"/>"##
            ));
        }
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
            x0 + band / 2.0,
            bottom + 20.0,
            escape(stage)
        ));
        out.push('\n');
    }
    out.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 {:.1} {:.1})">Value Chain</text>"#,
        left - 20.0,
        (top + bottom) / 2.0,
        left - 20.0,
        (top + bottom) / 2.0
    ));
    out.push('\n');
}

fn render_connections(out: &mut String, map: &WardleyMap, vp: &Viewport, plan: &RevealPlan) {
    for conn in &map.connections {
        let Some((from, to)) = map.resolve_connection(conn) else {
            continue;
        };
        let Some(opacity) = plan.connection(conn) else {
            continue;
        };
        let a = vp.to_pixel(from.x, from.y);
        let b = vp.to_pixel(to.x, to.y);
        out.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#666666" stroke-width="1.5" marker-end="url(#arrow)" opacity="{opacity}"/>"##,
            a.x, a.y, b.x, b.y
        ));
        out.push('\n');
    }
}

fn render_component(out: &mut String, c: &Component, vp: &Viewport, opacity: f64) {
    let p = vp.to_pixel(c.x, c.y);
    let color = escape(c.display_color());
    out.push_str(&format!(
        r##"<g opacity="{opacity}"><circle cx="{:.1}" cy="{:.1}" r="{COMPONENT_RADIUS}" fill="#FFFFFF" stroke="{color}" stroke-width="2"/>"##,
        p.x, p.y
    ));
    if c.inertia {
        out.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{AXIS_COLOR}" stroke-width="4"/>"#,
            p.x + 15.0,
            p.y - 10.0,
            p.x + 15.0,
            p.y + 10.0
        ));
    }
    let (dx, dy) = c.label.map_or((0.0, 0.0), |l| (l.dx, l.dy));
    out.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="12" fill="{color}">{}</text></g>"#,
        p.x + 10.0 + dx,
        p.y - 10.0 + dy,
        escape(&c.name)
    ));
    out.push('\n');
}

fn render_overlays(out: &mut String, map: &WardleyMap, vp: &Viewport, plan: &RevealPlan) {
    let overlays = &map.overlays;

    for path in &overlays.paths {
        let Some(reveal) = plan.overlay(OverlayKind::Path, path.id.as_str()) else {
            continue;
        };
        let points: Vec<String> = path
            .points
            .iter()
            .map(|p| {
                let px = vp.point_to_pixel(*p);
                format!("{:.1},{:.1}", px.x, px.y)
            })
            .collect();
        out.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" opacity="{}"/>"#,
            points.join(" "),
            escape(&path.stroke_color),
            path.stroke_width,
            reveal * path.opacity / 100.0
        ));
        out.push('\n');
    }

    for shape in &overlays.shapes {
        if let Some(reveal) = plan.overlay(OverlayKind::Shape, shape.id.as_str()) {
            render_shape(out, shape, vp, reveal);
        }
    }

    for text in &overlays.texts {
        let Some(reveal) = plan.overlay(OverlayKind::Text, text.id.as_str()) else {
            continue;
        };
        let p = vp.to_pixel(text.x, text.y);
        let weight = match text.font_weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{}" font-weight="{weight}" fill="{}" opacity="{}">{}</text>"#,
            p.x,
            p.y,
            text.font_size,
            escape(&text.color),
            reveal * text.opacity / 100.0,
            escape(&text.text)
        ));
        out.push('\n');
    }

    for icon in &overlays.icons {
        let Some(reveal) = plan.overlay(OverlayKind::Icon, icon.id.as_str()) else {
            continue;
        };
        let p = vp.to_pixel(icon.x, icon.y);
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{}" text-anchor="middle" dominant-baseline="central" opacity="{reveal}">{}</text>"#,
            p.x,
            p.y,
            icon.size,
            escape(&icon.icon)
        ));
        out.push('\n');
    }

    for image in &overlays.images {
        let Some(reveal) = plan.overlay(OverlayKind::Image, image.id.as_str()) else {
            continue;
        };
        let p = vp.to_pixel(image.x, image.y);
        out.push_str(&format!(
            r#"<image href="{}" x="{:.1}" y="{:.1}" width="{}" height="{}" opacity="{reveal}"/>"#,
            escape(&image.src),
            p.x,
            p.y,
            image.width,
            image.height
        ));
        out.push('\n');
    }
}

fn render_shape(out: &mut String, shape: &ShapeOverlay, vp: &Viewport, reveal: f64) {
    let style = &shape.style;
    let fill = if style.filled {
        escape(&style.fill_color)
    } else {
        "none".to_string()
    };
    let paint = format!(
        r#"fill="{fill}" stroke="{}" stroke-width="{}" opacity="{}""#,
        escape(&style.stroke_color),
        style.stroke_width,
        reveal * style.opacity / 100.0
    );
    let element = match project_shape(shape, vp) {
        PixelShape::Segment { start, end } => format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" {paint}/>"#,
            start.x, start.y, end.x, end.y
        ),
        PixelShape::Box(r) => format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" {paint}/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height()
        ),
        PixelShape::Disc { center, radius } => format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" {paint}/>"#,
            center.x, center.y, radius
        ),
        PixelShape::Triangle { apex, left, right } => format!(
            r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" {paint}/>"#,
            apex.x, apex.y, left.x, left.y, right.x, right.y
        ),
    };
    out.push_str(&element);
    out.push('\n');
}

/// Escape text for use in SVG content and attribute values.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::reveal_plan;
    use wm_core::{OverlayId, SequenceKind, ShapeGeometry, TextOverlay, parse_map};

    #[test]
    fn renders_components_connections_and_title() {
        let map = parse_map(
            "title Tea & Cake\ncomponent Cup [0.8, 0.6] (buy) inertia\ncomponent Tea [0.6, 0.7]\nCup -> Tea",
        );
        let svg = render_svg(&map, &Viewport::default(), &RevealPlan::Full);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Tea &amp; Cake"));
        assert!(svg.contains(">Cup</text>"));
        assert!(svg.contains("#7ED321"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r#"stroke-width="4""#), "inertia marker missing");
        assert!(svg.contains("Commodity"));
    }

    #[test]
    fn connections_point_at_their_target() {
        let map = parse_map("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B\nB -> Ghost");
        let svg = render_svg(&map, &Viewport::default(), &RevealPlan::Full);
        assert!(svg.contains(r#"<marker id="arrow""#));
        assert_eq!(
            svg.matches(r#"stroke-width="1.5" marker-end="url(#arrow)""#).count(),
            1
        );
    }

    #[test]
    fn reveal_plan_hides_later_items() {
        let mut map = parse_map("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B");
        map.sequence.toggle(SequenceKind::Component, "A");
        map.sequence.toggle(SequenceKind::Connection, "A->B");
        let svg = render_svg(&map, &Viewport::default(), &reveal_plan(&map, 1));
        assert!(svg.contains(">A</text>"));
        assert!(!svg.contains(">B</text>"));
        assert!(svg.contains(r#"<g opacity="0.7">"#));
    }

    #[test]
    fn overlays_are_drawn_on_top() {
        let mut map = WardleyMap::default();
        let mut rect = ShapeOverlay::new(
            OverlayId::intern("svg_rect"),
            0.1,
            0.9,
            ShapeGeometry::Rectangle {
                width: 0.2,
                height: 0.1,
            },
        );
        rect.style.filled = true;
        rect.style.fill_color = "#FFEEAA".into();
        map.overlays.shapes.push(rect);
        map.overlays.texts.push(TextOverlay::new(
            OverlayId::intern("svg_text"),
            "<note>",
            0.5,
            0.5,
        ));
        let svg = render_svg(&map, &Viewport::default(), &RevealPlan::Full);
        assert!(svg.contains(r##"fill="#FFEEAA""##));
        assert!(svg.contains("&lt;note&gt;"));
        let rect_at = svg.find("<rect x=").unwrap();
        let axis_at = svg.find("<line").unwrap();
        assert!(rect_at > axis_at);
    }
}
