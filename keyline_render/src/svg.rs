// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization of the displayed frame.

use core::fmt::Write as _;

use keyline_layout::{TextAnchor, VerticalAlign};
use kurbo::Rect;
use peniko::Brush;

use crate::primitive::{LinePrimitive, Primitive, TextPrimitive};
use crate::renderer::SvgRenderer;

impl SvgRenderer {
    /// Serializes the displayed frame as a standalone `<svg>` document.
    ///
    /// The bar and tick lines are clipped to the legend's clip rectangle;
    /// labels are not.
    pub fn to_svg_string(&self) -> String {
        let primitives = self.primitives();
        let computed = primitives
            .iter()
            .map(|(_, p)| p.bounds())
            .reduce(|a, b| a.union(b))
            .map(|r| r.inflate(10.0, 10.0));
        let view_box = match (self.view_box, computed) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => Rect::new(0.0, 0.0, 100.0, 100.0),
        };

        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = writeln!(
            out,
            r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        );

        let clip_id = format!("{}-clip", escape_xml(&self.id_prefix));
        let clip = primitives.iter().find_map(|(_, p)| match p {
            Primitive::Clip(r) => Some(*r),
            _ => None,
        });
        if let Some(r) = clip {
            let _ = writeln!(
                out,
                r#"<defs><clipPath id="{clip_id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
                r.x0,
                r.y0,
                r.width(),
                r.height()
            );
            let _ = writeln!(out, r#"<g clip-path="url(#{clip_id})">"#);
        } else {
            out.push_str("<g>\n");
        }
        for (_, p) in &primitives {
            if let Primitive::Line(l) = p {
                write_line(&mut out, l);
            }
        }
        out.push_str("</g>\n");

        for (_, p) in &primitives {
            if let Primitive::Text(t) = p {
                write_text(&mut out, t);
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn write_line(out: &mut String, l: &LinePrimitive) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
        l.line.p0.x, l.line.p0.y, l.line.p1.x, l.line.p1.y
    );
    write_paint_attr(out, "stroke", &l.stroke);
    let _ = write!(out, r#" stroke-width="{}""#, l.stroke_width);
    write_opacity(out, l.opacity);
    out.push_str("/>\n");
}

fn write_text(out: &mut String, t: &TextPrimitive) {
    let n = t.lines.len() as f64;
    let (baseline, first) = match t.align {
        VerticalAlign::Top => ("hanging", 0.0),
        VerticalAlign::Middle => ("middle", -(n - 1.0) * t.line_pitch / 2.0),
        VerticalAlign::Bottom => ("ideographic", -(n - 1.0) * t.line_pitch),
    };
    let anchor = match t.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let (x, y) = (t.anchor_point.x, t.anchor_point.y);
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="{}" font-family="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
        t.font_size,
        escape_xml(&t.font_family)
    );
    write_paint_attr(out, "fill", &t.fill);
    write_opacity(out, t.opacity);
    out.push('>');
    let mut dy = y + first;
    for line in &t.lines {
        let _ = write!(out, r#"<tspan x="{x}" y="{dy}">{}</tspan>"#, escape_xml(line));
        dy += t.line_pitch;
    }
    out.push_str("</text>\n");
}

fn write_opacity(out: &mut String, opacity: f64) {
    if opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, opacity.max(0.0));
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
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
    use std::time::Duration;

    use keyline_layout::{LegendSpec, Orient};
    use keyline_text::HeuristicTextMeasurer;
    use peniko::color::palette::css;

    use super::*;
    use crate::renderer::Renderer;

    fn rendered(spec: &LegendSpec) -> String {
        let layout = spec.layout(&HeuristicTextMeasurer, None).unwrap();
        let mut r = SvgRenderer::new().with_id_prefix("legend-a");
        r.render(&layout, &spec.style, Duration::ZERO, None);
        r.to_svg_string()
    }

    #[test]
    fn lines_are_clipped_and_labels_escaped() {
        let spec = LegendSpec::new()
            .with_duration(Duration::ZERO)
            .with_ticks([0.0, 10.0])
            .with_tick_formatter(|v, _| format!("<{v}&>"));
        let svg = rendered(&spec);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<clipPath id="legend-a-clip">"#));
        assert!(svg.contains(r#"<g clip-path="url(#legend-a-clip)">"#));
        // Bar and two ticks.
        assert_eq!(svg.matches("<line ").count(), 3);
        assert!(svg.contains("&lt;10&amp;&gt;"));
        assert!(svg.contains(r##"stroke="#000000""##));
        assert!(!svg.contains("opacity="));
    }

    #[test]
    fn label_blocks_follow_orientation() {
        let spec = LegendSpec::new()
            .with_duration(Duration::ZERO)
            .with_orient(Orient::Left)
            .with_ticks([5.0]);
        let svg = rendered(&spec);
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(r#"dominant-baseline="middle""#));
        assert_eq!(svg.matches("<tspan").count(), 1);

        let spec = spec.with_orient(Orient::Bottom);
        let svg = rendered(&spec);
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"dominant-baseline="hanging""#));
    }

    #[test]
    fn translucent_paint_and_fading_opacity() {
        let mut out = String::new();
        write_paint_attr(&mut out, "fill", &Brush::Solid(css::BLACK.with_alpha(0.5)));
        assert!(out.starts_with(r##" fill="#000000" fill-opacity="##));

        let mut out = String::new();
        write_opacity(&mut out, 0.25);
        assert_eq!(out, r#" opacity="0.25""#);
    }

    #[test]
    fn multi_line_labels_stack_by_pitch() {
        let t = TextPrimitive {
            anchor_point: kurbo::Point::new(0.0, 20.0),
            lines: vec!["a".into(), "b".into()],
            line_pitch: 11.0,
            font_size: 10.0,
            font_family: "sans-serif".into(),
            anchor: TextAnchor::Start,
            align: VerticalAlign::Bottom,
            fill: Brush::Solid(css::BLACK),
            bounds: Rect::new(0.0, -2.0, 6.0, 20.0),
            opacity: 1.0,
        };
        let mut out = String::new();
        write_text(&mut out, &t);
        assert!(out.contains(r#"<tspan x="0" y="9">a</tspan><tspan x="0" y="20">b</tspan>"#));
    }
}
