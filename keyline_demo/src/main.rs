// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale legend demos.
mod html;

use std::error::Error;
use std::time::Duration;

use keyline_layout::{Accessor, Legend, LegendSpec, LegendStyle, Orient};
use keyline_render::{Renderer, SvgRenderer};
use keyline_text::{FontFamily, TextMeasurer};
use kurbo::Rect;
use peniko::Brush;
use peniko::color::palette::css;
use tracing_subscriber::EnvFilter;

use html::HtmlSection;

type DemoResult = Result<HtmlSection, Box<dyn Error>>;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sections = vec![
        orientations_demo()?,
        scales_demo()?,
        descending_demo()?,
        per_tick_fonts_demo()?,
        transition_demo()?,
    ];

    let html = html::render_report("Keyline legends demo", &sections);
    std::fs::write("keyline_demo.html", html)?;
    println!("wrote keyline_demo.html");
    Ok(())
}

fn demo_measurer() -> Box<dyn TextMeasurer> {
    #[cfg(feature = "parley")]
    {
        Box::new(keyline_text_parley::ParleyTextMeasurer::new())
    }

    #[cfg(not(feature = "parley"))]
    {
        Box::new(keyline_text::HeuristicTextMeasurer)
    }
}

/// Lays out `spec` and renders its final frame.
fn render_still(spec: &LegendSpec, prefix: &str) -> Result<String, Box<dyn Error>> {
    let measurer = demo_measurer();
    let layout = spec.layout(measurer.as_ref(), None)?;
    tracing::info!(prefix, outer = ?layout.outer_bounds(), ticks = layout.ticks.len(), "laid out");
    let mut renderer = SvgRenderer::new()
        .with_id_prefix(prefix)
        .with_view_box(view_box(spec));
    renderer.render(&layout, &spec.style, Duration::ZERO, None);
    renderer.advance(layout.duration);
    Ok(renderer.to_svg_string())
}

fn orientations_demo() -> DemoResult {
    let mut section = HtmlSection::new(
        "Orientations",
        "The same linear [0, 100] legend on each side of its bar.",
    );
    for orient in Orient::ALL {
        let spec = LegendSpec::new()
            .with_orient(orient)
            .with_domain(0.0, 100.0);
        let spec = if orient.is_horizontal() {
            spec.with_size(400.0, 60.0)
        } else {
            spec.with_size(80.0, 300.0)
        };
        let prefix = format!("orient-{orient:?}").to_lowercase();
        section.frames.push(render_still(&spec, &prefix)?);
    }
    Ok(section)
}

fn scales_demo() -> DemoResult {
    let mut section = HtmlSection::new(
        "Scale kinds",
        "Log (base 10), sqrt, symlog and time scales with generated ticks.",
    );
    let specs = [
        ("log", LegendSpec::new().with_scale("log").with_domain(1.0, 10_000.0)),
        ("sqrt", LegendSpec::new().with_scale("sqrt").with_domain(0.0, 100.0)),
        (
            "symlog",
            LegendSpec::new()
                .with_scale("symlog")
                .with_domain(-1000.0, 1000.0),
        ),
        ("time", LegendSpec::new().with_scale("time").with_domain(0.0, 3600.0)),
    ];
    for (name, spec) in specs {
        let spec = spec.with_size(400.0, 60.0);
        section.frames.push(render_still(&spec, &format!("scale-{name}"))?);
    }
    Ok(section)
}

fn descending_demo() -> DemoResult {
    let mut section = HtmlSection::new(
        "Descending domain and explicit ticks",
        "A [1, 0] domain maps 1 to the left edge; labels use a custom formatter.",
    );
    let spec = LegendSpec::new()
        .with_domain(1.0, 0.0)
        .with_ticks([0.0, 0.25, 0.5, 0.75, 1.0])
        .with_tick_formatter(|v, _| format!("{:.0}%", v * 100.0))
        .with_size(400.0, 60.0)
        .with_style(LegendStyle {
            stroke: Brush::Solid(css::STEEL_BLUE),
            label_fill: Brush::Solid(css::DARK_SLATE_GRAY),
        });
    section.frames.push(render_still(&spec, "descending")?);
    Ok(section)
}

fn per_tick_fonts_demo() -> DemoResult {
    let mut section = HtmlSection::new(
        "Per-tick fonts",
        "Font size grows with the tick index; even ticks use a serif family.",
    );
    let spec = LegendSpec::new()
        .with_orient(Orient::Left)
        .with_domain(0.0, 50.0)
        .with_size(120.0, 320.0)
        .with_font_size(Accessor::per_datum(|_, i| 9.0 + 2.0 * i as f64))
        .with_font_family(Accessor::per_datum(|_, i| {
            if i % 2 == 0 {
                FontFamily::Serif
            } else {
                FontFamily::SansSerif
            }
        }));
    section.frames.push(render_still(&spec, "fonts")?);
    Ok(section)
}

fn transition_demo() -> DemoResult {
    let mut section = HtmlSection::new(
        "Domain transition",
        "Frames at 0%, 25%, 50%, 75% and 100% of a [0, 10] to [0, 250] update.",
    );
    let measurer = demo_measurer();
    let spec = LegendSpec::new()
        .with_size(400.0, 60.0)
        .with_duration(Duration::from_millis(400));
    let mut legend = Legend::new(spec.clone());
    let mut renderer = SvgRenderer::new().with_view_box(view_box(&spec));

    let first = legend.update(measurer.as_ref())?.clone();
    renderer.render(&first, &spec.style, Duration::ZERO, None);
    renderer.advance(first.duration);

    legend.set_spec(spec.clone().with_domain(0.0, 250.0));
    let second = legend.update(measurer.as_ref())?;
    let start = first.duration;
    renderer.render(
        second,
        &spec.style,
        start,
        Some(Box::new(|| tracing::info!("transition finished"))),
    );
    for step in 0..=4_u32 {
        renderer.advance(start + second.duration * step / 4);
        renderer.set_id_prefix(format!("transition-{step}"));
        section.frames.push(renderer.to_svg_string());
    }
    Ok(section)
}

/// The container rectangle of a spec.
fn view_box(spec: &LegendSpec) -> Rect {
    Rect::from_origin_size((0.0, 0.0), spec.size)
}
