// Copyright 2025 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTML report assembly.

use std::fmt::Write as _;

/// One titled group of SVG frames.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: String,
    pub(crate) note: String,
    pub(crate) frames: Vec<String>,
}

impl HtmlSection {
    pub(crate) fn new(title: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            note: note.into(),
            frames: Vec::new(),
        }
    }
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title>"
    );
    out.push_str(
        "<style>body{font-family:sans-serif;margin:2em}\
         section{margin-bottom:2em}\
         .frames{display:flex;flex-wrap:wrap;gap:1em}\
         .frames svg{border:1px solid #ddd}</style>\n",
    );
    let _ = writeln!(out, "</head><body>\n<h1>{title}</h1>");
    for section in sections {
        let _ = writeln!(
            out,
            "<section><h2>{}</h2><p>{}</p><div class=\"frames\">",
            section.title, section.note
        );
        for frame in &section.frames {
            out.push_str(frame);
        }
        out.push_str("</div></section>\n");
    }
    out.push_str("</body></html>\n");
    out
}
