//! Typst source for the fixed-layout PDF export.

use std::fmt::Write;

use super::common::{escape_typst_string, paragraph_lines};
use super::outline::{item_prefix, nip_line, Block, Outline, SectionBlock, SignatureColumn};
use super::ThemeColor;
use crate::text::ParsedSection;

/// Page setup and helper functions used by the generated body.
const PREAMBLE: &str = r##"#set document(title: "Perencanaan Pembelajaran")
#set page(paper: "a4", margin: (top: 2cm, right: 2cm, bottom: 2cm, left: 2.5cm))
#set text(font: ("Times New Roman", "Liberation Serif", "TeX Gyre Termes"), size: 11pt, lang: "id")
#set par(justify: true, leading: 0.75em)

#let rpp-lines(..parts) = parts.pos().join(linebreak())
#let rpp-chapter(body) = block(width: 100%, fill: rgb("#f3f4f6"), inset: 6pt, radius: 3pt, above: 14pt, below: 8pt, text(size: 12pt, weight: "bold", body))
#let rpp-section(body) = block(above: 10pt, below: 4pt, sticky: true, text(weight: "bold", body))
#let rpp-para(body) = block(above: 3pt, below: 3pt, body)
#let rpp-item(num, body) = block(above: 3pt, below: 3pt, grid(columns: (20pt, 1fr), num, body))
#let rpp-lead(body) = block(above: 3pt, below: 3pt, body)
#let rpp-signature(above, name, nip) = stack(spacing: 6pt, ..above, v(48pt), text(weight: "bold", underline(name)), nip)
"##;

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_typst_string(text))
}

fn lines_call<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let args: Vec<String> = lines.map(quoted).collect();
    format!("rpp-lines({})", args.join(", "))
}

fn render_section(out: &mut String, section: &SectionBlock) {
    let _ = writeln!(out, "#rpp-section({})", quoted(section.label));

    match &section.body {
        ParsedSection::List(items) => {
            for item in items {
                let body = lines_call(item.text.split('\n'));
                match item_prefix(item) {
                    Some(prefix) => {
                        let _ = writeln!(out, "#rpp-item({}, {})", quoted(prefix.trim_end()), body);
                    }
                    None => {
                        let _ = writeln!(out, "#rpp-lead({})", body);
                    }
                }
            }
        }
        ParsedSection::Paragraph(text) => {
            for line in paragraph_lines(text) {
                let _ = writeln!(out, "#rpp-para({})", quoted(line));
            }
        }
    }
}

fn signature_call(column: &SignatureColumn) -> String {
    let above: Vec<String> = column.lines_above.iter().map(|l| quoted(l)).collect();
    format!(
        "rpp-signature(({},), {}, {})",
        above.join(", "),
        quoted(&column.name),
        quoted(&nip_line(&column.nip))
    )
}

/// Complete Typst document for the outline.
pub fn render_source(outline: &Outline, theme: &ThemeColor) -> String {
    let mut out = String::from(PREAMBLE);
    let _ = writeln!(out, "#let rpp-theme = rgb(\"{}\")\n", theme.hex());

    for block in &outline.blocks {
        match block {
            Block::Title { title, subtitle } => {
                let _ = writeln!(
                    out,
                    "#block(width: 100%, fill: rpp-theme, inset: 16pt, radius: 4pt, align(center, stack(spacing: 6pt, text(size: 16pt, weight: \"bold\", fill: white, {}), text(size: 10pt, fill: white, {}))))",
                    quoted(title),
                    quoted(subtitle)
                );
            }
            Block::Chapter(heading) => {
                let _ = writeln!(out, "#rpp-chapter({})", quoted(heading));
            }
            Block::IdentityTable(rows) => {
                let cells: Vec<String> = rows
                    .iter()
                    .flat_map(|(label, value)| [quoted(label), quoted(value)])
                    .collect();
                let _ = writeln!(
                    out,
                    "#table(columns: (30%, 70%), stroke: 0.5pt + rgb(\"#d1d5db\"), inset: 6pt, fill: (x, _) => if x == 0 {{ rgb(\"#fafafa\") }}, {})",
                    cells.join(", ")
                );
            }
            Block::Note(note) => {
                let _ = writeln!(out, "#rpp-para(emph({}))", quoted(note));
            }
            Block::Section(section) => render_section(&mut out, section),
            Block::Signatures { left, right } => {
                let _ = writeln!(
                    out,
                    "#v(24pt)\n#block(breakable: false, grid(columns: (1fr, 1fr), align: center, {}, {}))",
                    signature_call(left),
                    signature_call(right)
                );
            }
        }
    }

    out
}
