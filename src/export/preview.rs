//! HTML rendering of the outline, used for the live preview and as the body
//! of the standalone HTML export.

use std::fmt::Write;

use super::common::{escape_html, paragraph_lines};
use super::outline::{item_prefix, nip_line, Block, Outline, SectionBlock, SignatureColumn};
use super::ThemeColor;
use crate::text::ParsedSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Editable sections carry a text area with the raw text.
    Editable,
    Static,
}

pub fn render_fragment(outline: &Outline, theme: &ThemeColor, mode: PreviewMode) -> String {
    let mut html = String::from("<div id=\"preview-content\">\n");

    for block in &outline.blocks {
        match block {
            Block::Title { title, subtitle } => {
                let _ = writeln!(
                    html,
                    "<div class=\"rpp-header\" style=\"background-color: {};\"><h2>{}</h2><p>{}</p></div>\n<div class=\"rpp-body\">",
                    theme.hex(),
                    escape_html(title),
                    escape_html(subtitle)
                );
            }
            Block::Chapter(heading) => {
                let _ = writeln!(html, "<h3 class=\"rpp-chapter\">{}</h3>", escape_html(heading));
            }
            Block::IdentityTable(rows) => {
                html.push_str("<table class=\"rpp-identity\"><tbody>\n");
                for (label, value) in rows {
                    let _ = writeln!(
                        html,
                        "<tr><td class=\"rpp-label\">{}</td><td>{}</td></tr>",
                        escape_html(label),
                        escape_html(value)
                    );
                }
                html.push_str("</tbody></table>\n");
            }
            Block::Note(note) => {
                let _ = writeln!(html, "<p class=\"rpp-note\">{}</p>", escape_html(note));
            }
            Block::Section(section) => render_section(&mut html, section, mode),
            Block::Signatures { left, right } => {
                html.push_str("<table class=\"rpp-signatures\"><tbody><tr>\n");
                render_signature(&mut html, left);
                render_signature(&mut html, right);
                html.push_str("</tr></tbody></table>\n");
            }
        }
    }

    html.push_str("</div>\n</div>\n");
    html
}

fn render_section(html: &mut String, section: &SectionBlock, mode: PreviewMode) {
    let _ = writeln!(
        html,
        "<section class=\"rpp-section\" data-key=\"{}\">\n<h4>{}</h4>",
        section.key,
        escape_html(section.label)
    );

    if mode == PreviewMode::Editable && section.editable {
        let rows = section.raw.lines().count().max(1);
        let _ = writeln!(
            html,
            "<textarea name=\"{}\" rows=\"{}\">{}</textarea>",
            section.key,
            rows,
            escape_html(&section.raw)
        );
    }

    html.push_str("<div class=\"rpp-content\">\n");
    render_body(html, &section.body);
    html.push_str("</div>\n</section>\n");
}

/// Lay out a parsed section. Item bodies keep their line breaks.
pub fn render_body(html: &mut String, body: &ParsedSection) {
    match body {
        ParsedSection::List(items) => {
            html.push_str("<div class=\"rpp-list\">\n");
            for item in items {
                let text = item
                    .text
                    .split('\n')
                    .map(escape_html)
                    .collect::<Vec<_>>()
                    .join("<br>");
                match item_prefix(item) {
                    Some(prefix) => {
                        let _ = writeln!(
                            html,
                            "<p class=\"rpp-item\" data-ordinal=\"{}\">{}{}</p>",
                            item.ordinal,
                            escape_html(&prefix),
                            text
                        );
                    }
                    None => {
                        let _ = writeln!(html, "<p class=\"rpp-item rpp-lead\">{}</p>", text);
                    }
                }
            }
            html.push_str("</div>\n");
        }
        ParsedSection::Paragraph(text) => {
            for line in paragraph_lines(text) {
                let _ = writeln!(html, "<p>{}</p>", escape_html(line));
            }
        }
    }
}

fn render_signature(html: &mut String, column: &SignatureColumn) {
    html.push_str("<td class=\"rpp-signature\">\n");
    for line in &column.lines_above {
        let _ = writeln!(html, "<p>{}</p>", escape_html(line));
    }
    let _ = writeln!(
        html,
        "<div class=\"rpp-signature-space\"></div>\n<p class=\"rpp-signature-name\">{}</p>\n<p>{}</p>",
        escape_html(&column.name),
        escape_html(&nip_line(&column.nip))
    );
    html.push_str("</td>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::build_outline;
    use crate::lesson_plan::LessonPlan;

    fn plan() -> LessonPlan {
        LessonPlan {
            core_activities: "1. Amati <gambar>\nlanjutan\n2. Diskusi".into(),
            subject_matter: "Siklus Air".into(),
            principal_name: "Budi".into(),
            principal_nip: "123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn editable_mode_adds_text_areas() {
        let outline = build_outline(&plan());
        let html = render_fragment(&outline, &ThemeColor::default(), PreviewMode::Editable);
        assert!(html.contains("<textarea name=\"coreActivities\" rows=\"3\">"));
        assert!(!html.contains("<textarea name=\"subjectMatter\""));

        let html = render_fragment(&outline, &ThemeColor::default(), PreviewMode::Static);
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn list_items_keep_internal_breaks() {
        let outline = build_outline(&plan());
        let html = render_fragment(&outline, &ThemeColor::default(), PreviewMode::Static);
        assert!(html.contains(
            "<p class=\"rpp-item\" data-ordinal=\"1\">1. Amati &lt;gambar&gt;<br>lanjutan</p>"
        ));
        assert!(html.contains("data-ordinal=\"2\">2. Diskusi</p>"));
    }

    #[test]
    fn header_uses_theme_and_signature_block_present() {
        let outline = build_outline(&plan());
        let theme = ThemeColor::parse("#004d40").unwrap();
        let html = render_fragment(&outline, &theme, PreviewMode::Static);
        assert!(html.contains("background-color: #004d40;"));
        assert!(html.contains("<p class=\"rpp-signature-name\">Budi</p>\n<p>NIP. 123</p>"));
    }
}
