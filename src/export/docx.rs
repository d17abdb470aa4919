//! DOCX export as a hand-assembled WordprocessingML package.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::common::{escape_xml, paragraph_lines};
use super::outline::{item_prefix, nip_line, Block, Outline, SectionBlock, SignatureColumn};
use super::ExportError;
use crate::text::ParsedSection;

/// Style id of numbered list paragraphs.
pub const LIST_ITEM_STYLE: &str = "RppListItem";

// Twips: 1 cm = 567, 1 inch = 1440. List items indent 0.5in with a 0.25in hang.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
const MARGIN_TOP: u32 = 1134;
const MARGIN_RIGHT: u32 = 1134;
const MARGIN_BOTTOM: u32 = 1134;
const MARGIN_LEFT: u32 = 1418;
const CONTENT_WIDTH: u32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman" w:eastAsia="Times New Roman" w:cs="Times New Roman"/><w:color w:val="000000"/><w:sz w:val="24"/><w:szCs w:val="24"/><w:lang w:val="id-ID"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:jc w:val="center"/><w:spacing w:after="200"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:jc w:val="center"/><w:spacing w:after="200"/></w:pPr><w:rPr><w:i/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:shd w:val="clear" w:color="auto" w:fill="F3F4F6"/><w:spacing w:before="300" w:after="150"/></w:pPr><w:rPr><w:b/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="RppListItem"><w:name w:val="RPP List Item"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style></w:styles>"#;

/// Accumulates `word/document.xml` body content.
struct BodyWriter {
    xml: String,
}

impl BodyWriter {
    fn new() -> Self {
        Self { xml: String::new() }
    }

    fn runs(lines: &[&str], props: &str) -> String {
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push_str("<w:r><w:br/></w:r>");
            }
            out.push_str(&format!(
                "<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
                props,
                escape_xml(line)
            ));
        }
        out
    }

    fn paragraph(&mut self, style: Option<&str>, extra_ppr: &str, runs: &str) {
        self.xml.push_str("<w:p><w:pPr>");
        if let Some(style) = style {
            self.xml.push_str(&format!("<w:pStyle w:val=\"{}\"/>", style));
        }
        self.xml.push_str(extra_ppr);
        self.xml.push_str("</w:pPr>");
        self.xml.push_str(runs);
        self.xml.push_str("</w:p>");
    }

    fn text(&mut self, style: Option<&str>, text: &str) {
        self.paragraph(style, "", &Self::runs(&[text], ""));
    }

    fn empty(&mut self) {
        self.xml.push_str("<w:p/>");
    }

    fn section(&mut self, section: &SectionBlock) {
        self.paragraph(
            None,
            "<w:keepNext/><w:spacing w:before=\"200\" w:after=\"100\"/>",
            &Self::runs(&[section.label], "<w:rPr><w:b/></w:rPr>"),
        );

        match &section.body {
            ParsedSection::List(items) => {
                for item in items {
                    let lines: Vec<&str> = item.text.split('\n').collect();
                    match item_prefix(item) {
                        Some(prefix) => {
                            let mut runs = Self::runs(&[prefix.as_str()], "");
                            runs.push_str(&Self::runs(&lines, ""));
                            self.paragraph(Some(LIST_ITEM_STYLE), "", &runs);
                        }
                        None => self.paragraph(None, "", &Self::runs(&lines, "")),
                    }
                }
            }
            ParsedSection::Paragraph(text) => {
                let lines: Vec<&str> = paragraph_lines(text).collect();
                self.paragraph(None, "<w:jc w:val=\"left\"/>", &Self::runs(&lines, ""));
            }
        }
    }

    fn identity_table(&mut self, rows: &[(&'static str, String)]) {
        let label_width = CONTENT_WIDTH * 30 / 100;
        let value_width = CONTENT_WIDTH - label_width;
        let border = "w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"";

        self.xml.push_str(&format!(
            "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/><w:tblBorders><w:top {b}/><w:left {b}/><w:bottom {b}/><w:right {b}/><w:insideH {b}/><w:insideV {b}/></w:tblBorders><w:tblCellMar><w:left w:w=\"100\" w:type=\"dxa\"/><w:right w:w=\"100\" w:type=\"dxa\"/></w:tblCellMar></w:tblPr><w:tblGrid><w:gridCol w:w=\"{l}\"/><w:gridCol w:w=\"{v}\"/></w:tblGrid>",
            b = border,
            l = label_width,
            v = value_width
        ));
        for (label, value) in rows {
            self.xml.push_str(&format!(
                "<w:tr><w:tc><w:tcPr><w:tcW w:w=\"{l}\" w:type=\"dxa\"/><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"FAFAFA\"/></w:tcPr><w:p>{label}</w:p></w:tc><w:tc><w:tcPr><w:tcW w:w=\"{v}\" w:type=\"dxa\"/></w:tcPr><w:p>{value}</w:p></w:tc></w:tr>",
                l = label_width,
                v = value_width,
                label = Self::runs(&[*label], ""),
                value = Self::runs(&[value.as_str()], ""),
            ));
        }
        self.xml.push_str("</w:tbl>");
    }

    fn signature_cell(column: &SignatureColumn, width: u32) -> String {
        let mut cell = format!(
            "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>",
            width
        );
        let centered = "<w:pPr><w:jc w:val=\"center\"/></w:pPr>";
        for line in &column.lines_above {
            cell.push_str(&format!("<w:p>{}{}</w:p>", centered, Self::runs(&[line.as_str()], "")));
        }
        for _ in 0..3 {
            cell.push_str("<w:p/>");
        }
        cell.push_str(&format!(
            "<w:p>{}{}</w:p>",
            centered,
            Self::runs(&[column.name.as_str()], "<w:rPr><w:b/><w:u w:val=\"single\"/></w:rPr>")
        ));
        cell.push_str(&format!(
            "<w:p>{}{}</w:p>",
            centered,
            Self::runs(&[nip_line(&column.nip).as_str()], "")
        ));
        cell.push_str("</w:tc>");
        cell
    }

    fn signatures(&mut self, left: &SignatureColumn, right: &SignatureColumn) {
        let half = CONTENT_WIDTH / 2;
        self.empty();
        self.empty();
        self.xml.push_str(&format!(
            "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/><w:tblBorders><w:top w:val=\"nil\"/><w:left w:val=\"nil\"/><w:bottom w:val=\"nil\"/><w:right w:val=\"nil\"/><w:insideH w:val=\"nil\"/><w:insideV w:val=\"nil\"/></w:tblBorders></w:tblPr><w:tblGrid><w:gridCol w:w=\"{h}\"/><w:gridCol w:w=\"{h}\"/></w:tblGrid><w:tr>{left}{right}</w:tr></w:tbl>",
            h = half,
            left = Self::signature_cell(left, half),
            right = Self::signature_cell(right, half),
        ));
    }

    fn finish(self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{body}<w:sectPr><w:pgSz w:w=\"{pw}\" w:h=\"{ph}\"/><w:pgMar w:top=\"{mt}\" w:right=\"{mr}\" w:bottom=\"{mb}\" w:left=\"{ml}\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/></w:sectPr></w:body></w:document>",
            body = self.xml,
            pw = PAGE_WIDTH,
            ph = PAGE_HEIGHT,
            mt = MARGIN_TOP,
            mr = MARGIN_RIGHT,
            mb = MARGIN_BOTTOM,
            ml = MARGIN_LEFT,
        )
    }
}

/// `word/document.xml` for the outline.
pub fn document_xml(outline: &Outline) -> String {
    let mut body = BodyWriter::new();
    let mut first_chapter = true;

    for block in &outline.blocks {
        match block {
            Block::Title { title, subtitle } => {
                body.text(Some("Heading1"), title);
                body.text(Some("Heading2"), subtitle);
                body.empty();
            }
            Block::Chapter(heading) => {
                if !first_chapter {
                    body.empty();
                }
                first_chapter = false;
                body.text(Some("Heading3"), heading);
            }
            Block::IdentityTable(rows) => body.identity_table(rows),
            Block::Note(note) => {
                body.paragraph(None, "", &BodyWriter::runs(&[*note], "<w:rPr><w:i/></w:rPr>"));
            }
            Block::Section(section) => body.section(section),
            Block::Signatures { left, right } => body.signatures(left, right),
        }
    }

    body.finish()
}

/// Zip the package parts into a `.docx` file.
pub fn render(outline: &Outline) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("word/document.xml", document_xml(outline)),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())
            .map_err(ExportError::WritePart)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
