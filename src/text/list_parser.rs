//! Numbered-list detection over stored section text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

lazy_static! {
    static ref ORDINAL_LINE: Regex = Regex::new(r"^([0-9]+)\.\s*(.*)").unwrap();
}

/// Ordinal of the placeholder item opened for leading non-list text.
pub const SENTINEL_ORDINAL: u64 = 0;

/// One numbered entry. `text` may span several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ListItem {
    pub ordinal: u64,
    pub text: String,
}

impl ListItem {
    pub fn new(ordinal: u64, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// True for the placeholder holding text that preceded the first marker.
    pub fn is_sentinel(&self) -> bool {
        self.ordinal == SENTINEL_ORDINAL
    }
}

/// The shape every renderer branches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "content", rename_all = "camelCase")]
pub enum ParsedSection {
    Paragraph(String),
    List(Vec<ListItem>),
}

impl ParsedSection {
    pub fn items(&self) -> &[ListItem] {
        match self {
            ParsedSection::List(items) => items,
            ParsedSection::Paragraph(_) => &[],
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ParsedSection::List(_))
    }
}

/// Split text into numbered items.
///
/// Returns an empty vector for `None`, blank text, and text with no
/// numbered marker at all. Ordinals are copied from the source, never
/// renumbered.
pub fn parse(text: Option<&str>) -> Vec<ListItem> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Vec::new(),
    };

    let mut items = Vec::new();
    let mut current: Option<ListItem> = None;

    for line in text.split('\n') {
        if let Some((ordinal, rest)) = match_ordinal(line) {
            if let Some(done) = current.take() {
                items.push(done);
            }
            current = Some(ListItem::new(ordinal, rest.trim()));
        } else if let Some(open) = current.as_mut() {
            open.text.push('\n');
            open.text.push_str(line.trim());
        } else {
            current = Some(ListItem::new(SENTINEL_ORDINAL, line.trim()));
        }
    }

    if let Some(done) = current {
        items.push(done);
    }

    if items.len() == 1 && items[0].is_sentinel() {
        return Vec::new();
    }

    items
}

/// Parse and classify: two or more items make a list, anything else is a
/// paragraph holding the raw text.
pub fn parse_section(text: &str) -> ParsedSection {
    let items = parse(Some(text));
    if items.len() >= 2 {
        ParsedSection::List(items)
    } else {
        ParsedSection::Paragraph(text.to_string())
    }
}

fn match_ordinal(line: &str) -> Option<(u64, &str)> {
    let caps = ORDINAL_LINE.captures(line)?;
    // Digit runs too long for u64 are treated as ordinary text.
    let ordinal = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((ordinal, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_input_is_empty() {
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());
        assert!(parse(Some(" \n\t ")).is_empty());
    }

    #[test]
    fn single_sentence_is_not_a_list() {
        assert!(parse(Some("Just one sentence.")).is_empty());
        assert!(parse(Some("Baris satu\nbaris dua")).is_empty());
    }

    #[test]
    fn numbered_lines_become_items() {
        assert_eq!(
            parse(Some("1. First item.\n2. Second item.")),
            vec![
                ListItem::new(1, "First item."),
                ListItem::new(2, "Second item.")
            ]
        );
    }

    #[test]
    fn continuation_lines_attach_to_open_item() {
        assert_eq!(
            parse(Some("1. First line.\ncontinued text\n2. Second item.")),
            vec![
                ListItem::new(1, "First line.\ncontinued text"),
                ListItem::new(2, "Second item.")
            ]
        );
    }

    #[test]
    fn ordinals_are_not_renumbered() {
        assert_eq!(
            parse(Some("1. A\n3. B")),
            vec![ListItem::new(1, "A"), ListItem::new(3, "B")]
        );
    }

    #[test]
    fn leading_text_is_kept_as_sentinel() {
        let items = parse(Some("Pengantar\n1. A\n2. B"));
        assert_eq!(items.len(), 3);
        assert!(items[0].is_sentinel());
        assert_eq!(items[0].text, "Pengantar");
    }

    #[test]
    fn marker_without_space_still_counts() {
        assert_eq!(
            parse(Some("1.A\n2.B")),
            vec![ListItem::new(1, "A"), ListItem::new(2, "B")]
        );
    }

    #[test]
    fn indented_marker_is_a_continuation() {
        assert_eq!(
            parse(Some("1. A\n  2. B")),
            vec![ListItem::new(1, "A\n2. B")]
        );
    }

    #[test]
    fn oversized_ordinal_is_text() {
        let items = parse(Some("1. A\n99999999999999999999999. B"));
        assert_eq!(items, vec![ListItem::new(1, "A\n99999999999999999999999. B")]);
    }

    #[test]
    fn single_numbered_item_is_a_paragraph() {
        let section = parse_section("1. Hanya satu");
        assert_eq!(section, ParsedSection::Paragraph("1. Hanya satu".to_string()));
    }

    #[test]
    fn two_items_make_a_list() {
        let section = parse_section("1. A\n2. B");
        assert!(section.is_list());
        assert_eq!(section.items().len(), 2);
    }
}
