//! Text normalization for AI-authored section content.
//!
//! Raw model output goes through [`sanitize`] once before it is stored.
//! Every renderer then calls [`parse_section`] on the stored string, so the
//! decision "list or paragraph" is made in exactly one place.

pub mod list_parser;
pub mod sanitizer;

pub use list_parser::{parse, parse_section, ListItem, ParsedSection};
pub use sanitizer::sanitize;
