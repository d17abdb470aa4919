//! Standalone HTML export.

use super::common::escape_html;
use super::outline::{Outline, TITLE};
use super::preview::{render_fragment, PreviewMode};
use super::ThemeColor;

const PAGE_STYLE: &str = r#"
      body { background-color: #f1f5f9; font-family: 'Times New Roman', Times, serif; color: #000; margin: 0; }
      .page-container { margin: 1cm; }
      .page { max-width: 56rem; margin: 0 auto; background: #fff; box-shadow: 0 10px 15px rgba(0,0,0,.1); border-radius: .5rem; overflow: hidden; }
      .rpp-header { padding: 2rem; text-align: center; color: #fff; }
      .rpp-header h2 { margin: 0; font-size: 1.5rem; }
      .rpp-header p { margin: .25rem 0 0; font-size: .875rem; opacity: .9; }
      .rpp-body { padding: 2rem; }
      .rpp-chapter { font-size: 1.125rem; padding: .5rem; margin: 1.5rem 0 0; background: #f3f4f6; border-radius: .375rem; }
      .rpp-identity { width: 100%; border-collapse: collapse; margin-top: .75rem; font-size: .875rem; }
      .rpp-identity td { border: 1px solid #d1d5db; padding: .5rem; }
      .rpp-identity .rpp-label { width: 25%; font-weight: 600; background: #fafafa; }
      .rpp-note { font-size: .875rem; font-style: italic; margin-top: .5rem; }
      .rpp-section h4 { margin: 1rem 0 .25rem; }
      .rpp-content { font-size: .875rem; line-height: 1.6; text-align: justify; }
      .rpp-content p { margin: 0; }
      .rpp-item { padding-left: 1.5rem; text-indent: -1.5rem; }
      .rpp-signatures { width: 100%; margin-top: 4rem; font-size: .875rem; text-align: center; }
      .rpp-signature { width: 50%; vertical-align: top; }
      .rpp-signature p { margin: 0; }
      .rpp-signature-space { height: 5rem; }
      .rpp-signature-name { font-weight: bold; text-decoration: underline; }
      @media print {
        body { background-color: #fff; }
        .page-container { margin: 0; }
        .page { box-shadow: none; border-radius: 0; }
        @page { size: A4; margin: 1cm; }
      }
"#;

/// Complete HTML document wrapping the static preview.
pub fn render_page(outline: &Outline, theme: &ThemeColor) -> String {
    let body = render_fragment(outline, theme, PreviewMode::Static);
    format!(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
<title>{title}</title>\n    <style>{style}      .rpp-header {{ background-color: {color}; \
-webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n    </style>\n</head>\n<body>\n\
<div class=\"page-container\">\n<div class=\"page\">\n{body}</div>\n</div>\n</body>\n</html>\n",
        title = escape_html(&title_case(TITLE)),
        style = PAGE_STYLE,
        color = theme.hex(),
        body = body,
    )
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
