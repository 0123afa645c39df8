//! Page renderers: self-contained HTML with inline CSS, no external assets.

pub mod form;
pub mod home;
pub mod result;

use crate::web::styles::MedicalTheme;

const DISCLAIMER: &str = "This tool provides indicative estimates and does not replace \
professional medical evaluation.";

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap a page body in the shared document shell.
pub(crate) fn layout(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(4096 + body.len());

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{} | Endoscreen</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(&MedicalTheme::stylesheet());
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str("<header><a href=\"/\">Endoscreen</a></header>\n<main>\n");
    html.push_str(body);
    html.push_str(&format!("<p class=\"disclaimer\">{DISCLAIMER}</p>\n"));
    html.push_str("</main>\n</body>\n</html>\n");

    html
}
