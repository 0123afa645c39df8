use super::{escape_html, layout};
use crate::domain::FEATURE_NAMES;

/// Symptom input form. Posts every feature to `/predict`.
pub fn render() -> String {
    let mut body = String::with_capacity(8192);

    body.push_str("<h1>Symptoms</h1>\n");
    body.push_str(
        "<p class=\"muted\">Enter a score for each symptom (0 when absent).</p>\n",
    );
    body.push_str("<form class=\"card\" action=\"/predict\" method=\"post\">\n");
    body.push_str("<div class=\"fields\">\n");

    for (idx, name) in FEATURE_NAMES.iter().enumerate() {
        let name = escape_html(name);
        body.push_str("<div class=\"field\">\n");
        body.push_str(&format!("<label for=\"feature-{idx}\">{name}</label>\n"));
        body.push_str(&format!(
            "<input id=\"feature-{idx}\" type=\"number\" name=\"{name}\" value=\"0\" min=\"0\" step=\"any\" required>\n"
        ));
        body.push_str("</div>\n");
    }

    body.push_str("</div>\n");
    body.push_str("<button class=\"button\" type=\"submit\">Predict</button>\n");
    body.push_str("</form>\n");

    layout("Symptoms", &body)
}
