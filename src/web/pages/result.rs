use super::{escape_html, layout};
use crate::domain::Prediction;
use crate::web::styles::MedicalTheme;

/// Result page for a completed screening.
pub fn render(prediction: &Prediction) -> String {
    let mut body = String::with_capacity(2048);
    let severity = prediction.severity;

    body.push_str("<h1>Screening Result</h1>\n");
    body.push_str("<div class=\"card\">\n");
    body.push_str("<p class=\"muted\">Predicted severity</p>\n");
    body.push_str(&format!(
        "<p class=\"severity\" style=\"color: {}\">{}</p>\n",
        MedicalTheme::severity(severity),
        escape_html(severity.label())
    ));
    body.push_str("</div>\n");

    body.push_str("<div class=\"card\">\n");
    body.push_str("<p class=\"muted\">Recommended diseases to discuss with a clinician</p>\n");
    if prediction.recommended_diseases.is_empty() {
        body.push_str("<p>No associated condition could be identified.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for disease in &prediction.recommended_diseases {
            body.push_str(&format!("<li>{}</li>\n", escape_html(disease)));
        }
        body.push_str("</ul>\n");
    }
    body.push_str(&format!(
        "<p class=\"muted\">Classifier output: {}</p>\n",
        prediction.classifier_code
    ));
    body.push_str("</div>\n");
    body.push_str("<a class=\"button\" href=\"/front-end\">New screening</a>\n");

    layout("Result", &body)
}

/// Result page shown without running any model.
pub fn render_placeholder() -> String {
    let body = "<h1>Screening Result</h1>\n\
<div class=\"card\">\n\
<p>No prediction has been made yet. Submit the symptom form to get a result.</p>\n\
<a class=\"button\" href=\"/front-end\">Go to the form</a>\n\
</div>\n";

    layout("Result", body)
}
