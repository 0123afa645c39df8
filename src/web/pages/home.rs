use super::layout;

/// Landing page.
pub fn render() -> String {
    let body = "<h1>Endometriosis Symptom Screening</h1>\n\
<div class=\"card\">\n\
<p>Rate how strongly you experience each of 22 common symptoms. The screening \
models estimate whether endometriosis is likely and, if so, its severity and \
the conditions most often seen alongside it.</p>\n\
<p class=\"muted\">Nothing you enter is stored.</p>\n\
<a class=\"button\" href=\"/front-end\">Start screening</a>\n\
</div>\n";

    layout("Home", body)
}
