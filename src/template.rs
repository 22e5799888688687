//! Wrapping a hypertext body into the complete styled document.

use crate::style::StyleTemplate;

/// Tag replaced by the renderer with the number of the page being drawn.
pub const PAGE_NUMBER_TAG: &str = "<pdf:pagenumber>";

/// Id of the element rendered into the footer frame of every page.
pub const FOOTER_ID: &str = "footerContent";

/// Class of the header band element.
pub const HEADER_CLASS: &str = "header-info";

/// Build the full document: embedded style sheet, header band with the
/// project label, title and confidentiality marker, the body, and the footer
/// frame content with its page number placeholder.
///
/// The title is HTML-escaped; the body is inserted verbatim.
pub fn wrap_document(body: &str, title: &str, template: &StyleTemplate) -> String {
    let labels = &template.labels;
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{css}\n</head>\n<body>\n\
         <div class=\"{HEADER_CLASS}\">\n<strong>{project}</strong> | {title} | {confidential}\n</div>\n\
         {body}\n\
         <div id=\"{FOOTER_ID}\" class=\"footer\">\n{footer} - {PAGE_NUMBER_TAG}\n</div>\n\
         </body>\n</html>\n",
        css = template.to_css(),
        project = html_escape::encode_text(&labels.project),
        title = html_escape::encode_text(title),
        confidential = html_escape::encode_text(&labels.confidential),
        footer = html_escape::encode_text(&labels.footer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_contains_all_regions() {
        let template = StyleTemplate::default();
        let html = wrap_document("<p>Body</p>", "notes", &template);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<style>"));
        assert!(html.contains(
            "<div class=\"header-info\">\n<strong>OITH</strong> | notes | Confidential\n</div>"
        ));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains(
            "<div id=\"footerContent\" class=\"footer\">\nOITH Confidential - <pdf:pagenumber>\n</div>"
        ));
    }

    #[test]
    fn test_wrap_escapes_title() {
        let template = StyleTemplate::default();
        let html = wrap_document("", "a<b>&c", &template);
        assert!(html.contains("| a&lt;b&gt;&amp;c |"));
    }

    #[test]
    fn test_body_precedes_footer() {
        let template = StyleTemplate::default();
        let html = wrap_document("<p>Body</p>", "t", &template);
        let body = html.find("<p>Body</p>").unwrap();
        let footer = html.find("footerContent").unwrap();
        assert!(body < footer);
    }
}
