//! Server-rendered HTML for the five-step workflow page.
//!
//! Every user- or model-supplied string goes through `html_escape` before it is
//! written into the page.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde_json::json;

use crate::extraction::confidence::ConfidenceLevel;
use crate::letters::generator::is_usable_value;
use crate::letters::institutions::{find_profile, institution_names};
use crate::models::certificate::FieldName;
use crate::models::letter::GeneratedLetter;
use crate::workflow::session::{Flash, Review, Session};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #fff; color: #222; }
.main-header { background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
  padding: 2rem; border-radius: 12px; margin: 1rem 1rem 2rem; color: white; }
.main-header h1 { margin: 0; font-size: 2rem; }
.main-header p { margin: 0.5rem 0 0; opacity: 0.8; }
.layout { display: flex; gap: 2rem; padding: 0 1rem 2rem; }
.sidebar { width: 260px; flex-shrink: 0; }
main { flex: 1; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.step-badge { background: #0f3460; color: white; padding: 4px 12px; border-radius: 20px;
  font-size: 0.8rem; font-weight: bold; margin-bottom: 0.5rem; display: inline-block; }
.result-card { background: #f8f9fa; border: 1px solid #e0e0e0; border-left: 4px solid #0f3460;
  border-radius: 8px; padding: 1.2rem; margin-bottom: 1rem; }
.result-card pre { white-space: pre-wrap; margin: 0; font-family: inherit; }
.confidence-high { color: #2e7d32; font-weight: bold; }
.confidence-low { color: #c62828; font-weight: bold; }
.key-field { color: #0f3460; font-size: 0.8rem; }
.field { margin-bottom: 0.8rem; }
.field input, select { width: 100%; padding: 0.4rem; box-sizing: border-box; }
.field input.needs-review { border: 2px solid #c62828; background: #fff8f8; }
button, .button { background: #0f3460; color: white; border: none; border-radius: 8px;
  padding: 0.6rem 2rem; font-weight: bold; width: 100%; cursor: pointer;
  display: block; text-align: center; text-decoration: none; margin-top: 0.5rem; }
button:hover, .button:hover { background: #16213e; }
button.secondary { background: #5c6b89; }
.flash { padding: 0.8rem 1rem; border-radius: 8px; margin-bottom: 1rem; }
.flash-success { background: #e8f5e9; color: #1b5e20; }
.flash-error { background: #ffebee; color: #b71c1c; }
.placeholder { text-align: center; padding: 4rem 1rem; color: #999; }
.placeholder div { font-size: 4rem; }
img.certificate { max-width: 100%; border: 1px solid #e0e0e0; border-radius: 8px; }
"#;

/// Renders the whole page for the session's current state.
///
/// `flash` is passed separately because the caller has already taken it off the session.
pub fn render_page(session: &Session, flash: Option<&Flash>) -> String {
    let mut page = String::with_capacity(8 * 1024);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str("<title>Legacy AI</title>\n<style>");
    page.push_str(STYLES);
    page.push_str("</style>\n</head>\n<body>\n");

    page.push_str(
        "<div class=\"main-header\">\n<h1>🕊️ Legacy AI</h1>\n\
         <p>Handling the paperwork. So you don't have to.</p>\n</div>\n",
    );

    page.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut page);
    page.push_str("<main>\n");

    if let Some(flash) = flash {
        render_flash(&mut page, flash);
    }

    page.push_str("<div class=\"columns\">\n<section>\n");
    render_upload_column(&mut page, session);
    page.push_str("</section>\n<section>\n");
    render_review_column(&mut page, session);
    page.push_str("</section>\n</div>\n");

    if let (Some(review), Some(letter)) = (session.state.review(), session.state.letter()) {
        render_letter_section(&mut page, review, letter);
    }

    page.push_str("</main>\n</div>\n</body>\n</html>\n");
    page
}

fn render_sidebar(page: &mut String) {
    page.push_str(
        "<aside class=\"sidebar\">\n<h3>🕊️ Legacy AI</h3>\n\
         <p>Compassionate administration for life's hardest moment.</p>\n<hr>\n\
         <h3>📋 How it works</h3>\n<ol>\n\
         <li><strong>Upload</strong> a death certificate (image)</li>\n\
         <li><strong>AI vision</strong> extracts all key fields</li>\n\
         <li><strong>Review</strong> and edit the extracted data</li>\n\
         <li><strong>Generate</strong> institution-specific legal letters</li>\n\
         <li><strong>Download</strong> your documents</li>\n</ol>\n<hr>\n\
         <form method=\"post\" action=\"/reset\">\
         <button type=\"submit\" class=\"secondary\">Start over</button></form>\n\
         </aside>\n",
    );
}

fn render_flash(page: &mut String, flash: &Flash) {
    let (class, message) = match flash {
        Flash::Success(msg) => ("flash-success", format!("✅ {msg}")),
        Flash::Error(msg) => ("flash-error", msg.clone()),
    };
    let _ = writeln!(
        page,
        "<div class=\"flash {class}\" role=\"status\">{}</div>",
        text(&message)
    );
}

fn render_upload_column(page: &mut String, session: &Session) {
    page.push_str(
        "<div class=\"step-badge\">STEP 1 — UPLOAD</div>\n<h3>Upload Death Certificate</h3>\n\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\".png,.jpg,.jpeg,image/png,image/jpeg\" required>\n\
         <button type=\"submit\">Upload</button>\n</form>\n",
    );

    let Some(image) = session.state.image() else {
        return;
    };

    let _ = writeln!(
        page,
        "<figure><img class=\"certificate\" src=\"/image\" alt=\"Uploaded certificate\">\
         <figcaption>Uploaded Certificate: {}</figcaption></figure>",
        text(&image.file_name)
    );

    page.push_str(
        "<hr>\n<div class=\"step-badge\">STEP 2 — EXTRACT</div>\n<h3>Extract Certificate Data</h3>\n\
         <form method=\"post\" action=\"/extract\">\
         <button type=\"submit\">🔍 Extract with AI Vision</button></form>\n",
    );
}

fn render_review_column(page: &mut String, session: &Session) {
    page.push_str("<div class=\"step-badge\">STEP 3 — REVIEW</div>\n<h3>Extracted Data</h3>\n");

    let Some(review) = session.state.review() else {
        page.push_str(
            "<div class=\"placeholder\"><div>📋</div>\
             <p>Upload a certificate and run extraction<br>to see results here.</p></div>\n",
        );
        return;
    };

    let record = &review.record;
    let _ = writeln!(
        page,
        "<p><strong>State Format Detected:</strong> <code>{}</code></p>",
        text(&record.state_detected)
    );
    if !record.format_notes.trim().is_empty() {
        let _ = writeln!(
            page,
            "<p><em>Format notes:</em> {}</p>",
            text(&record.format_notes)
        );
    }
    page.push_str("<hr>\n<form method=\"post\" action=\"/generate\">\n");

    let selected = find_profile(&session.institution);
    for field in FieldName::ALL {
        let level = ConfidenceLevel::from_score(record.confidence.get(field));
        let key_marker = match selected {
            Some(profile) if profile.is_key_field(field) => {
                format!(
                    " <span class=\"key-field\">★ needed by {}</span>",
                    text(profile.name)
                )
            }
            _ => String::new(),
        };
        let input_class = if level.needs_review() {
            " class=\"needs-review\""
        } else {
            ""
        };
        let _ = writeln!(
            page,
            "<div class=\"field\"><label for=\"field_{key}\"><strong>{label}</strong> \
             <span class=\"{class}\">{marker}</span>{key_marker}</label>\
             <input type=\"text\" id=\"field_{key}\" name=\"{key}\"{input_class} value=\"{value}\"></div>",
            key = field.key(),
            label = field.review_label(),
            class = level.css_class(),
            marker = level.label(),
            value = attr(review.edited.get(field)),
        );
    }

    let raw = json!({
        "fields": &review.edited,
        "confidence": &record.confidence,
        "state_detected": &record.state_detected,
    });
    let raw = serde_json::to_string_pretty(&raw).unwrap_or_default();
    let _ = writeln!(
        page,
        "<details><summary>📦 View Raw JSON</summary><pre>{}</pre></details>",
        text(&raw)
    );

    page.push_str(
        "<hr>\n<div class=\"step-badge\">STEP 4 — GENERATE</div>\n<h3>Generate Legal Letter</h3>\n\
         <label for=\"institution\"><strong>Institution template</strong></label>\n\
         <select id=\"institution\" name=\"institution\">\n",
    );
    for name in institution_names() {
        let selected = if name == session.institution {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            page,
            "<option value=\"{}\"{selected}>{}</option>",
            attr(name),
            text(name)
        );
    }
    page.push_str(
        "</select>\n\
         <button type=\"submit\" formaction=\"/fields\" class=\"secondary\">💾 Save edits</button>\n\
         <button type=\"submit\">📝 Generate Legal Document</button>\n</form>\n",
    );
}

fn render_letter_section(page: &mut String, review: &Review, letter: &GeneratedLetter) {
    let usable = review
        .edited
        .iter()
        .filter(|(_, value)| is_usable_value(value))
        .count();

    let _ = write!(
        page,
        "<hr>\n<div class=\"step-badge\">STEP 5 — DOWNLOAD</div>\n<h3>Generated Legal Document</h3>\n\
         <div class=\"columns\">\n<div class=\"result-card\"><pre>{content}</pre></div>\n\
         <div>\n<h4>Download Options</h4>\n\
         <a class=\"button\" href=\"/download/letter\" download=\"{file_name}\">⬇️ Download as .txt</a>\n\
         <a class=\"button\" href=\"/download/bundle\" download>⬇️ Download JSON Bundle</a>\n\
         <hr>\n<p><strong>Document Info</strong></p>\n<ul>\n\
         <li>Institution: <code>{institution}</code></li>\n\
         <li>Reference: <code>{reference}</code></li>\n\
         <li>State: <code>{state}</code></li>\n\
         <li>Fields used in letter: <code>{usable}</code></li>\n\
         </ul>\n</div>\n</div>\n",
        content = text(&letter.content),
        file_name = attr(&letter.file_name()),
        institution = text(&letter.institution),
        reference = text(&letter.reference_code),
        state = text(&review.record.state_detected),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::upload::UploadedImage;
    use crate::models::certificate::{CertificateFields, ConfidenceScores, ExtractedRecord};
    use bytes::Bytes;
    use uuid::Uuid;

    fn extracted_session() -> Session {
        let mut fields = CertificateFields::new();
        fields.set(FieldName::DeceasedName, "Jane Doe");
        fields.set(FieldName::Address, "<script>alert(1)</script>");
        let confidence = serde_json::json!({ "deceased_name": 0.95, "address": 0.849 });

        let mut session = Session::new(Uuid::new_v4());
        session.state.upload(UploadedImage {
            file_name: "cert.jpg".to_string(),
            mime_type: "image/jpeg",
            bytes: Bytes::from_static(b"\xFF\xD8\xFF"),
        });
        session
            .state
            .record_extraction(ExtractedRecord {
                state_detected: "Texas".to_string(),
                fields,
                confidence: ConfidenceScores::from_json_map(confidence.as_object().unwrap()),
                format_notes: "Standard layout".to_string(),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_idle_page_shows_upload_and_placeholder() {
        let session = Session::new(Uuid::new_v4());
        let html = render_page(&session, None);

        assert!(html.contains("STEP 1 — UPLOAD"));
        assert!(html.contains("Upload a certificate and run extraction"));
        assert!(!html.contains("STEP 2 — EXTRACT"));
        assert!(!html.contains("STEP 5 — DOWNLOAD"));
    }

    #[test]
    fn test_review_prefills_fields_with_confidence_markers() {
        let session = extracted_session();
        let html = render_page(&session, None);

        assert!(html.contains("STEP 2 — EXTRACT"));
        assert!(html.contains("<code>Texas</code>"));
        assert!(html.contains("name=\"deceased_name\" value=\"Jane Doe\""));
        assert!(html.contains("<span class=\"confidence-high\">✓ High</span>"));
        assert!(html.contains("<span class=\"confidence-low\">⚠ Low (84%)</span>"));
        assert!(html.contains("Standard layout"));
    }

    #[test]
    fn test_low_confidence_inputs_are_marked_for_review() {
        let html = render_page(&extracted_session(), None);

        assert!(html.contains("name=\"address\" class=\"needs-review\" value="));
        assert!(html.contains("name=\"deceased_name\" value=\"Jane Doe\""));
        assert_eq!(html.matches("class=\"needs-review\"").count(), 1);
    }

    #[test]
    fn test_values_are_escaped() {
        let html = render_page(&extracted_session(), None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_selected_institution_and_key_fields() {
        let mut session = extracted_session();
        session.institution = "IRS".to_string();
        let html = render_page(&session, None);

        assert!(html.contains("<option value=\"IRS\" selected>IRS</option>"));
        assert!(html.contains("★ needed by IRS"));
        assert_eq!(html.matches("<option").count(), 7);
    }

    #[test]
    fn test_flash_rendering() {
        let session = Session::new(Uuid::new_v4());
        let html = render_page(
            &session,
            Some(&Flash::Error("Extraction failed: Request timed out".to_string())),
        );
        assert!(html.contains("flash-error"));
        assert!(html.contains("Extraction failed: Request timed out"));
    }

    #[test]
    fn test_letter_section_after_generation() {
        let mut session = extracted_session();
        session
            .state
            .record_letter(GeneratedLetter {
                content: "Dear Sir or Madam,\n\nRe: Jane Doe".to_string(),
                institution: "Medicare/Medicaid".to_string(),
                reference_code: "CMS Death Notification".to_string(),
            })
            .unwrap();
        let html = render_page(&session, None);

        assert!(html.contains("STEP 5 — DOWNLOAD"));
        assert!(html.contains("Re: Jane Doe"));
        assert!(html.contains("download=\"legacy_Medicare_Medicaid.txt\""));
        assert!(html.contains("Fields used in letter: <code>2</code>"));
    }
}
