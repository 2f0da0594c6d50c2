//! Prescription document rendering.
//!
//! Turns a [`ClinicalRecord`] into two outputs:
//! - a printable HTML document ([`RenderedDocument`]) for print/export, and
//! - a condensed plain-text summary for clipboard/share use.
//!
//! Both are pure functions of the record (and, for HTML, the letterhead). Section order is fixed:
//!
//! 1. letterhead
//! 2. patient and prescriber blocks, side by side
//! 3. diagnosis
//! 4. medications, numbered from 1 in input order
//! 5. general instructions
//! 6. follow-up (only when a follow-up date is set)
//! 7. signature block
//!
//! The summary walks the same fields in the same order, without markup.
//!
//! Every record field is HTML-escaped before interpolation.

use crate::config::Letterhead;
use crate::record::{ClinicalRecord, Medication};

/// Print stylesheet embedded in every document.
const PRINT_STYLES: &str = "\
    body { font-family: Arial, sans-serif; margin: 20px; }
    .header { border-bottom: 2px solid #2563eb; padding-bottom: 20px; margin-bottom: 20px; }
    .clinic-info { text-align: center; }
    .clinic-name { font-size: 24px; font-weight: bold; color: #2563eb; }
    .parties { display: flex; justify-content: space-between; margin-bottom: 20px; }
    .patient-info, .doctor-info { display: inline-block; width: 48%; vertical-align: top; }
    .section { margin: 20px 0; }
    .medication { background: #f8fafc; padding: 15px; margin: 10px 0; border-left: 4px solid #2563eb; }
    .footer { margin-top: 40px; text-align: right; }
    .signature { height: 60px; }
    .signed { font-style: italic; color: #2563eb; }
    @media print { body { margin: 0; } }
";

/// A formatted prescription ready for a print or export surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDocument {
    title: String,
    html: String,
}

impl RenderedDocument {
    /// Plain-text document title, e.g. `Prescription - Priya Sharma`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Complete HTML document, starting with `<!DOCTYPE html>`.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl std::fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.html)
    }
}

/// Renders prescription records under a fixed letterhead.
#[derive(Clone, Debug, Default)]
pub struct DocumentRenderer {
    letterhead: Letterhead,
}

impl DocumentRenderer {
    pub fn new(letterhead: Letterhead) -> Self {
        Self { letterhead }
    }

    pub fn letterhead(&self) -> &Letterhead {
        &self.letterhead
    }

    /// Render the printable HTML document for `record`.
    ///
    /// Total over any record: absent optional fields suppress their section rather than failing.
    pub fn generate(&self, record: &ClinicalRecord) -> RenderedDocument {
        let title = format!("Prescription - {}", record.patient.name);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
        html.push_str(&format!("<style>\n{}</style>\n", PRINT_STYLES));
        html.push_str("</head>\n<body>\n");

        self.push_letterhead(&mut html);
        push_parties(&mut html, record);

        push_section(&mut html, "DIAGNOSIS", &paragraph(&record.diagnosis));

        let medications = record
            .medications
            .iter()
            .enumerate()
            .map(|(index, medication)| medication_entry(index + 1, medication))
            .collect::<Vec<_>>()
            .join("");
        push_section(&mut html, "MEDICATIONS", &medications);

        push_section(
            &mut html,
            "GENERAL INSTRUCTIONS",
            &paragraph(&record.general_instructions),
        );

        if let Some(date) = record.follow_up() {
            push_section(
                &mut html,
                "FOLLOW-UP",
                &paragraph(&format!("Next appointment scheduled for: {date}")),
            );
        }

        push_signature(&mut html, record);
        html.push_str("</body>\n</html>\n");

        tracing::debug!(
            record_id = %record.record_id,
            medications = record.medications.len(),
            follow_up = record.follow_up().is_some(),
            "rendered prescription document"
        );

        RenderedDocument { title, html }
    }

    /// Condensed plain-text rendering of `record`. Same as [`summarize`].
    pub fn summarize(&self, record: &ClinicalRecord) -> String {
        summarize(record)
    }

    fn push_letterhead(&self, html: &mut String) {
        let lh = &self.letterhead;
        html.push_str("<div class=\"header\">\n<div class=\"clinic-info\">\n");
        html.push_str(&format!(
            "<div class=\"clinic-name\">{}</div>\n",
            escape_html(lh.clinic_name.as_str())
        ));
        html.push_str(&format!(
            "<p>{}<br>\nPhone: {} | Email: {}</p>\n",
            escape_html(lh.address.as_str()),
            escape_html(lh.phone.as_str()),
            escape_html(lh.email.as_str())
        ));
        html.push_str("</div>\n</div>\n");
    }
}

/// Condensed plain-text rendering of `record` for clipboard or share use.
///
/// Field order matches [`DocumentRenderer::generate`]: patient, issue details, prescriber,
/// diagnosis, medications, instructions, then follow-up when present.
pub fn summarize(record: &ClinicalRecord) -> String {
    let mut text = String::new();

    text.push_str(&format!("Prescription for {}\n", record.patient.name));
    text.push_str(&format!("Date: {}\n", record.issued_date));
    text.push_str(&format!("Prescription ID: {}\n", record.record_id));
    text.push_str(&format!("Doctor: {}\n\n", record.prescriber.name));
    text.push_str(&format!("Diagnosis: {}\n\n", record.diagnosis));

    text.push_str("Medications:\n");
    for (index, med) in record.medications.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} {} - {}, {} for {}\n",
            index + 1,
            med.name,
            med.dosage,
            med.frequency,
            med.timing,
            med.duration
        ));
    }

    text.push_str(&format!("\nInstructions: {}\n", record.general_instructions));
    if let Some(date) = record.follow_up() {
        text.push_str(&format!("Follow-up: {date}\n"));
    }

    text
}

fn push_parties(html: &mut String, record: &ClinicalRecord) {
    let patient = &record.patient;
    let prescriber = &record.prescriber;

    html.push_str("<div class=\"parties\">\n");

    html.push_str("<div class=\"patient-info\">\n<h3>PATIENT INFORMATION</h3>\n");
    html.push_str(&labelled("Name", &patient.name));
    html.push_str(&labelled("ID", &patient.id));
    html.push_str(&labelled("Age", &format!("{} years", patient.age)));
    html.push_str(&labelled("Gender", &patient.gender));
    html.push_str(&labelled("Phone", &patient.phone));
    html.push_str("</div>\n");

    html.push_str("<div class=\"doctor-info\">\n<h3>DOCTOR INFORMATION</h3>\n");
    html.push_str(&labelled("Name", &prescriber.name));
    html.push_str(&labelled("License", &prescriber.license));
    html.push_str(&labelled("Specialty", &prescriber.specialty));
    html.push_str(&labelled("Date", &record.issued_date));
    html.push_str(&labelled("Prescription ID", &record.record_id));
    html.push_str("</div>\n");

    html.push_str("</div>\n");
}

fn push_section(html: &mut String, heading: &str, body: &str) {
    html.push_str(&format!(
        "<div class=\"section\">\n<h3>{}</h3>\n{}</div>\n",
        heading, body
    ));
}

fn push_signature(html: &mut String, record: &ClinicalRecord) {
    html.push_str("<div class=\"footer\">\n");
    html.push_str("<div class=\"signature\">\n<p class=\"signed\">Digitally Signed</p>\n</div>\n");
    html.push_str(&format!(
        "<p><strong>{}</strong></p>\n",
        escape_html(&record.prescriber.name)
    ));
    html.push_str(&paragraph(&record.prescriber.license));
    html.push_str("</div>\n");
}

fn medication_entry(number: usize, med: &Medication) -> String {
    let mut entry = String::from("<div class=\"medication\">\n");
    entry.push_str(&format!(
        "<h4>{}. {} {}</h4>\n",
        number,
        escape_html(&med.name),
        escape_html(&med.dosage)
    ));
    entry.push_str(&labelled(
        "Frequency",
        &format!("{}, {}", med.frequency, med.timing),
    ));
    entry.push_str(&labelled("Duration", &med.duration));
    entry.push_str(&labelled("Instructions", &med.instructions));
    entry.push_str("</div>\n");
    entry
}

fn labelled(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>\n",
        label,
        escape_html(value)
    )
}

fn paragraph(text: &str) -> String {
    format!("<p>{}</p>\n", escape_html(text))
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
