//! Organizer notification email. Labels are Kazakh; catalog values are
//! rendered through the shared label tables.

use chrono::{DateTime, Utc};
use shared::{catalog, domain::RegistrationSubmission};

const ACCENT: &str = "#8B7355";
const CELL: &str = "padding: 8px; border-bottom: 1px solid #eee;";

pub fn subject_line(submission: &RegistrationSubmission) -> String {
    format!("Жаңа тіркелу: {}", submission.full_name)
}

pub fn render_notification(
    submission: &RegistrationSubmission,
    received_at: DateTime<Utc>,
) -> String {
    let personal = table(&[
        ("Аты-жөні:", submission.full_name.as_str()),
        ("Email:", submission.email.as_str()),
        ("Телефон:", submission.phone.as_str()),
        ("Мектеп/Университет:", submission.school.as_str()),
        ("Қала:", submission.city.as_str()),
    ]);
    let mun = table(&[
        ("Тәжірибе:", catalog::experience_label(&submission.experience)),
        ("Комитет:", catalog::committee_label(&submission.committee)),
    ]);

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: {ACCENT}; border-bottom: 2px solid {ACCENT}; padding-bottom: 10px;">OrdaMUN 2025 - Жаңа тіркелу</h1>
  <h2 style="color: #333; margin-top: 20px;">Жеке ақпарат</h2>
{personal}
  <h2 style="color: #333; margin-top: 20px;">MUN ақпараты</h2>
{mun}
  <p style="margin-top: 30px; padding: 15px; background-color: #f5f5f5; border-radius: 8px; color: #666;">Бұл хабарлама OrdaMUN 2025 тіркелу формасынан автоматты түрде жіберілді. ({received})</p>
</div>"#,
        received = received_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn table(rows: &[(&str, &str)]) -> String {
    let mut out =
        String::from("  <table style=\"width: 100%; border-collapse: collapse;\">\n");
    for (label, value) in rows {
        out.push_str(&format!(
            "    <tr><td style=\"{CELL} font-weight: bold;\">{label}</td><td style=\"{CELL}\">{}</td></tr>\n",
            escape_html(value)
        ));
    }
    out.push_str("  </table>");
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tests/template_tests.rs"]
mod tests;
