//! Confirmation email composition.

use std::collections::BTreeMap;

use crate::model::{Answer, FormItem};

/// Pairs each form item with the submitter's answer. Items without an entry
/// in `responses` are section headers and render bold.
pub fn construct_email_body(items: &[FormItem], responses: &BTreeMap<String, Answer>) -> String {
    let mut body = String::new();
    for item in items {
        let question = escape_html(&item.title);
        match responses.get(&item.title) {
            Some(answer) => {
                body.push_str(&question);
                body.push_str(": ");
                body.push_str(&escape_html(&answer.to_string()));
                body.push_str("<br>");
            }
            None => {
                body.push_str("<b>");
                body.push_str(&question);
                body.push_str("</b><br>");
            }
        }
    }
    body
}

pub fn success_message(sheet_url: &str) -> String {
    format!(
        "Thank you for submitting program data. You can edit your responses by visiting your local programs sheet: {}. Your responses are shown below.",
        escape_html(sheet_url)
    )
}

pub fn failure_message(member_id: &str) -> String {
    format!(
        "Goodwill organization '{}' has not been set up to enable programs data submission. Your responses are shown below.",
        escape_html(member_id)
    )
}

/// Joins an intro paragraph and the rendered answers.
pub fn compose_html(intro: &str, body: &str) -> String {
    format!("{intro}<br><br>{body}")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
