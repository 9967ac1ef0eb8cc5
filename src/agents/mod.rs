//! The three analysis agents
//!
//! Each agent is a free function: gather search snippets, build one prompt
//! embedding the submission and the snippets, make one language model call,
//! and parse the reply into a typed result. An unparseable reply becomes the
//! agent's documented fallback — a bad reply from one agent must never block
//! the pipeline. A failed model call, by contrast, propagates to the
//! coordinator and aborts the run.

pub mod business_verifier;
pub mod financial_analyst;
pub mod risk_assessor;

use crate::search::SearchHit;

/// Display names used in progress events and logs, in declared agent order.
pub const BUSINESS_VERIFIER: &str = "Business Verifier";
pub const FINANCIAL_ANALYST: &str = "Financial Analyst";
pub const RISK_ASSESSOR: &str = "Risk Assessor";

/// Render search hits as a numbered block for prompt embedding.
pub(crate) fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{}. {}\n   URL: {}\n   Content: {}",
                i + 1,
                hit.title,
                hit.url,
                if hit.snippet.is_empty() {
                    "No content"
                } else {
                    hit.snippet.as_str()
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a dollar amount with thousands separators, e.g. `$50,000`.
pub(crate) fn format_money(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Render a bullet list, or a placeholder line when empty.
pub(crate) fn format_bullets(items: &[String], empty_note: &str) -> String {
    if items.is_empty() {
        format!("- {}", empty_note)
    } else {
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
