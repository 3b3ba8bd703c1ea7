//! Letter generator: renders the institution prompt from the reviewed fields and asks
//! the model for the letter body.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::letters::institutions::{profile_or_default, InstitutionProfile};
use crate::letters::prompts::{
    LETTER_DATE_FORMAT, LETTER_MAX_TOKENS, LETTER_PROMPT_TEMPLATE, LETTER_TEMPERATURE,
};
use crate::llm_client::{CompletionRequest, CompletionService, LlmError};
use crate::models::certificate::CertificateFields;
use crate::models::letter::GeneratedLetter;

/// Values the extractor writes for fields it could not read. Never sent to the letter prompt.
pub const NOT_FOUND_SENTINELS: &[&str] = &["Not found", "Not visible"];

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Service(#[from] LlmError),
}

impl GenerationError {
    pub fn tag(&self) -> &'static str {
        match self {
            GenerationError::Service(_) => "ServiceError",
        }
    }
}

/// Drafts a letter to `institution`, dated today.
///
/// Unknown institution names fall back to the `Bank/Financial` profile rather than failing.
pub async fn generate_letter(
    llm: &dyn CompletionService,
    fields: &CertificateFields,
    institution: &str,
) -> Result<GeneratedLetter, GenerationError> {
    generate_letter_dated(llm, fields, institution, Local::now().date_naive()).await
}

pub async fn generate_letter_dated(
    llm: &dyn CompletionService,
    fields: &CertificateFields,
    institution: &str,
    today: NaiveDate,
) -> Result<GeneratedLetter, GenerationError> {
    let profile = profile_or_default(institution);
    if profile.name != institution {
        warn!(
            "Unknown institution '{institution}', using the {} profile",
            profile.name
        );
    }

    let prompt = build_letter_prompt(institution, profile, fields, today);
    info!(
        "Generating letter for {institution} (ref: {})",
        profile.reference_code
    );

    let reply = llm
        .complete(CompletionRequest {
            prompt: &prompt,
            image: None,
            max_tokens: LETTER_MAX_TOKENS,
            temperature: LETTER_TEMPERATURE,
        })
        .await
        .map_err(|e| {
            warn!("Letter generation failed: {e}");
            GenerationError::Service(e)
        })?;

    let content = reply.trim().to_string();
    info!("Letter generated: {} words", content.split_whitespace().count());

    Ok(GeneratedLetter {
        content,
        institution: institution.to_string(),
        reference_code: profile.reference_code.to_string(),
    })
}

/// True when a field holds something worth putting in a letter.
pub fn is_usable_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !NOT_FOUND_SENTINELS.contains(&value)
}

/// `- <label>: <value>` lines for every usable field, in display order.
pub fn render_fields_text(fields: &CertificateFields) -> String {
    fields
        .iter()
        .filter(|(_, value)| is_usable_value(value))
        .map(|(field, value)| format!("- {}: {}", field.letter_label(), value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_letter_prompt(
    institution: &str,
    profile: &InstitutionProfile,
    fields: &CertificateFields,
    today: NaiveDate,
) -> String {
    let today = today.format(LETTER_DATE_FORMAT).to_string();
    let fields_text = render_fields_text(fields);

    fill_template(
        LETTER_PROMPT_TEMPLATE,
        &[
            ("institution", institution),
            ("reference_code", profile.reference_code),
            ("mailing_address", profile.mailing_address),
            ("purpose", profile.purpose_statement),
            ("tone", profile.tone),
            ("today", &today),
            ("fields_text", &fields_text),
        ],
    )
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned,
/// so braces inside user-edited fields come through untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
