// Prompt constants for letter generation.

/// Letter prompt template.
/// Replace: {institution}, {reference_code}, {mailing_address}, {purpose}, {tone},
///          {today}, {fields_text}
pub const LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional legal document writer specialising in estate administration correspondence.

Generate a complete, professional legal letter for the following:

Institution: {institution}
Reference: {reference_code}
Mailing Address:
{mailing_address}
Purpose: {purpose}
Tone: {tone}
Today's Date: {today}

Deceased Person's Information:
{fields_text}

Requirements:
- Write a complete, ready-to-send formal letter
- Include proper salutation, body paragraphs, and closing
- Do NOT make it look AI-generated — use natural, human legal writing style
- Include reference to the enclosed certified copy of the death certificate
- Request specific next steps from the institution
- Keep to 300-400 words
- Format with proper letter structure (date, address block, re: line, body, closing)
- Do not include placeholder brackets except for [Your Name], [Your Signature], [Account Number if known]

Return ONLY the letter text, no explanations."#;

/// Room for a 300–400 word letter plus letterhead.
pub const LETTER_MAX_TOKENS: u32 = 1000;

pub const LETTER_TEMPERATURE: f32 = 0.4;

/// Date format used in the prompt, e.g. "October 19, 2026".
pub const LETTER_DATE_FORMAT: &str = "%B %d, %Y";
