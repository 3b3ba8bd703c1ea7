// Prompt constants for certificate extraction.

/// Instruction sent alongside the certificate image. The reply must be a bare JSON object.
pub const EXTRACTION_PROMPT: &str = r#"You are an expert document parser specialising in US death certificates.
Analyse this death certificate image and extract ALL available fields with high precision.

Return ONLY a valid JSON object with this exact structure:
{
  "state_detected": "<US state name or 'Unknown'>",
  "fields": {
    "deceased_name": "<full legal name>",
    "date_of_birth": "<MM/DD/YYYY or as shown>",
    "date_of_death": "<MM/DD/YYYY or as shown>",
    "ssn": "<XXX-XX-XXXX or 'Not visible'>",
    "address": "<last known address>",
    "cause_of_death": "<immediate cause>",
    "place_of_death": "<hospital/location name>",
    "next_of_kin": "<name of next of kin if present>",
    "certificate_number": "<certificate/document number>"
  },
  "confidence": {
    "deceased_name": <0.0-1.0>,
    "date_of_birth": <0.0-1.0>,
    "date_of_death": <0.0-1.0>,
    "ssn": <0.0-1.0>,
    "address": <0.0-1.0>,
    "cause_of_death": <0.0-1.0>,
    "place_of_death": <0.0-1.0>,
    "next_of_kin": <0.0-1.0>,
    "certificate_number": <0.0-1.0>
  },
  "format_notes": "<any notes about the certificate format or state-specific variations>"
}

Rules:
- Use "Not found" for fields not present or not legible
- Confidence 1.0 = clearly visible and certain, 0.0 = not found
- Confidence below 0.85 means the field needs human review
- Do NOT include any text outside the JSON object
"#;

/// Output budget for the extraction reply.
pub const EXTRACTION_MAX_TOKENS: u32 = 1500;

/// Near-deterministic sampling; the same image should read the same way twice.
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
