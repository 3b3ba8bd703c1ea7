// Certificate extraction: image in, ExtractedRecord out.
// All model calls go through llm_client, no direct HTTP here.

pub mod confidence;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod upload;
