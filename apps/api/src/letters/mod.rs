// Letter generation: edited fields + institution profile in, letter text out.
// All model calls go through llm_client, no direct HTTP here.

pub mod generator;
pub mod handlers;
pub mod institutions;
pub mod prompts;
