// Personalization: rewrites selected page texts for a target account.
// All model calls go through llm_client; no direct API calls here.

pub mod handlers;
pub mod parser;
pub mod personalizer;
pub mod prompts;
