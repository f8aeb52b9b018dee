// All LLM prompt constants for the Personalization module.

/// System prompt for personalization.
pub const PERSONALIZE_SYSTEM: &str =
    "You are a helpful marketing expert specializing in content personalization. \
    Return only the personalized text.";

/// Personalization prompt template.
/// Replace: {client}, {numbered_texts}
pub const PERSONALIZE_PROMPT_TEMPLATE: &str = r#"You are a marketing expert specializing in personalized content creation.

Client: {client}

Personalize the following texts to make them more appealing and relevant to {client}:

{numbered_texts}

Return ONLY a JSON array with one object per input text, in input order:
[
  {"index": 1, "text": "personalized version of Text 1"}
]

Do NOT use markdown code fences. Do NOT include explanations.
If you cannot produce JSON, instead return one line per input in the form
`Text N: <personalized text>` and nothing else."#;
