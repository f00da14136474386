// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file only holds cross-cutting pieces.

/// Appended to system prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Responda APENAS com o JSON, \
    sem texto antes ou depois e sem blocos de código markdown.";
