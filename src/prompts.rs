//! Prompts for the translation service.
//!
//! Centralising the prompt text here serves two purposes:
//!
//! 1. **Single source of truth** — adjusting the translator persona or the
//!    garbled-input instruction requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompts directly without
//!    calling a real completion endpoint.
//!
//! Both prompts take the source language's display name so the same pipeline
//! can be pointed at other scripts by changing
//! [`crate::config::PipelineConfig::source_language`].

/// System instruction fixing the translator persona.
///
/// The quality-flagging clause matters for OCR input: when tesseract
/// mangles a page we want the model to say so, not to hallucinate a fluent
/// translation of noise.
pub fn system_prompt(source_language: &str) -> String {
    format!(
        "You are a translator specializing in {source_language} to English \
         translation. If you receive text that appears to be incorrectly \
         recognized, please indicate that and explain what might be wrong \
         with the input."
    )
}

/// User message wrapping the recognized text.
pub fn user_prompt(source_language: &str, text: &str) -> String {
    format!(
        "Please translate the following text to English. If the text appears \
         to be incorrectly recognized {source_language}, please indicate \
         that:\n\n{text}"
    )
}
