// src/prompt/builder.rs

use crate::persona::Persona;

/// Joins the persona instructions and the user's question
pub const QUESTION_SEPARATOR: &str = "\n\nKysymys: ";

/// Builds the single-turn prompt: persona instructions, separator, user message.
///
/// The message is passed through verbatim; validation happens before this.
pub fn compose_prompt(persona: Persona, message: &str) -> String {
    let instructions = persona.prompt();
    let mut prompt =
        String::with_capacity(instructions.len() + QUESTION_SEPARATOR.len() + message.len());

    prompt.push_str(instructions);
    prompt.push_str(QUESTION_SEPARATOR);
    prompt.push_str(message);
    prompt
}
