//! Prompt composition — purely structural assembly of message units.

use charla_core::Prompt;

/// Build a prompt from the final user text and an optional system
/// instruction.
///
/// Enrichment happens upstream; by the time text reaches this stage it is
/// exactly what the user unit will carry.
pub fn compose(user_text: &str, system_instruction: Option<&str>) -> Prompt {
    match system_instruction {
        Some(system) => Prompt::with_system(system, user_text),
        None => Prompt::user(user_text),
    }
}
