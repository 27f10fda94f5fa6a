//! The deterministic fragment-to-prompt serializer.

use tablemind_core::fragment::{Fragment, FragmentSet};
use tablemind_core::error::ValidationError;

/// The composed outbound prompt: an optional system-role message and the
/// user-role body.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    /// The `system_prompt` fragment, verbatim, when non-blank.
    pub system: Option<String>,
    /// All remaining fragments as labeled sections.
    pub user: String,
}

/// Assemble a fragment set into an outbound prompt.
///
/// Sections follow one fixed canonical order — character_cards,
/// char_status, game_log, module_snippet, items, dm_private, other — with
/// `current_prompt` always last regardless of which fields are present.
///
/// Fails only on a blank `current_prompt`; no other validation is
/// performed here (JSON well-formedness of dual-typed fields was resolved
/// at input time and is not the composer's concern).
///
/// Known, intentionally unaddressed risk: free-text fields may contain the
/// section-delimiter string itself and forge fake section boundaries.
pub fn assemble(fragments: &FragmentSet) -> Result<ComposedPrompt, ValidationError> {
    if !fragments.has_prompt() {
        return Err(ValidationError::EmptyPrompt);
    }

    let mut parts: Vec<String> = Vec::new();

    push_dual(&mut parts, "CHARACTER CARDS", &fragments.character_cards);
    push_dual(&mut parts, "CHARACTER STATUS", &fragments.char_status);
    push_text(&mut parts, "GAME LOG", &fragments.game_log);
    push_text(&mut parts, "MODULE SNIPPET", &fragments.module_snippet);
    push_dual(&mut parts, "ITEMS", &fragments.items);
    push_text(&mut parts, "DM PRIVATE", &fragments.dm_private);
    push_text(&mut parts, "OTHER", &fragments.other);

    // The current prompt closes the body, without a trailing separator.
    parts.push(header("CURRENT PROMPT"));
    parts.push(fragments.current_prompt.clone());

    let system = if fragments.system_prompt.trim().is_empty() {
        None
    } else {
        Some(fragments.system_prompt.clone())
    };

    Ok(ComposedPrompt {
        system,
        user: parts.join("\n"),
    })
}

fn header(name: &str) -> String {
    format!("=== {name} ===")
}

/// Emit one labeled section: header, verbatim content, blank-line
/// separator. Blank fields emit nothing — not even their header.
fn push_text(parts: &mut Vec<String>, name: &str, content: &str) {
    if content.trim().is_empty() {
        return;
    }
    parts.push(header(name));
    parts.push(content.to_string());
    parts.push(String::new());
}

/// Dual-typed fields render pretty-printed when structured, verbatim when
/// text; empty mappings and blank text emit nothing.
fn push_dual(parts: &mut Vec<String>, name: &str, fragment: &Fragment) {
    if fragment.is_empty() {
        return;
    }
    parts.push(header(name));
    parts.push(fragment.render());
    parts.push(String::new());
}
