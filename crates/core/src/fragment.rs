//! FragmentSet and Fragment domain types.
//!
//! A FragmentSet is the nine named content pieces a facilitator edits to
//! build context for one exchange: the required `current_prompt` plus eight
//! optional fragments. Three of them (`char_status`, `character_cards`,
//! `items`) are dual-typed: either free text or a structured JSON mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fragment that is either free text or a structured mapping.
///
/// The duality is resolved once, at input time, via [`Fragment::from_input`].
/// Serialized untagged so the wire shape is a plain JSON string or object,
/// matching persisted snapshots from earlier versions of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// A structured JSON object (character sheets, status tables, inventories).
    Structured(Map<String, Value>),
    /// Free text, including text that merely looks like JSON but isn't.
    Text(String),
}

impl Fragment {
    /// Resolve raw editor input into a fragment.
    ///
    /// Input that parses as a JSON object becomes [`Fragment::Structured`];
    /// anything else (including malformed JSON) stays [`Fragment::Text`]
    /// and renders verbatim.
    pub fn from_input(input: &str) -> Self {
        match serde_json::from_str::<Map<String, Value>>(input) {
            Ok(map) => Self::Structured(map),
            Err(_) => Self::Text(input.to_string()),
        }
    }

    /// Whether this fragment contributes nothing to a composed prompt:
    /// blank text or an empty mapping.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Structured(map) => map.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Render to the textual form used in prompts and token estimates.
    ///
    /// Text renders verbatim; structured mappings pretty-print.
    pub fn render(&self) -> String {
        match self {
            Self::Structured(map) => {
                serde_json::to_string_pretty(map).unwrap_or_default()
            }
            Self::Text(text) => text.clone(),
        }
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::Structured(Map::new())
    }
}

/// The nine content fragments making up one draft.
///
/// Continuously mutated by the editor; has no identity beyond "the current
/// draft". Every field defaults so partial or older snapshots still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentSet {
    /// The question to put to the model. Required: must be non-blank to
    /// compose a valid outbound message.
    #[serde(default)]
    pub current_prompt: String,

    /// What has already happened at the table.
    #[serde(default)]
    pub game_log: String,

    /// Relevant published-module background, plot, NPC notes.
    #[serde(default)]
    pub module_snippet: String,

    /// Facilitator-only secrets the players must not see.
    #[serde(default)]
    pub dm_private: String,

    /// Current HP, conditions, positions per character.
    #[serde(default)]
    pub char_status: Fragment,

    /// Behavioral instructions for the model.
    #[serde(default)]
    pub system_prompt: String,

    /// Full PC/NPC character sheets.
    #[serde(default)]
    pub character_cards: Fragment,

    /// Held items, equipment, magic items.
    #[serde(default)]
    pub items: Fragment,

    /// Miscellaneous notes.
    #[serde(default)]
    pub other: String,
}

impl FragmentSet {
    /// Whether the required field is filled in.
    pub fn has_prompt(&self) -> bool {
        !self.current_prompt.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_resolves_json_object() {
        let frag = Fragment::from_input(r#"{"Sira": {"hp": 22}}"#);
        match frag {
            Fragment::Structured(map) => assert!(map.contains_key("Sira")),
            Fragment::Text(_) => panic!("expected structured fragment"),
        }
    }

    #[test]
    fn from_input_keeps_malformed_json_as_text() {
        let frag = Fragment::from_input(r#"{"Sira": {"hp": 22}"#); // missing brace
        assert_eq!(frag, Fragment::Text(r#"{"Sira": {"hp": 22}"#.into()));
    }

    #[test]
    fn from_input_keeps_json_array_as_text() {
        // Only objects count as structured; arrays stay text.
        let frag = Fragment::from_input("[1, 2, 3]");
        assert!(matches!(frag, Fragment::Text(_)));
    }

    #[test]
    fn empty_checks() {
        assert!(Fragment::default().is_empty());
        assert!(Fragment::Text("   ".into()).is_empty());
        assert!(!Fragment::Text("a sword".into()).is_empty());
        assert!(!Fragment::from_input(r#"{"gold": 10}"#).is_empty());
    }

    #[test]
    fn untagged_wire_shape() {
        let text = Fragment::Text("plain".into());
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"plain\"");

        let structured = Fragment::from_input(r#"{"hp": 5}"#);
        assert_eq!(serde_json::to_string(&structured).unwrap(), r#"{"hp":5}"#);

        // Round-trips preserve the variant
        let back: Fragment = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(back, text);
        let back: Fragment = serde_json::from_str(r#"{"hp":5}"#).unwrap();
        assert_eq!(back, structured);
    }

    #[test]
    fn default_set_is_all_empty() {
        let set = FragmentSet::default();
        assert_eq!(set.current_prompt, "");
        assert_eq!(set.game_log, "");
        assert_eq!(set.char_status, Fragment::Structured(Map::new()));
        assert!(!set.has_prompt());
    }

    #[test]
    fn partial_snapshot_still_parses() {
        // Older or truncated snapshots carry only some fields.
        let set: FragmentSet =
            serde_json::from_str(r#"{"current_prompt": "What now?"}"#).unwrap();
        assert_eq!(set.current_prompt, "What now?");
        assert!(set.items.is_empty());
    }

    #[test]
    fn dual_fields_accept_both_shapes() {
        let set: FragmentSet = serde_json::from_str(
            r#"{"current_prompt": "x", "items": "a rope, 3 torches", "char_status": {"Sira": "ok"}}"#,
        )
        .unwrap();
        assert!(matches!(set.items, Fragment::Text(_)));
        assert!(matches!(set.char_status, Fragment::Structured(_)));
    }
}
