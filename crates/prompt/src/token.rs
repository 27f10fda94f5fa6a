//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token. This
//! approximation is accurate within ~10% for BPE tokenizers on English
//! text, and it is cheap enough to run on every keystroke.

use tablemind_core::fragment::FragmentSet;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up. Counts characters, not
/// bytes, so multibyte text is not overcounted.
pub fn estimate_text(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.chars().count() + 3) / 4
}

/// Estimate the token count for a whole fragment set.
///
/// Every field is flattened to its textual form (structured fragments
/// render to JSON text) and joined by single spaces before counting.
/// Deterministic, and monotone: appending to any field never decreases
/// the estimate.
pub fn estimate(fragments: &FragmentSet) -> usize {
    let flattened = [
        fragments.current_prompt.clone(),
        fragments.game_log.clone(),
        fragments.module_snippet.clone(),
        fragments.dm_private.clone(),
        fragments.char_status.render(),
        fragments.system_prompt.clone(),
        fragments.character_cards.render(),
        fragments.items.render(),
        fragments.other.clone(),
    ]
    .join(" ");

    estimate_text(&flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablemind_core::fragment::Fragment;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(estimate_text(""), 0);
    }

    #[test]
    fn four_chars_is_one_token() {
        assert_eq!(estimate_text("test"), 1);
    }

    #[test]
    fn five_chars_rounds_up() {
        assert_eq!(estimate_text("hello"), 2);
    }

    #[test]
    fn multibyte_text_counts_characters_not_bytes() {
        // Four CJK characters are twelve UTF-8 bytes but one token.
        assert_eq!(estimate_text("魔法使い"), 1);
        assert_eq!(estimate_text("地下城主记录"), 2);
    }

    #[test]
    fn joining_counts_the_separator_spaces() {
        // Nine empty fields flatten to eight joining spaces.
        assert_eq!(estimate(&FragmentSet::default()), 2);
    }

    #[test]
    fn structured_fields_count_their_rendered_form() {
        let mut set = FragmentSet::default();
        set.items = Fragment::from_input(r#"{"rope": 1}"#);

        let rendered_len = set.items.render().chars().count();
        // 8 joining spaces + the rendered JSON
        assert_eq!(estimate(&set), (rendered_len + 8 + 3) / 4);
    }

    #[test]
    fn estimate_is_deterministic() {
        let mut set = FragmentSet::default();
        set.current_prompt = "What lies beyond the door?".into();
        set.game_log = "The rogue picks the lock.".into();
        assert_eq!(estimate(&set), estimate(&set));
    }

    #[test]
    fn prefix_extension_never_decreases_the_estimate() {
        let mut base = FragmentSet::default();
        base.current_prompt = "Describe".into();
        base.game_log = "Round 1".into();

        let mut extended = base.clone();
        extended.current_prompt.push_str(" the battlefield in detail");
        assert!(estimate(&base) <= estimate(&extended));

        extended.game_log.push_str("; Round 2: the ogre swings");
        assert!(estimate(&base) <= estimate(&extended));
    }
}
