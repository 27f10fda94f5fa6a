//! Thread hydration — persisted exchange records to an ordered message
//! thread.
//!
//! Pure, no I/O. The paginated store hands back records most-recent-first;
//! hydration re-sorts ascending and expands each record into its user
//! message (and assistant message, when a response exists).
//!
//! # Fault isolation
//!
//! One corrupt record must never abort the batch: an unreadable fragment
//! snapshot is replaced by a placeholder for that single record and
//! hydration continues.

use tablemind_core::fragment::FragmentSet;
use tablemind_core::message::Message;
use tablemind_core::record::ExchangeRecord;
use tracing::warn;

/// Stands in for the prompt of a record whose snapshot could not be decoded.
pub const UNREADABLE_RECORD_MARKER: &str = "[unreadable exchange record]";

/// Shown when a snapshot decoded fine but recorded no prompt text.
pub const EMPTY_PROMPT_PLACEHOLDER: &str = "(no prompt recorded)";

/// Rebuild the chronological message thread from persisted records.
///
/// Records are stable-sorted by timestamp ascending, so a user message
/// always precedes its paired assistant message, and same-timestamp
/// records keep their input order. Message ids derive from
/// `(timestamp, role)` and are stable across hydrations.
pub fn hydrate(records: &[ExchangeRecord]) -> Vec<Message> {
    let mut ordered: Vec<&ExchangeRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let mut messages = Vec::with_capacity(ordered.len() * 2);
    for record in ordered {
        let snapshot = match record.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    timestamp = record.timestamp,
                    error = %e,
                    "Substituting placeholder for unreadable fragment snapshot"
                );
                FragmentSet {
                    current_prompt: UNREADABLE_RECORD_MARKER.into(),
                    ..FragmentSet::default()
                }
            }
        };

        let content = if snapshot.current_prompt.trim().is_empty() {
            EMPTY_PROMPT_PLACEHOLDER.to_string()
        } else {
            snapshot.current_prompt.clone()
        };
        messages.push(Message::user(record.timestamp, content, snapshot));

        if let Some(response) = &record.response {
            messages.push(Message::assistant(record.timestamp, response.clone()));
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablemind_core::message::Role;

    fn record(timestamp: i64, prompt: &str, response: Option<&str>) -> ExchangeRecord {
        let set = FragmentSet {
            current_prompt: prompt.into(),
            ..FragmentSet::default()
        };
        ExchangeRecord::new(timestamp, &set, response.map(String::from)).unwrap()
    }

    #[test]
    fn sorts_ascending_and_pairs_user_before_assistant() {
        // Store order is most-recent-first; hydration must not care.
        let records = vec![record(100, "a", Some("r1")), record(50, "b", None)];

        let messages = hydrate(&records);
        assert_eq!(messages.len(), 3);

        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "b");
        assert_eq!(messages[0].timestamp, 50);

        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "a");
        assert_eq!(messages[1].timestamp, 100);

        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "r1");
        assert_eq!(messages[2].timestamp, 100);
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = vec![record(50, "b", None), record(100, "a", Some("r1"))];
        let backward = vec![record(100, "a", Some("r1")), record(50, "b", None)];
        assert_eq!(hydrate(&forward), hydrate(&backward));
    }

    #[test]
    fn ids_derive_from_timestamp_and_role() {
        let messages = hydrate(&[record(100, "a", Some("r1"))]);
        assert_eq!(messages[0].id, "100_user");
        assert_eq!(messages[1].id, "100_assistant");
    }

    #[test]
    fn user_message_carries_the_full_snapshot() {
        let mut set = FragmentSet {
            current_prompt: "What's in the chest?".into(),
            ..FragmentSet::default()
        };
        set.dm_private = "A mimic.".into();
        let rec = ExchangeRecord::new(10, &set, Some("You open it...".into())).unwrap();

        let messages = hydrate(&[rec]);
        assert_eq!(messages[0].fragments.as_ref().unwrap().dm_private, "A mimic.");
        assert!(messages[1].fragments.is_none());
    }

    #[test]
    fn corrupt_snapshot_is_isolated_to_its_record() {
        let corrupt = ExchangeRecord {
            timestamp: 75,
            fragments: "{{{ definitely not json".into(),
            response: Some("still shown".into()),
            created_at: None,
        };
        let records = vec![record(100, "fine", Some("ok")), corrupt, record(50, "early", None)];

        let messages = hydrate(&records);
        // 2 + 2 + 1 messages; nothing aborted.
        assert_eq!(messages.len(), 5);

        let placeholder = &messages[1]; // ts=75 user
        assert_eq!(placeholder.content, UNREADABLE_RECORD_MARKER);
        assert_eq!(
            placeholder.fragments.as_ref().unwrap().current_prompt,
            UNREADABLE_RECORD_MARKER
        );
        // The corrupt record's response still hydrates.
        assert_eq!(messages[2].content, "still shown");
        // Neighbors are untouched.
        assert_eq!(messages[0].content, "early");
        assert_eq!(messages[3].content, "fine");
    }

    #[test]
    fn blank_recorded_prompt_gets_the_placeholder() {
        let messages = hydrate(&[record(10, "  ", Some("reply"))]);
        assert_eq!(messages[0].content, EMPTY_PROMPT_PLACEHOLDER);
    }

    #[test]
    fn no_response_means_no_assistant_message() {
        let messages = hydrate(&[record(10, "pending", None)]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn same_timestamp_records_keep_input_order() {
        let records = vec![record(100, "first", Some("r1")), record(100, "second", None)];
        let messages = hydrate(&records);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[2].content, "second");
    }

    #[test]
    fn empty_input_hydrates_to_empty_thread() {
        assert!(hydrate(&[]).is_empty());
    }
}
