//! Package-wide message deduplication by name.

use crate::descriptor::MessageDescriptor;
use std::collections::HashSet;

/// Collapse `messages` to unique names, keeping the first occurrence of each.
///
/// Identity is the name alone: a later message with the same name is dropped
/// even when its fields differ. Input order is preserved.
pub fn dedupe<I>(messages: I) -> Vec<MessageDescriptor>
where
    I: IntoIterator<Item = MessageDescriptor>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for message in messages {
        if seen.contains(&message.name) {
            tracing::debug!(message = %message.name, "dropping duplicate message");
            continue;
        }
        seen.insert(message.name.clone());
        out.push(message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use proptest::prelude::*;
    use protoform_schema::ProtoType;

    fn message(name: &str, field: &str) -> MessageDescriptor {
        MessageDescriptor::new(name).with_field(FieldDescriptor::scalar(field, 1, ProtoType::String))
    }

    fn messages() -> impl Strategy<Value = Vec<MessageDescriptor>> {
        proptest::collection::vec(("[A-D]", "[a-c]"), 0..12).prop_map(|pairs| {
            pairs
                .iter()
                .map(|(name, field)| message(name, field))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn idempotent(input in messages()) {
            let once = dedupe(input);
            prop_assert_eq!(dedupe(once.clone()), once);
        }

        #[test]
        fn keeps_first_occurrence_in_order(input in messages()) {
            let out = dedupe(input.clone());
            let mut expected: Vec<&MessageDescriptor> = Vec::new();
            for m in &input {
                if !expected.iter().any(|e| e.name == m.name) {
                    expected.push(m);
                }
            }
            prop_assert_eq!(out.iter().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn later_duplicate_is_dropped_even_when_different() {
        let out = dedupe(vec![
            message("UserSummary", "name"),
            message("Pet", "name"),
            message("UserSummary", "email"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].fields[0].name, "name");
        assert_eq!(out[1].name, "Pet");
    }
}
