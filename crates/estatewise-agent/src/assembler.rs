// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merges the caller's context with retrieved property text.

/// Opens the property block. Preceded by a blank line.
pub const PROPERTY_DATA_START: &str = "--- PROPERTY DATA START ---";
/// Closes the property block.
pub const PROPERTY_DATA_END: &str = "--- PROPERTY DATA END ---";

/// Builds the merged context handed to the expert pipeline.
///
/// Without retrieval the user context comes back byte-for-byte. With
/// retrieval the property text is appended inside a delimited block:
///
/// ```text
/// {user_context}\n\n--- PROPERTY DATA START ---\n{text}\n--- PROPERTY DATA END ---\n
/// ```
///
/// A missing `property_text` is treated as empty. Nothing is trimmed.
pub fn assemble_context(
    user_context: &str,
    use_property_data: bool,
    property_text: Option<&str>,
) -> String {
    if !use_property_data {
        return user_context.to_string();
    }

    let text = property_text.unwrap_or_default();
    let mut merged = String::with_capacity(
        user_context.len() + text.len() + PROPERTY_DATA_START.len() + PROPERTY_DATA_END.len() + 5,
    );
    merged.push_str(user_context);
    merged.push_str("\n\n");
    merged.push_str(PROPERTY_DATA_START);
    merged.push('\n');
    merged.push_str(text);
    merged.push('\n');
    merged.push_str(PROPERTY_DATA_END);
    merged.push('\n');
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scenario_with_property_data() {
        let merged = assemble_context(
            "User prefers Raleigh.",
            true,
            Some("Listing1...Listing2..."),
        );
        assert_eq!(
            merged,
            "User prefers Raleigh.\n\n--- PROPERTY DATA START ---\nListing1...Listing2...\n--- PROPERTY DATA END ---\n"
        );
    }

    #[test]
    fn empty_inputs_still_produce_the_block() {
        assert_eq!(
            assemble_context("", true, None),
            "\n\n--- PROPERTY DATA START ---\n\n--- PROPERTY DATA END ---\n"
        );
        assert_eq!(
            assemble_context("", true, Some("")),
            assemble_context("", true, None)
        );
    }

    #[test]
    fn without_property_data_text_is_ignored() {
        assert_eq!(assemble_context("ctx", false, Some("ignored")), "ctx");
        assert_eq!(assemble_context("", false, None), "");
    }

    proptest! {
        #[test]
        fn no_retrieval_is_identity(ctx in "(?s).*", text in proptest::option::of("(?s).*")) {
            prop_assert_eq!(assemble_context(&ctx, false, text.as_deref()), ctx);
        }

        #[test]
        fn retrieval_wraps_text_verbatim(ctx in "(?s).*", text in "(?s).*") {
            let merged = assemble_context(&ctx, true, Some(&text));
            prop_assert!(merged.starts_with(&ctx));
            let block = format!("\n\n{PROPERTY_DATA_START}\n{text}\n{PROPERTY_DATA_END}\n");
            prop_assert_eq!(&merged[ctx.len()..], block.as_str());
        }
    }
}
