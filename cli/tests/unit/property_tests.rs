//! Property-based tests for validation and decoding logic.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use agentctl_cli::domain::config::dedicated_bucket_name;
use agentctl_cli::domain::{Utf8Fragments, is_confirmed, validate_agent_name, validate_bucket_name};

// ============================================================================
// Utf8Fragments property tests
// ============================================================================

proptest! {
    /// Splitting the byte stream anywhere never changes the decoded text.
    #[test]
    fn prop_chunked_decoding_matches_whole(text in "\\PC{0,40}", cuts in proptest::collection::vec(0usize..200, 0..6)) {
        let bytes = text.as_bytes();
        let mut points: Vec<usize> = cuts.into_iter().map(|c| c % (bytes.len() + 1)).collect();
        points.sort_unstable();

        let mut decoder = Utf8Fragments::new();
        let mut out = String::new();
        let mut start = 0;
        for point in points {
            out.push_str(&decoder.push(&bytes[start..point]));
            start = point;
        }
        out.push_str(&decoder.push(&bytes[start..]));
        out.push_str(&decoder.finish());

        prop_assert_eq!(out, text);
    }

    /// Arbitrary bytes decode without panicking and leave nothing pending.
    #[test]
    fn prop_arbitrary_bytes_are_always_decoded(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut decoder = Utf8Fragments::new();
        let _ = decoder.push(&bytes);
        let _ = decoder.finish();
        prop_assert!(decoder.finish().is_empty());
    }
}

// ============================================================================
// Confirmation property tests
// ============================================================================

proptest! {
    /// Any casing of "yes" with surrounding whitespace confirms.
    #[test]
    fn prop_yes_in_any_case_confirms(mask in proptest::collection::vec(any::<bool>(), 3), pad in "[ \\t\\n]{0,3}") {
        let word: String = "yes"
            .chars()
            .zip(mask)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();
        let input = format!("{pad}{word}{pad}");
        prop_assert!(is_confirmed(&input), "rejected {input:?}");
    }

    /// Nothing else confirms.
    #[test]
    fn prop_other_answers_cancel(answer in "[a-zA-Z ]{0,8}") {
        if !answer.trim().eq_ignore_ascii_case("yes") {
            prop_assert!(!is_confirmed(&answer), "accepted {answer:?}");
        }
    }
}

// ============================================================================
// Name validation property tests
// ============================================================================

proptest! {
    /// Dedicated bucket names derived from valid agent names are valid buckets.
    #[test]
    fn prop_dedicated_bucket_names_are_valid(
        name in "[a-z][a-z0-9-]{0,30}[a-z0-9]",
        account in "[0-9]{12}",
    ) {
        prop_assume!(validate_agent_name(&name).is_ok());
        let bucket = dedicated_bucket_name(&name, &account);
        prop_assert!(validate_bucket_name(&bucket).is_ok(), "invalid bucket: {bucket}");
    }

    /// Uppercase letters are never accepted in bucket names.
    #[test]
    fn prop_uppercase_bucket_names_rejected(prefix in "[a-z]{1,10}", upper in "[A-Z]{1,5}") {
        let bucket = format!("{prefix}{upper}");
        prop_assert!(validate_bucket_name(&bucket).is_err(), "accepted {bucket}");
    }

    /// Names outside 3..=63 characters are rejected.
    #[test]
    fn prop_bucket_length_bounds(len in prop_oneof![1usize..3, 64usize..100]) {
        let bucket = "a".repeat(len);
        prop_assert!(validate_bucket_name(&bucket).is_err());
    }
}
