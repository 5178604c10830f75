//! Property tests for the virtual directory listing and member selection.

use std::collections::HashSet;

use proptest::prelude::*;

use media_resolver::{list_children, navigate, select_member, ListingEntry};

fn entry_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("games".to_string()),
            Just("GAMES".to_string()),
            Just("demos".to_string()),
            "[a-z]{1,5}\\.(d64|t64|txt)",
        ],
        1..4,
    )
    .prop_flat_map(|segs| {
        let joined = segs.join("/");
        prop_oneof![Just(joined.clone()), Just(format!("{joined}/"))]
    })
}

fn prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("games/"), Just("Games/"), Just("demos/games/")]
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len() && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn listing_entries_trace_back_to_inputs(
        names in prop::collection::vec(entry_name(), 0..24),
        prefix in prefix(),
    ) {
        let listing = list_children(&names, prefix);
        prop_assert_eq!(&listing.entries()[0], &ListingEntry::Parent);

        for entry in listing.children() {
            let found = names.iter().any(|n| {
                if !starts_with_ignore_case(n, prefix) {
                    return false;
                }
                let rest = &n[prefix.len()..];
                match entry {
                    ListingEntry::Dir(d) => rest.starts_with(d.as_str()),
                    ListingEntry::File(f) => rest == f,
                    ListingEntry::Parent => false,
                }
            });
            prop_assert!(found, "{:?} has no source entry", entry);
        }
    }

    #[test]
    fn directory_markers_are_unique_ignoring_case(
        names in prop::collection::vec(entry_name(), 0..24),
        prefix in prefix(),
    ) {
        let listing = list_children(&names, prefix);
        let mut seen = HashSet::new();
        for entry in listing.children() {
            if let ListingEntry::Dir(d) = entry {
                prop_assert!(d.ends_with('/'));
                prop_assert!(seen.insert(d.to_ascii_lowercase()), "duplicate dir {:?}", d);
            }
        }
        prop_assert!(listing.len() <= names.len() + 1);
    }

    #[test]
    fn descending_then_ascending_returns_to_prefix(
        names in prop::collection::vec(entry_name(), 1..24),
    ) {
        let root = list_children(&names, "");
        for entry in root.children() {
            if let Some(next) = navigate("", entry) {
                prop_assert_eq!(navigate(&next, &ListingEntry::Parent), Some(String::new()));
            }
        }
    }

    #[test]
    fn no_candidates_always_selects_first(names in prop::collection::vec(entry_name(), 1..24)) {
        prop_assert_eq!(select_member(&names, None), Some(0));
    }

    #[test]
    fn candidate_selection_is_lowest_matching_index(
        names in prop::collection::vec(entry_name(), 0..24),
    ) {
        let exts: &[&str] = &[".t64", ".d64"];
        let expected = names
            .iter()
            .position(|n| n.to_ascii_lowercase().ends_with(".d64") || n.to_ascii_lowercase().ends_with(".t64"));
        prop_assert_eq!(select_member(&names, Some(exts)), expected);
    }
}

#[test]
fn documented_selection_example() {
    let names = ["readme.txt", "game.t64", "extra.d64"];
    assert_eq!(select_member(&names, Some(&[".d64", ".t64"][..])), Some(1));
}
