use proptest::prelude::*;
use scanorder_core::{compare_names, interleave, interleave_indices, sort_entries, FileEntry};
use std::cmp::Ordering;

fn entries(names: &[String]) -> Vec<FileEntry> {
    names
        .iter()
        .map(|name| FileEntry::new(name.clone(), format!("/scans/b/{}", name)))
        .collect()
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_]{0,4}[0-9]{0,6}[a-z.]{0,4}",
        "[0-9]{1,30}",
        ".{0,12}",
    ]
}

proptest! {
    #[test]
    fn sort_is_idempotent(names in prop::collection::vec(name_strategy(), 0..40)) {
        let once = sort_entries(entries(&names));
        let twice = sort_entries(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sort_is_a_permutation(names in prop::collection::vec(name_strategy(), 0..40)) {
        let mut sorted: Vec<String> = sort_entries(entries(&names))
            .into_iter()
            .map(|e| e.name)
            .collect();
        let mut original = names.clone();
        sorted.sort();
        original.sort();
        prop_assert_eq!(sorted, original);
    }

    #[test]
    fn sorted_output_is_non_decreasing(names in prop::collection::vec(name_strategy(), 0..40)) {
        let sorted = sort_entries(entries(&names));
        for pair in sorted.windows(2) {
            prop_assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
    }

    #[test]
    fn compare_is_antisymmetric(a in name_strategy(), b in name_strategy()) {
        prop_assert_eq!(compare_names(&a, &b), compare_names(&b, &a).reverse());
    }

    #[test]
    fn numeric_runs_compare_by_value(x in 0u64..1_000_000, y in 0u64..1_000_000, pad in 0usize..4) {
        let a = format!("img{:0width$}", x, width = pad);
        let b = format!("img{}", y);
        prop_assert_eq!(compare_names(&a, &b), x.cmp(&y));
    }

    #[test]
    fn interleave_is_a_permutation(n in 0usize..500) {
        let mut indices = interleave_indices(n);
        prop_assert_eq!(indices.len(), n);
        if n > 0 {
            prop_assert_eq!(indices[0], n - 1);
        }
        indices.sort_unstable();
        prop_assert!(indices.into_iter().eq(0..n));
    }

    #[test]
    fn interleave_matches_index_schedule(items in prop::collection::vec(any::<u16>(), 0..100)) {
        let expected: Vec<u16> = interleave_indices(items.len())
            .into_iter()
            .map(|i| items[i])
            .collect();
        prop_assert_eq!(interleave(&items), expected);
    }
}
