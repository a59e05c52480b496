#![no_main]

use libfuzzer_sys::fuzz_target;
use scanorder_core::{compare_names, interleave_indices};
use std::cmp::Ordering;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let names: Vec<String> = input
        .split('\n')
        .take(3)
        .map(|s| s.chars().take(200).collect())
        .collect();

    // Antisymmetry and transitivity over whatever names we got
    for a in &names {
        assert_eq!(compare_names(a, a), Ordering::Equal);
        for b in &names {
            assert_eq!(compare_names(a, b), compare_names(b, a).reverse());
            for c in &names {
                if compare_names(a, b) != Ordering::Greater
                    && compare_names(b, c) != Ordering::Greater
                {
                    assert_ne!(compare_names(a, c), Ordering::Greater);
                }
            }
        }
    }

    // Every schedule is a permutation of 0..n
    let n = data.first().map_or(0, |b| usize::from(*b)) * 4;
    let mut indices = interleave_indices(n);
    indices.sort_unstable();
    assert!(indices.into_iter().eq(0..n));
});
