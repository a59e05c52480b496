//! Physical page order for double-sided scans.
//!
//! The schedule starts with the last page, then walks backwards skipping two
//! and taking two, and finally appends every page that was skipped in its
//! original order. It depends only on the batch length, never on the items.

/// Index schedule for a batch of `n` items.
pub fn interleave_indices(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(n);
    let mut consumed = vec![false; n];

    order.push(n - 1);
    consumed[n - 1] = true;

    // Signed cursor so the walk can step past index 0
    let mut i = n as isize - 2;
    let mut skip_count = 0;

    while i >= 0 {
        if skip_count < 2 {
            skip_count += 1;
            i -= 1;
            continue;
        }

        let mut taken = 0;
        while taken < 2 && i >= 0 {
            #[allow(clippy::cast_sign_loss)]
            let idx = i as usize;
            order.push(idx);
            consumed[idx] = true;
            taken += 1;
            i -= 1;
        }
        skip_count = 0;
    }

    order.extend((0..n).filter(|&idx| !consumed[idx]));
    order
}

/// Reorder a naturally sorted batch into physical page order.
pub fn interleave<T: Clone>(sorted: &[T]) -> Vec<T> {
    interleave_indices(sorted.len())
        .into_iter()
        .map(|idx| sorted[idx].clone())
        .collect()
}
