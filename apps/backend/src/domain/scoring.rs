//! Winner math. In Golf the lowest total wins; ties all win.

/// The winning (minimum) total across participants, if any.
pub fn winning_total(totals: &[i32]) -> Option<i32> {
    totals.iter().copied().min()
}

/// One flag per entry: true exactly for the entries at the minimum total.
pub fn winner_flags(totals: &[i32]) -> Vec<bool> {
    match winning_total(totals) {
        Some(min) => totals.iter().map(|t| *t == min).collect(),
        None => Vec::new(),
    }
}
