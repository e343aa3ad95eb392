/// Result of allocating tokens to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Index of the item in the input slice.
    pub index: usize,
    /// Tokens allocated to this item.
    pub tokens: usize,
}

/// Greedy in-order allocation over precomputed sizes.
///
/// An item that would overflow the remaining budget is skipped whole and
/// allocation continues with the next item.
pub fn allocate_sizes(sizes: &[usize], budget: usize) -> Vec<Allocation> {
    let mut remaining = budget;
    let mut allocations = Vec::new();

    for (index, &tokens) in sizes.iter().enumerate() {
        if tokens <= remaining {
            remaining -= tokens;
            allocations.push(Allocation { index, tokens });
        }
    }

    allocations
}
