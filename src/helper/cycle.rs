/// Move a selection one step back, wrapping to the last item.
pub fn prev(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        _ if all == 0 => None,
        Some(0) | None => Some(all - 1),
        Some(idx) => Some(idx.min(all) - 1),
    }
}

/// Move a selection one step forward, wrapping to the first item.
pub fn next(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        _ if all == 0 => None,
        Some(idx) if idx + 1 < all => Some(idx + 1),
        _ => Some(0),
    }
}

/// Keep a selection valid after the list shrank or grew.
pub fn clamp(idx: Option<usize>, all: usize) -> Option<usize> {
    idx.and_then(|idx| all.checked_sub(1).map(|last| idx.min(last)))
}
