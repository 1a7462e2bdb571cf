//! Era observation window.

use shared_types::EraIndex;

/// Last `window` eras of `eras`, ascending and without duplicates.
///
/// `window == 0` yields an empty window.
pub fn select_window(eras: &[EraIndex], window: usize) -> Vec<EraIndex> {
    let mut sorted = eras.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let skip = sorted.len().saturating_sub(window);
    sorted.split_off(skip)
}
