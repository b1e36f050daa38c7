use core::cmp;

use crate::RowRange;

/// Expands a visible row range by `overscan` rows in both directions,
/// clamped to `[0, count - 1]`.
///
/// Directional overscan (rendering extra rows only on the side the user is
/// scrolling toward) causes blank flashes when the user reverses mid-flick,
/// so the scroll direction is deliberately ignored and the range is always
/// expanded symmetrically.
///
/// `count` must be non-zero and `visible` must lie within `[0, count - 1]`;
/// the engine only calls this with a non-empty visible window.
pub fn expand_range(visible: RowRange, overscan: usize, count: usize) -> RowRange {
    debug_assert!(count > 0, "expand_range called with count == 0");
    debug_assert!(
        visible.stop < count,
        "visible range out of bounds (stop={}, count={count})",
        visible.stop
    );

    RowRange {
        start: visible.start.saturating_sub(overscan),
        stop: cmp::min(count - 1, visible.stop.saturating_add(overscan)),
    }
}
