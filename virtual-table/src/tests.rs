use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

/// Naive reference: intersect every row slot with the viewport window.
fn expected_visible_rows(
    count: usize,
    row_height: u32,
    header_height: u32,
    scroll_margin: u32,
    scroll_offset: u64,
    viewport_height: u32,
) -> Option<RowRange> {
    if count == 0 || viewport_height == 0 || row_height == 0 {
        return None;
    }

    let rh = row_height as u64;
    let start = scroll_margin as u64 + header_height as u64;
    let view = viewport_height as u64;
    let total = header_height as u64 + count as u64 * rh;

    let max_scroll = (scroll_margin as u64).saturating_add(total.saturating_sub(view));
    let scroll_offset = scroll_offset.min(max_scroll);
    let scroll_end = scroll_offset.saturating_add(view);

    let mut first = None;
    let mut last = None;
    for i in 0..count {
        let top = start + i as u64 * rh;
        let bottom = top + rh;
        if bottom > scroll_offset && top < scroll_end {
            if first.is_none() {
                first = Some(i);
            }
            last = Some(i);
        }
    }

    Some(RowRange {
        start: first?,
        stop: last?,
    })
}

fn flat_options(count: usize) -> TableOptions {
    TableOptions::new(count)
        .with_row_height(1)
        .with_header_height(0)
        .with_overscan(1)
}

#[test]
fn expand_range_matches_documented_examples() {
    let r = expand_range(RowRange { start: 10, stop: 20 }, 2, 100);
    assert_eq!(r, RowRange { start: 8, stop: 22 });

    // Clamped at the front.
    let r = expand_range(RowRange { start: 0, stop: 10 }, 5, 100);
    assert_eq!(r, RowRange { start: 0, stop: 15 });

    // Clamped at the back.
    let r = expand_range(RowRange { start: 90, stop: 99 }, 5, 100);
    assert_eq!(r, RowRange { start: 85, stop: 99 });
}

#[test]
fn expand_range_randomized_stays_in_bounds() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..2000 {
        let count = rng.gen_range_usize(1, 200);
        let start = rng.gen_range_usize(0, count);
        let stop = rng.gen_range_usize(start, count);
        let overscan = rng.gen_range_usize(0, 12);

        let visible = RowRange { start, stop };
        let expanded = expand_range(visible, overscan, count);

        assert!(expanded.stop <= count - 1);
        assert!(expanded.start <= visible.start);
        assert!(expanded.stop >= visible.stop);
        assert!(expanded.contains(visible.start));
        assert!(expanded.contains(visible.stop));

        // Symmetric wherever the clamp does not bite.
        if start >= overscan {
            assert_eq!(expanded.start, start - overscan);
        } else {
            assert_eq!(expanded.start, 0);
        }
        if stop + overscan <= count - 1 {
            assert_eq!(expanded.stop, stop + overscan);
        } else {
            assert_eq!(expanded.stop, count - 1);
        }
    }
}

#[test]
fn flat_table_visible_and_render_rows() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);
    assert_eq!(v.total_size(), 100);

    let visible = v.visible_rows().unwrap();
    assert_eq!(visible, RowRange { start: 0, stop: 9 });

    // Overscan(1) clamps at the front, extends at the back.
    let render = v.render_rows().unwrap();
    assert_eq!(render, RowRange { start: 0, stop: 10 });
}

#[test]
fn scrolled_window_overscans_both_directions() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);
    v.set_scroll_top(50);
    assert_eq!(v.visible_rows().unwrap(), RowRange { start: 50, stop: 59 });
    assert_eq!(v.render_rows().unwrap(), RowRange { start: 49, stop: 60 });
}

#[test]
fn header_band_shifts_row_geometry() {
    let mut v = TableVirtualizer::new(TableOptions::new(10));
    v.set_viewport_height(100);

    assert_eq!(v.rows_start(), 38);
    assert_eq!(v.row_top(0), Some(38));
    assert_eq!(v.row_top(1), Some(76));
    assert_eq!(v.row_top(10), None);
    assert_eq!(v.row_bottom(0), Some(76));
    assert_eq!(v.total_size(), 38 + 10 * 38);

    // Viewport [0, 100) covers the header plus rows 0..=1.
    assert_eq!(v.visible_rows().unwrap(), RowRange { start: 0, stop: 1 });
}

#[test]
fn visible_rows_randomized_matches_reference() {
    let mut rng = Lcg::new(0x7ab1e);
    for _ in 0..4000 {
        let count = rng.gen_range_usize(0, 50);
        let row_height = rng.gen_range_u32(1, 50);
        let header_height = rng.gen_range_u32(0, 60);
        let scroll_margin = rng.gen_range_u32(0, 40);
        let viewport_height = rng.gen_range_u32(0, 120);
        let total = header_height as u64 + count as u64 * row_height as u64;
        let scroll_offset = rng.gen_range_u64(0, scroll_margin as u64 + total + 50);

        let v = TableVirtualizer::new(
            TableOptions::new(count)
                .with_row_height(row_height)
                .with_header_height(header_height)
                .with_scroll_margin(scroll_margin),
        );

        let got = v.visible_rows_for(scroll_offset, viewport_height);
        let want = expected_visible_rows(
            count,
            row_height,
            header_height,
            scroll_margin,
            scroll_offset,
            viewport_height,
        );
        assert_eq!(
            got, want,
            "count={count} rh={row_height} header={header_height} margin={scroll_margin} \
             view={viewport_height} offset={scroll_offset}"
        );
    }
}

#[test]
fn row_at_offset_clamps_to_table() {
    let v = TableVirtualizer::new(TableOptions::new(10).with_scroll_margin(20));

    // Before the rows (margin + header band) maps to the first row.
    assert_eq!(v.row_at_offset(0), Some(0));
    assert_eq!(v.row_at_offset(57), Some(0));
    assert_eq!(v.row_at_offset(58), Some(0));
    assert_eq!(v.row_at_offset(58 + 38), Some(1));
    assert_eq!(v.row_at_offset(u64::MAX), Some(9));

    let empty = TableVirtualizer::new(TableOptions::new(0));
    assert_eq!(empty.row_at_offset(0), None);
}

#[test]
fn scroll_to_row_offset_uses_fixed_formula() {
    let v = TableVirtualizer::new(TableOptions::new(100));
    // (index + 1) * 38 + 20, exactly, no clamping.
    assert_eq!(v.scroll_to_row_offset(0), 58);
    assert_eq!(v.scroll_to_row_offset(5), 6 * 38 + 20);
    assert_eq!(v.scroll_to_row_offset(99), 100 * 38 + 20);

    let mut rng = Lcg::new(42);
    for _ in 0..200 {
        let r = rng.gen_range_usize(0, 100);
        assert_eq!(v.scroll_to_row_offset(r), (r as u64 + 1) * 38 + 20);
    }
}

#[test]
fn empty_or_collapsed_tables_have_no_rows() {
    let mut v = TableVirtualizer::new(TableOptions::new(0));
    v.set_viewport_height(100);
    assert_eq!(v.visible_rows(), None);
    assert_eq!(v.render_rows(), None);

    let mut v = TableVirtualizer::new(TableOptions::new(100));
    v.set_viewport_height(0);
    assert_eq!(v.visible_rows(), None);

    let mut v = TableVirtualizer::new(TableOptions::new(100).with_row_height(0));
    v.set_viewport_height(50);
    assert_eq!(v.visible_rows(), None);
}

#[test]
fn scroll_direction_follows_offset_deltas() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);
    assert_eq!(v.scroll_direction(), None);

    v.set_scroll_top(10);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Forward));
    v.set_scroll_top(4);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));
    v.set_scroll_top(4);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));
}

#[test]
fn direction_does_not_skew_overscan() {
    let mut v = TableVirtualizer::new(flat_options(100).with_overscan(3));
    v.set_viewport_height(10);

    v.set_scroll_top(50);
    let forward = v.render_rows().unwrap();
    v.set_scroll_top(60);
    v.set_scroll_top(50);
    let backward = v.render_rows().unwrap();

    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));
    assert_eq!(forward, backward);
    assert_eq!(forward, RowRange { start: 47, stop: 62 });
}

#[test]
fn batch_update_coalesces_notifications() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits2 = Arc::clone(&hits);
    let mut v = TableVirtualizer::new(flat_options(100).with_on_change(Some(
        move |_: &TableVirtualizer, _| {
            hits2.fetch_add(1, Ordering::SeqCst);
        },
    )));

    v.batch_update(|v| {
        v.set_viewport_height(10);
        v.set_scroll_top(25);
        v.set_overscan(4);
    });
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Outside a batch every mutation notifies on its own.
    v.set_scroll_top(30);
    v.set_scroll_top(35);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    // No-op setters stay silent.
    v.set_scroll_top(35);
    v.set_count(100);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn apply_scroll_event_marks_scrolling_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits2 = Arc::clone(&hits);
    let mut v = TableVirtualizer::new(flat_options(100).with_on_change(Some(
        move |_: &TableVirtualizer, _| {
            hits2.fetch_add(1, Ordering::SeqCst);
        },
    )));
    v.batch_update(|v| v.set_viewport_height(10));
    hits.store(0, Ordering::SeqCst);

    v.apply_scroll_event(40, 1000);
    assert!(v.is_scrolling());
    assert_eq!(v.scroll_offset(), 40);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn tick_resets_is_scrolling_after_delay() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);

    v.apply_scroll_event(10, 0);
    assert!(v.is_scrolling());

    v.tick(100);
    assert!(v.is_scrolling());

    v.tick(149);
    assert!(v.is_scrolling());

    v.tick(150);
    assert!(!v.is_scrolling());
    assert_eq!(v.scroll_direction(), None);
}

#[test]
fn scroll_events_keep_the_debounce_alive() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);

    v.apply_scroll_event(10, 0);
    v.tick(100);
    v.apply_scroll_event(20, 120);
    v.tick(200);
    assert!(v.is_scrolling());
    v.tick(270);
    assert!(!v.is_scrolling());
}

#[test]
fn clamp_scroll_offset_respects_margin_and_viewport() {
    let mut v = TableVirtualizer::new(
        flat_options(10).with_scroll_margin(7),
    );
    v.set_viewport_height(5);
    // total = 10, margin = 7 -> max = 7 + (10 - 5) = 12.
    assert_eq!(v.max_scroll_offset(), 12);
    assert_eq!(v.clamp_scroll_offset(100), 12);
    assert_eq!(v.clamp_scroll_offset(3), 3);
}

#[test]
fn frame_state_roundtrips() {
    let mut v = TableVirtualizer::new(TableOptions::new(50));
    v.set_viewport_rect(Rect {
        width: 640,
        height: 480,
    });
    v.apply_scroll_event(120, 0);
    let frame = v.frame_state();
    assert!(frame.scroll.is_scrolling);

    let mut restored = TableVirtualizer::new(TableOptions::new(50));
    restored.restore_frame_state(frame, 10);
    assert_eq!(restored.viewport(), v.viewport());
    assert_eq!(restored.scroll_offset(), 120);
    assert!(restored.is_scrolling());

    // A settled snapshot restores without marking scrolling.
    let mut settled = TableVirtualizer::new(TableOptions::new(50));
    settled.restore_scroll_state(
        ScrollState {
            offset: 60,
            is_scrolling: false,
        },
        10,
    );
    assert_eq!(settled.scroll_offset(), 60);
    assert!(!settled.is_scrolling());
}

#[test]
fn render_row_slots_carry_geometry() {
    let mut v = TableVirtualizer::new(
        TableOptions::new(100)
            .with_scroll_margin(2)
            .with_overscan(1),
    );
    v.set_viewport_height(80);
    v.set_scroll_top(0);

    let mut slots = Vec::new();
    v.collect_render_rows(&mut slots);
    assert!(!slots.is_empty());

    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot.index, slots[0].index + i);
        assert_eq!(slot.height, 38);
        assert_eq!(slot.top, 2 + 38 + slot.index as u64 * 38);
        assert_eq!(slot.bottom(), slot.top + 38);
        assert_eq!(v.row_top(slot.index), Some(slot.top));
    }
}

#[test]
fn set_options_replaces_geometry_in_one_step() {
    let mut v = TableVirtualizer::new(flat_options(100));
    v.set_viewport_height(10);
    v.set_scroll_top(50);

    v.update_options(|o| {
        o.count = 20;
        o.overscan = 0;
    });
    // Offset now clamps into the shorter table.
    assert_eq!(v.count(), 20);
    assert_eq!(v.visible_rows().unwrap(), RowRange { start: 10, stop: 19 });
}

#[test]
fn row_range_helpers() {
    let r = RowRange { start: 3, stop: 7 };
    assert_eq!(r.len(), 5);
    assert!(r.contains(3));
    assert!(r.contains(7));
    assert!(!r.contains(8));
    let collected: Vec<usize> = r.iter().collect();
    assert_eq!(collected, alloc::vec![3, 4, 5, 6, 7]);
}
