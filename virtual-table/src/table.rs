use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;

use crate::overscan::expand_range;
use crate::{
    FrameState, Rect, RowRange, RowSlot, ScrollDirection, ScrollState, TableOptions, ViewportState,
};

/// A headless virtualization engine for a fixed-row-height table.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects, nor the row data itself.
/// - The embedding layer drives it with viewport geometry and scroll offsets.
/// - Rendering is exposed via zero-allocation iteration (`for_each_render_row`).
///
/// For row-list ownership, render-once notification, and parent callbacks,
/// see the `virtual-table-widget` crate.
#[derive(Clone, Debug)]
pub struct TableVirtualizer {
    options: TableOptions,
    viewport: Rect,
    scroll_offset: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl TableVirtualizer {
    /// Creates a new engine from options.
    ///
    /// `options.initial_rect` and `options.initial_offset` are applied
    /// immediately.
    pub fn new(options: TableOptions) -> Self {
        tdebug!(
            count = options.count,
            row_height = options.row_height,
            overscan = options.overscan,
            "TableVirtualizer::new"
        );
        Self {
            viewport: options.initial_rect.unwrap_or_default(),
            scroll_offset: options.initial_offset,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TableOptions) {
        self.options = options;
        ttrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "TableVirtualizer::set_options"
        );
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut TableOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&TableVirtualizer, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame an adapter updates the viewport rect, the scroll
    /// offset, and the scrolling flag together; without batching each setter
    /// would trigger `on_change` separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn row_height(&self) -> u32 {
        self.options.row_height
    }

    pub fn header_height(&self) -> u32 {
        self.options.header_height
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn set_row_height(&mut self, row_height: u32) {
        if self.options.row_height == row_height {
            return;
        }
        self.options.row_height = row_height;
        self.notify();
    }

    pub fn set_header_height(&mut self, header_height: u32) {
        if self.options.header_height == header_height {
            return;
        }
        self.options.header_height = header_height;
        self.notify();
    }

    pub fn set_scroll_padding(&mut self, scroll_padding: u32) {
        self.options.scroll_padding = scroll_padding;
        self.notify();
    }

    pub fn set_scroll_margin(&mut self, scroll_margin: u32) {
        self.options.scroll_margin = scroll_margin;
        self.notify();
    }

    pub fn set_scrolling_reset_delay_ms(&mut self, delay_ms: u64) {
        self.options.scrolling_reset_delay_ms = delay_ms;
        self.notify();
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Debounced `is_scrolling` reset; call this on a frame/timer tick.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport_rect(&mut self, rect: Rect) {
        if self.viewport == rect {
            return;
        }
        self.viewport = rect;
        self.notify();
    }

    /// Width update from the embedding layer's measurement wrapper.
    pub fn set_viewport_width(&mut self, width: u32) {
        if self.viewport.width == width {
            return;
        }
        self.viewport.width = width;
        self.notify();
    }

    /// Height update from the scroll container.
    pub fn set_viewport_height(&mut self, height: u32) {
        if self.viewport.height == height {
            return;
        }
        self.viewport.height = height;
        self.notify();
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Applies the parent-owned scroll offset (prop update, no scroll event).
    pub fn set_scroll_top(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_top_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_top(clamped);
    }

    /// Applies a scroll offset update from a user scroll (wheel/drag), and
    /// marks the engine as scrolling.
    pub fn apply_scroll_event(&mut self, offset: u64, now_ms: u64) {
        ttrace!(offset, now_ms, "apply_scroll_event");
        self.batch_update(|v| {
            v.set_scroll_top(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_event`, but clamps the offset.
    pub fn apply_scroll_event_clamped(&mut self, offset: u64, now_ms: u64) {
        ttrace!(offset, now_ms, "apply_scroll_event_clamped");
        self.batch_update(|v| {
            v.set_scroll_top_clamped(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Applies both viewport rect and scroll offset in a single coalesced
    /// update. Recommended for adapters that receive scroll events along
    /// with updated container geometry.
    pub fn apply_scroll_frame(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        ttrace!(
            width = rect.width,
            height = rect.height,
            scroll_offset,
            now_ms,
            "apply_scroll_frame"
        );
        self.batch_update(|v| {
            v.set_viewport_rect(rect);
            v.set_scroll_top(scroll_offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Returns a lightweight snapshot of the current viewport state.
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.viewport,
        }
    }

    /// Returns a lightweight snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Returns a combined snapshot of viewport + scroll state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    /// Restores viewport geometry from a previously captured snapshot.
    pub fn restore_viewport_state(&mut self, viewport: ViewportState) {
        self.set_viewport_rect(viewport.rect);
    }

    /// Restores scroll state from a previously captured snapshot.
    ///
    /// When `scroll.is_scrolling` is `true`, the internal scrolling timers
    /// are updated as if a scroll event happened at `now_ms`.
    pub fn restore_scroll_state(&mut self, scroll: ScrollState, now_ms: u64) {
        if scroll.is_scrolling {
            self.apply_scroll_event_clamped(scroll.offset, now_ms);
            return;
        }
        self.batch_update(|v| {
            v.set_scroll_top_clamped(scroll.offset);
            v.set_is_scrolling(false);
        });
    }

    /// Restores both viewport + scroll state from a previously captured
    /// snapshot.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|v| {
            v.set_viewport_rect(frame.viewport.rect);
            v.restore_scroll_state(frame.scroll, now_ms);
        });
    }

    /// Offset of the first row inside the scroll container.
    pub fn rows_start(&self) -> u64 {
        self.options.scroll_margin as u64 + self.options.header_height as u64
    }

    /// Total scrollable size of the table (header band + rows).
    pub fn total_size(&self) -> u64 {
        let rows = self.options.count as u64 * self.options.row_height as u64;
        self.options.header_height as u64 + rows
    }

    pub fn max_scroll_offset(&self) -> u64 {
        let margin = self.options.scroll_margin as u64;
        let view = self.viewport.height as u64;
        margin.saturating_add(self.total_size().saturating_sub(view))
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Absolute top offset of row `index` in the scroll container.
    pub fn row_top(&self, index: usize) -> Option<u64> {
        (index < self.options.count).then(|| {
            let rh = self.options.row_height as u64;
            self.rows_start().saturating_add(index as u64 * rh)
        })
    }

    /// Absolute bottom offset of row `index` in the scroll container.
    pub fn row_bottom(&self, index: usize) -> Option<u64> {
        let top = self.row_top(index)?;
        Some(top.saturating_add(self.options.row_height as u64))
    }

    /// Maps a scroll-container offset to the row under it.
    ///
    /// Offsets before the first row map to row 0; offsets past the last row
    /// clamp to `count - 1`. Returns `None` only when the table is empty or
    /// has zero-height rows.
    pub fn row_at_offset(&self, offset: u64) -> Option<usize> {
        let count = self.options.count;
        let rh = self.options.row_height as u64;
        if count == 0 || rh == 0 {
            return None;
        }
        let start = self.rows_start();
        if offset < start {
            return Some(0);
        }
        let index = ((offset - start) / rh) as usize;
        Some(index.min(count - 1))
    }

    /// Target scroll offset for bringing row `index` into view:
    /// `(index + 1) * row_height + scroll_padding`.
    ///
    /// The value is returned as computed, without clamping: the parent's
    /// scroll handler owns the container and applies its own limits.
    pub fn scroll_to_row_offset(&self, index: usize) -> u64 {
        let rh = self.options.row_height as u64;
        (index as u64 + 1)
            .saturating_mul(rh)
            .saturating_add(self.options.scroll_padding as u64)
    }

    /// The inclusive range of rows intersecting the viewport at the current
    /// scroll offset, without overscan.
    pub fn visible_rows(&self) -> Option<RowRange> {
        self.visible_rows_for(self.scroll_offset, self.viewport.height)
    }

    pub fn visible_rows_for(&self, scroll_offset: u64, viewport_height: u32) -> Option<RowRange> {
        let count = self.options.count;
        let rh = self.options.row_height as u64;
        if count == 0 || viewport_height == 0 || rh == 0 {
            return None;
        }

        let start = self.rows_start();
        let rows_end = start.saturating_add(count as u64 * rh);
        let view = viewport_height as u64;

        let margin = self.options.scroll_margin as u64;
        let max_scroll = margin.saturating_add(self.total_size().saturating_sub(view));
        let scroll_offset = scroll_offset.min(max_scroll);
        let scroll_end = scroll_offset.saturating_add(view);
        if scroll_end <= start || scroll_offset >= rows_end {
            return None;
        }

        let first_off = scroll_offset.max(start) - start;
        let last_off = scroll_end - 1 - start;

        let first = ((first_off / rh) as usize).min(count - 1);
        let last = ((last_off / rh) as usize).min(count - 1);

        Some(RowRange {
            start: first,
            stop: last,
        })
    }

    /// The visible range expanded by the symmetric overscan margin.
    pub fn render_rows(&self) -> Option<RowRange> {
        self.render_rows_for(self.scroll_offset, self.viewport.height)
    }

    pub fn render_rows_for(&self, scroll_offset: u64, viewport_height: u32) -> Option<RowRange> {
        let visible = self.visible_rows_for(scroll_offset, viewport_height)?;
        Some(expand_range(
            visible,
            self.options.overscan,
            self.options.count,
        ))
    }

    /// Iterates the overscanned visible rows as [`RowSlot`]s, top to bottom,
    /// without allocations.
    pub fn for_each_render_row(&self, mut f: impl FnMut(RowSlot)) {
        let Some(range) = self.render_rows() else {
            return;
        };
        let rh = self.options.row_height;
        let start = self.rows_start();
        for index in range.iter() {
            f(RowSlot {
                index,
                top: start.saturating_add(index as u64 * rh as u64),
                height: rh,
            });
        }
    }

    /// Collects the overscanned visible rows into `out` (clears `out` first).
    ///
    /// Convenience wrapper around [`Self::for_each_render_row`]; adapters
    /// that care about allocations should reuse a scratch buffer.
    pub fn collect_render_rows(&self, out: &mut Vec<RowSlot>) {
        out.clear();
        self.for_each_render_row(|slot| out.push(slot));
    }
}
