use alloc::sync::Arc;

use crate::Rect;
use crate::table::TableVirtualizer;

/// A callback fired when the engine's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&TableVirtualizer, bool) + Send + Sync>;

const DEFAULT_ROW_HEIGHT: u32 = 38;
const DEFAULT_HEADER_HEIGHT: u32 = 38;
const DEFAULT_OVERSCAN: usize = 2;
const DEFAULT_SCROLL_PADDING: u32 = 20;

/// Configuration for [`crate::TableVirtualizer`].
///
/// Cheap to clone: the only heavy field (`on_change`) is stored in an `Arc`,
/// so adapters can tweak a few fields and call
/// `TableVirtualizer::set_options` without reallocating closures.
#[derive(Clone)]
pub struct TableOptions {
    pub count: usize,

    /// Fixed height of every row in the scroll axis. Must be non-zero for
    /// the engine to produce any rows.
    pub row_height: u32,

    /// Height of the table's own header band, rendered above the rows
    /// inside the scroll container.
    pub header_height: u32,

    /// Extra rows rendered beyond the visible window, in both directions.
    pub overscan: usize,

    /// Additional padding applied when computing scroll-to-row offsets.
    pub scroll_padding: u32,

    /// Where the table starts inside the scroll container.
    ///
    /// This is useful when the scroll offset is measured against a larger
    /// container (e.g. window scrolling) while the table begins after some
    /// unrelated content.
    pub scroll_margin: u32,

    /// Initial scroll offset. The offset itself is owned by the parent and
    /// pushed in on every change; this is only the starting value.
    pub initial_offset: u64,

    /// The initial viewport rectangle, if known before measurement.
    pub initial_rect: Option<Rect>,

    /// Debounce duration for resetting `is_scrolling` after the last scroll
    /// event, driven by [`crate::TableVirtualizer::tick`].
    pub scrolling_reset_delay_ms: u64,

    /// Optional callback fired when the engine's internal state changes.
    pub on_change: Option<OnChangeCallback>,
}

impl TableOptions {
    /// Creates options for a table with `count` rows and the default
    /// geometry (38 px rows, 38 px header, overscan 2, scroll padding 20).
    pub fn new(count: usize) -> Self {
        Self {
            count,
            row_height: DEFAULT_ROW_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            scroll_padding: DEFAULT_SCROLL_PADDING,
            scroll_margin: 0,
            initial_offset: 0,
            initial_rect: None,
            scrolling_reset_delay_ms: 150,
            on_change: None,
        }
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_scroll_padding(mut self, scroll_padding: u32) -> Self {
        self.scroll_padding = scroll_padding;
        self
    }

    pub fn with_scroll_margin(mut self, scroll_margin: u32) -> Self {
        self.scroll_margin = scroll_margin;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    /// Sets the initial viewport rectangle.
    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&TableVirtualizer, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableOptions")
            .field("count", &self.count)
            .field("row_height", &self.row_height)
            .field("header_height", &self.header_height)
            .field("overscan", &self.overscan)
            .field("scroll_padding", &self.scroll_padding)
            .field("scroll_margin", &self.scroll_margin)
            .field("initial_offset", &self.initial_offset)
            .field("initial_rect", &self.initial_rect)
            .field(
                "scrolling_reset_delay_ms",
                &self.scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
