use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use virtual_table::{RowSlot, TableOptions, TableVirtualizer};

/// Fired once, after the first render pass that produced rows while the
/// content body was attached.
pub type RenderCallback = Arc<dyn Fn() + Send + Sync>;

/// Receives scroll target offsets. The parent owns the scroll container and
/// decides how (and whether) to apply them.
pub type ScrollCallback = Arc<dyn Fn(u64) + Send + Sync>;

const DEFAULT_CLASS_NAME: &str = "virtual-table";

/// Which container the embedding layer should track scroll offsets from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollSource {
    /// Small screens scroll the window itself.
    Window,
    /// Everything else scrolls the content body element.
    ContentBody,
}

/// A virtualized table widget: a [`TableVirtualizer`] plus the row list,
/// parent callbacks, and the render-once latch.
///
/// Rows are opaque to the widget; indices are their identity. The widget
/// never moves a scroll container itself — scroll targets are handed to the
/// parent's scroll callback.
pub struct VirtualTable<R> {
    engine: TableVirtualizer,
    rows: Vec<R>,
    class_name: String,
    is_small_screen: bool,
    content_attached: bool,
    initialized: bool,
    on_render: Option<RenderCallback>,
    on_scroll: Option<ScrollCallback>,
}

impl<R> VirtualTable<R> {
    /// Creates a widget over `rows`. `options.count` is ignored and kept in
    /// sync with the row list.
    pub fn new(options: TableOptions, rows: Vec<R>) -> Self {
        let mut options = options;
        options.count = rows.len();
        Self {
            engine: TableVirtualizer::new(options),
            rows,
            class_name: String::from(DEFAULT_CLASS_NAME),
            is_small_screen: false,
            content_attached: false,
            initialized: false,
            on_render: None,
            on_scroll: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_small_screen(mut self, is_small_screen: bool) -> Self {
        self.is_small_screen = is_small_screen;
        self
    }

    pub fn with_on_render(mut self, on_render: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.on_render = on_render.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll(
        mut self,
        on_scroll: Option<impl Fn(u64) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }

    pub fn engine(&self) -> &TableVirtualizer {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TableVirtualizer {
        &mut self.engine
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Looks up the row at `index`.
    pub fn row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    /// Replaces the row list and keeps the engine's count in sync.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.engine.set_count(self.rows.len());
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn is_small_screen(&self) -> bool {
        self.is_small_screen
    }

    pub fn set_small_screen(&mut self, is_small_screen: bool) {
        self.is_small_screen = is_small_screen;
    }

    /// The container the embedding layer should track scroll offsets from.
    pub fn scroll_source(&self) -> ScrollSource {
        if self.is_small_screen {
            ScrollSource::Window
        } else {
            ScrollSource::ContentBody
        }
    }

    /// Marks the content body as available. Until this is called, render
    /// passes complete without firing the render notification.
    pub fn attach_content_body(&mut self) {
        self.content_attached = true;
    }

    pub fn content_attached(&self) -> bool {
        self.content_attached
    }

    /// Whether the render-once notification has already fired.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Width update from the embedding layer's measurement wrapper.
    pub fn handle_measure(&mut self, width: u32) {
        self.engine.set_viewport_width(width);
    }

    /// Applies the parent-owned scroll offset (prop update, no scroll event).
    pub fn set_scroll_top(&mut self, offset: u64) {
        self.engine.set_scroll_top(offset);
    }

    /// Handles a scroll event from the tracked container: updates engine
    /// state and forwards the offset to the parent's scroll callback.
    pub fn handle_window_scroll(&mut self, offset: u64, now_ms: u64) {
        self.engine.apply_scroll_event(offset, now_ms);
        if let Some(cb) = &self.on_scroll {
            cb(offset);
        }
    }

    /// Height update from the tracked scroll container.
    pub fn handle_window_resize(&mut self, height: u32) {
        self.engine.set_viewport_height(height);
    }

    /// Debounced scroll-idle bookkeeping; call on a frame/timer tick.
    pub fn tick(&mut self, now_ms: u64) {
        self.engine.tick(now_ms);
    }

    /// Computes the target offset for `index` and hands it to the parent's
    /// scroll callback, exactly once. The widget does not move any scroll
    /// container itself; the engine's own offset is untouched.
    ///
    /// Returns the computed offset.
    pub fn scroll_to_row(&self, index: usize) -> u64 {
        let offset = self.engine.scroll_to_row_offset(index);
        if let Some(cb) = &self.on_scroll {
            cb(offset);
        }
        offset
    }

    /// Forces a geometry refresh after in-place row data changes.
    pub fn recompute(&mut self) {
        self.engine.update_options(|_| {});
    }

    /// Runs a render pass: hands every overscanned visible row to
    /// `renderer` (geometry + data, top to bottom), then runs the
    /// render-once bookkeeping.
    ///
    /// Returns the number of rows rendered.
    pub fn render(&mut self, mut renderer: impl FnMut(RowSlot, &R)) -> usize {
        let rows = &self.rows;
        let mut rendered = 0usize;
        self.engine.for_each_render_row(|slot| {
            if let Some(row) = rows.get(slot.index) {
                renderer(slot, row);
                rendered += 1;
            }
        });

        if rendered > 0 {
            self.section_rendered();
        }
        rendered
    }

    fn section_rendered(&mut self) {
        if self.initialized || !self.content_attached {
            return;
        }
        if let Some(cb) = &self.on_render {
            cb();
        }
        self.initialized = true;
    }
}

impl<R: Clone> Clone for VirtualTable<R> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            rows: self.rows.clone(),
            class_name: self.class_name.clone(),
            is_small_screen: self.is_small_screen,
            content_attached: self.content_attached,
            initialized: self.initialized,
            on_render: self.on_render.clone(),
            on_scroll: self.on_scroll.clone(),
        }
    }
}

impl<R> core::fmt::Debug for VirtualTable<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualTable")
            .field("engine", &self.engine)
            .field("rows", &self.rows.len())
            .field("class_name", &self.class_name)
            .field("is_small_screen", &self.is_small_screen)
            .field("content_attached", &self.content_attached)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
