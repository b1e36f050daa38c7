//! A headless virtualization engine for fixed-row-height tables.
//!
//! For the widget layer (row list ownership, render-once notification, parent
//! callbacks), see the `virtual-table-widget` crate.
//!
//! This crate focuses on the core math needed to render large tables at
//! interactive frame rates: visible-row windows from a scroll offset,
//! symmetric overscan, row geometry, and scroll-to-row target offsets.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size (width from measurement, height from the scroll container)
//! - scroll offset (owned by the parent / scroll container)
//! - a tick source for scroll-idle debouncing
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod options;
mod overscan;
mod state;
mod table;
mod types;

#[cfg(test)]
mod tests;

pub use options::{OnChangeCallback, TableOptions};
pub use overscan::expand_range;
pub use state::{FrameState, ScrollState, ViewportState};
pub use table::TableVirtualizer;
pub use types::{Rect, RowRange, RowSlot, ScrollDirection};
