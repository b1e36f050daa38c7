//! Widget layer for the `virtual-table` crate.
//!
//! The `virtual-table` crate is UI-agnostic and focuses on the core math and
//! scroll state. This crate adds the pieces a table widget actually needs:
//!
//! - ownership of the row list (indices are row identity)
//! - parent-facing callbacks (scroll handler, render-complete notification)
//! - the render pass that pairs row geometry with row data
//! - scroll-source selection for small-screen/window scrolling setups
//!
//! It stays framework-agnostic (no ratatui/egui/DOM bindings): the embedding
//! layer feeds in measurements and scroll events, and draws whatever the
//! render pass hands it.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod widget;


pub use widget::{RenderCallback, ScrollCallback, ScrollSource, VirtualTable};
