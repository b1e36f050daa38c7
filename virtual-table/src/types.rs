/// Viewport geometry reported by the embedding layer.
///
/// `width` comes from the measurement wrapper; `height` from the scroll
/// container (window or content body).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive range of row indices.
///
/// Empty windows are represented as `Option::<RowRange>::None` by the engine,
/// so a constructed range always satisfies `start <= stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start: usize,
    /// Inclusive.
    pub stop: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start).saturating_add(1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.stop
    }

    /// Iterates the indices in the range, ascending.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        self.start..=self.stop
    }
}

/// Geometry of one row slot in the scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSlot {
    pub index: usize,
    /// Absolute top offset in the scroll container (includes `scroll_margin`
    /// and the header band).
    pub top: u64,
    pub height: u32,
}

impl RowSlot {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}
