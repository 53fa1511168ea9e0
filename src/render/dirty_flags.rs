use bitflags::bitflags;

use crate::app::AppState;

bitflags! {
    /// Flags to track which parts of the screen need re-rendering
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        const NONE = 0;
        /// Cards, control panel and stock table
        const SCREENER = 0b0000_0010;
        /// Tickers table
        const TICKERS = 0b0000_0100;
        /// Login form
        const LOGIN = 0b0000_1000;
        /// Status, last update and interval
        const FOOTER = 0b0001_0000;
        const POPUP_HELP = 0b0010_0000;
        /// Spinner frame advanced
        const LOADING = 0b0100_0000;
        const ERROR = 0b1000_0000;
        const ALL = 0xFFFF_FFFF;
    }
}

impl DirtyFlags {
    #[inline]
    pub fn needs_render(self) -> bool {
        !self.is_empty()
    }

    /// A fetch result landed
    #[inline]
    #[must_use]
    pub fn mark_data_update(mut self) -> Self {
        self.insert(Self::SCREENER | Self::TICKERS | Self::FOOTER);
        self
    }

    /// Input handled while `state` is active
    #[inline]
    #[must_use]
    pub fn mark_input(mut self, state: AppState) -> Self {
        self.insert(match state {
            AppState::Login => Self::LOGIN,
            AppState::Screener => Self::SCREENER,
            AppState::Tickers => Self::TICKERS,
            AppState::Error => Self::ERROR,
        });
        self
    }
}

/// Tracks whether the next tick has anything to draw
#[derive(Debug)]
pub struct RenderState {
    dirty: DirtyFlags,
    render_count: u64,
    skip_count: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            dirty: DirtyFlags::NONE,
            render_count: 0,
            skip_count: 0,
        }
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.dirty.needs_render()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// Clear all dirty flags after a frame was drawn
    #[inline]
    pub fn clear(&mut self) {
        self.dirty = DirtyFlags::NONE;
        self.render_count += 1;
    }

    #[inline]
    pub fn skip(&mut self) {
        self.skip_count += 1;
    }

    /// Percentage of ticks that drew nothing
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self) -> f64 {
        let total = self.render_count + self.skip_count;
        if total == 0 {
            0.0
        } else {
            (self.skip_count as f64 / total as f64) * 100.0
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "renders: {}, skipped: {}, skip rate: {:.1}%",
            self.render_count,
            self.skip_count,
            self.efficiency()
        )
    }
}
