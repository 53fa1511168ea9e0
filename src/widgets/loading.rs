use std::sync::atomic::{AtomicU8, Ordering};

use bevy_ecs::system::Resource;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

const FRAMES: [&str; 6] = ["◰   ", "◳.  ", "◲.. ", "◲...", "◱ ..", "◱  ."];

/// Spinner frame counter, advanced once per drawn frame
#[derive(Debug, Default, Resource)]
pub struct Loading {
    index: AtomicU8,
}

#[derive(Clone, Debug)]
pub struct LoadingWidget {
    frame: &'static str,
    label: String,
}

impl LoadingWidget {
    pub fn new(loading: &Loading, label: String) -> Self {
        let index = loading.index.fetch_add(1, Ordering::Relaxed);
        Self {
            frame: FRAMES[usize::from(index) % FRAMES.len()],
            label,
        }
    }
}

impl Widget for LoadingWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = format!("{} {}", self.frame, self.label);
        let width = u16::try_from(crate::ui::text::width(&text)).unwrap_or(area.width);
        let area = crate::ui::rect::centered(width, 1, area);
        Paragraph::new(text).render(area, buf);
    }
}
