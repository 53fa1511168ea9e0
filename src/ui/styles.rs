use std::cmp::Ordering;

use ratatui::style::{Color, Modifier, Style};

#[inline]
pub fn header() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn gray() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn brand() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

#[inline]
pub fn text_selected() -> Style {
    text().add_modifier(Modifier::REVERSED)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text()
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn border_focused() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Green for gains, red for losses
#[inline]
pub fn up(val: Ordering) -> Style {
    match val {
        Ordering::Less => Style::default().fg(Color::LightRed),
        Ordering::Equal => Style::default().fg(Color::Reset),
        Ordering::Greater => Style::default().fg(Color::LightGreen),
    }
}

#[inline]
pub fn error() -> Style {
    Style::default().fg(Color::White).bg(Color::Red)
}

pub fn online() -> Style {
    Style::default().fg(Color::Green)
}

pub fn offline() -> Style {
    Style::default().fg(Color::Red)
}

pub fn stale() -> Style {
    Style::default().fg(Color::Yellow)
}
