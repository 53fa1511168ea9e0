use std::time::Duration;

use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use time::{macros::format_description, OffsetDateTime, UtcOffset};

use crate::{data::ViewState, ui::styles};

/// What the footer reports about the active view
#[derive(Clone, Copy, Debug)]
pub struct FooterStatus<'a> {
    pub state: &'a ViewState,
    pub last_updated: Option<OffsetDateTime>,
    /// Poll period, `None` for views loaded on demand
    pub interval: Option<Duration>,
    /// Consecutive failed fetches
    pub failures: u32,
    pub stopped: bool,
}

/// Wall-clock time of an update in `offset`
pub fn clock(at: OffsetDateTime, offset: UtcOffset) -> String {
    at.to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

fn indicator(state: &ViewState, stopped: bool) -> (&'static str, Style) {
    match state {
        _ if stopped => ("□□□", styles::offline()),
        ViewState::Ready => ("■■■", styles::online()),
        ViewState::Error(_) => ("■□□", styles::stale()),
        ViewState::Loading => ("···", styles::text()),
    }
}

pub fn render(frame: &mut Frame, rect: Rect, status: &FooterStatus) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(80), Constraint::Percentage(20)])
        .split(rect);

    let dark_gray = styles::dark_gray();
    let updated = status.last_updated.map_or_else(
        || t!("Footer.NeverUpdated"),
        |at| t!("Footer.LastUpdated", time = clock(at, crate::logger::local_offset())),
    );
    let mut spans = vec![Span::styled(format!(" {updated}"), dark_gray)];
    if let Some(interval) = status.interval {
        spans.push(Span::styled("  |  ", dark_gray));
        spans.push(Span::styled(
            t!("Footer.Interval", ms = interval.as_millis().to_string()),
            dark_gray,
        ));
    }
    if status.failures > 0 {
        spans.push(Span::styled("  |  ", dark_gray));
        spans.push(Span::styled(
            t!("Footer.Failures", count = status.failures.to_string()),
            styles::stale(),
        ));
    }
    if status.stopped {
        spans.push(Span::styled("  |  ", dark_gray));
        spans.push(Span::styled(t!("Footer.Stopped"), styles::error()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let (text, style) = indicator(status.state, status.stopped);
    frame.render_widget(
        Paragraph::new(Span::styled(text, style)).alignment(Alignment::Right),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use time::{macros::datetime, UtcOffset};

    use super::{clock, indicator};
    use crate::data::ViewState;

    #[test]
    fn clock_uses_the_given_offset() {
        let at = datetime!(2024-03-01 14:05:09 UTC);
        assert_eq!(clock(at, UtcOffset::UTC), "14:05:09");
        let offset = UtcOffset::from_hms(8, 0, 0).expect("offset");
        assert_eq!(clock(at, offset), "22:05:09");
    }

    #[test]
    fn stopped_polling_overrides_state() {
        assert_eq!(indicator(&ViewState::Ready, false).0, "■■■");
        assert_eq!(indicator(&ViewState::Ready, true).0, "□□□");
        assert_eq!(indicator(&ViewState::Error("x".into()), false).0, "■□□");
    }
}
