use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::{app::AppState, data::User, ui::styles};

pub fn render(frame: &mut Frame, rect: Rect, state: AppState, user: Option<&User>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Percentage(45),
            Constraint::Min(0),
        ])
        .split(rect);

    frame.render_widget(
        Paragraph::new(Span::styled(" TickerMind ", styles::brand())),
        chunks[0],
    );

    let tabs = vec![
        Line::from(format!(" {} [1] ", t!("Tabs.Screener"))),
        Line::from(format!(" {} [2] ", t!("Tabs.Tickers"))),
    ];
    let tabs = Tabs::new(tabs)
        .style(styles::text())
        .highlight_style(styles::text_selected())
        .divider("|")
        .select(match state {
            AppState::Tickers => 1,
            _ => 0,
        });
    frame.render_widget(tabs, chunks[1]);

    let dark_gray_style = styles::dark_gray();
    let mut spans = Vec::with_capacity(8);
    if let Some(user) = user {
        spans.push(Span::styled(
            t!("Welcome, %{name}", name = user.display_name()),
            dark_gray_style,
        ));
        spans.push(Span::styled(" | ", dark_gray_style));
    }
    spans.extend([
        Span::styled(t!("Keyboard.Help"), dark_gray_style),
        Span::raw(" "),
        Span::styled(t!("Keyboard.Logout"), dark_gray_style),
        Span::raw(" "),
        Span::styled(t!("Keyboard.Quit"), dark_gray_style),
    ]);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        chunks[2],
    );
}
