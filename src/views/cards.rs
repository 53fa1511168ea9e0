use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::{Stock, Summary};
use crate::helper::{format_market_cap, format_percent, format_volume, Sign, NOT_AVAILABLE};
use crate::ui::styles;

/// Symbol and headline value of one card
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub symbol: String,
    pub value: String,
    pub trend: Ordering,
}

impl Card {
    fn new(title: String, stock: Option<&Stock>, value: impl Fn(&Stock) -> (String, Ordering)) -> Self {
        match stock {
            Some(stock) => {
                let (value, trend) = value(stock);
                Self {
                    title,
                    symbol: stock.symbol.clone(),
                    value,
                    trend,
                }
            }
            None => Self {
                title,
                symbol: NOT_AVAILABLE.to_string(),
                value: String::new(),
                trend: Ordering::Equal,
            },
        }
    }
}

pub fn cards(summary: &Summary) -> [Card; 4] {
    let change = |s: &Stock| (format_percent(s.change_percent), s.change_percent.sign());
    [
        Card::new(t!("Cards.TopGainer"), summary.top_gainer, change),
        Card::new(t!("Cards.TopLoser"), summary.top_loser, change),
        Card::new(t!("Cards.MostActive"), summary.most_active, |s| {
            (s.volume.map(format_volume).unwrap_or_default(), Ordering::Equal)
        }),
        Card::new(t!("Cards.LargestCap"), summary.largest_cap, |s| {
            (
                s.market_cap.map(format_market_cap).unwrap_or_default(),
                Ordering::Equal,
            )
        }),
    ]
}

pub fn render(frame: &mut Frame, rect: Rect, summary: &Summary) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rect);

    for (card, area) in cards(summary).into_iter().zip(chunks.iter()) {
        let line = Line::from(vec![
            Span::styled(card.symbol, styles::text()),
            Span::raw("  "),
            Span::styled(card.value, styles::up(card.trend)),
        ]);
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(Span::styled(format!(" {} ", card.title), styles::label())),
        );
        frame.render_widget(paragraph, *area);
    }
}
