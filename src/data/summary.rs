use super::Stock;

/// Headline records for the dashboard cards
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary<'a> {
    pub top_gainer: Option<&'a Stock>,
    pub top_loser: Option<&'a Stock>,
    pub most_active: Option<&'a Stock>,
    pub largest_cap: Option<&'a Stock>,
}

// `Iterator::max_by_key` keeps the last of equal elements, ties here keep the first.
fn first_best<'a, K: Ord>(
    stocks: &'a [Stock],
    key: impl Fn(&Stock) -> Option<K>,
    better: fn(&K, &K) -> bool,
) -> Option<&'a Stock> {
    let mut best: Option<(&Stock, K)> = None;
    for stock in stocks {
        let Some(value) = key(stock) else {
            continue;
        };
        let replace = best
            .as_ref()
            .map_or(true, |(_, current)| better(&value, current));
        if replace {
            best = Some((stock, value));
        }
    }
    best.map(|(stock, _)| stock)
}

pub fn summarize(stocks: &[Stock]) -> Summary<'_> {
    Summary {
        top_gainer: first_best(stocks, |s| Some(s.change_percent), |a, b| a > b),
        top_loser: first_best(stocks, |s| Some(s.change_percent), |a, b| a < b),
        most_active: first_best(stocks, |s| s.volume, |a, b| a > b),
        largest_cap: first_best(stocks, |s| s.market_cap, |a, b| a > b),
    }
}
