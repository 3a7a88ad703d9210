//! Display data for the pages. Everything here is pure: backend payloads in,
//! view-models out. The Dioxus components only lay these out.

use crate::api::{PortfolioStock, SuggestionItem};
use crate::config::{BuyLayout, SellLayout};

pub const EMPTY_SUGGESTIONS: &str = "No stocks found for this amount";
pub const EMPTY_PORTFOLIO: &str = "No stocks to sell";
pub const EMPTY_HOLDINGS: &str = "You do not own any stocks yet";

/// Rupee amount with two decimals, e.g. `₹12.50`.
pub fn money(value: f64) -> String {
    format!("₹{value:.2}")
}

/// A buy suggestion with the number of shares the amount can cover.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyPick {
    pub symbol: String,
    pub price: f64,
    pub qty: u64,
}

impl BuyPick {
    pub fn price_label(&self) -> String {
        format!("₹{}", self.price)
    }
}

/// Shares of `price` affordable with `amount`, rounded down.
pub fn affordable_qty(amount: f64, price: f64) -> u64 {
    if price <= 0.0 || !price.is_finite() || amount <= 0.0 {
        return 0;
    }
    (amount / price).floor() as u64
}

/// Attach affordable quantities and sort by them, largest first. Ties keep
/// the backend's order.
pub fn rank_suggestions(amount: f64, items: Vec<SuggestionItem>) -> Vec<BuyPick> {
    let mut picks: Vec<BuyPick> = items
        .into_iter()
        .map(|s| BuyPick {
            qty: affordable_qty(amount, s.price),
            symbol: s.symbol,
            price: s.price,
        })
        .collect();
    picks.sort_by(|a, b| b.qty.cmp(&a.qty));
    picks
}

/// Split a ranked list into the first `n` and the rest.
pub fn split_top<T>(mut ranked: Vec<T>, n: usize) -> (Vec<T>, Vec<T>) {
    let rest = ranked.split_off(n.min(ranked.len()));
    (ranked, rest)
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuyView {
    /// `{error}` returned by the backend, shown inline.
    Error(String),
    Empty,
    Split {
        top_picks: Vec<BuyPick>,
        suggestions: Vec<BuyPick>,
    },
    Flat(Vec<BuyPick>),
}

impl BuyView {
    pub fn build(amount: f64, items: Vec<SuggestionItem>, layout: BuyLayout, top_n: usize) -> Self {
        if items.is_empty() {
            return BuyView::Empty;
        }
        let ranked = rank_suggestions(amount, items);
        match layout {
            BuyLayout::Split => {
                let (top_picks, suggestions) = split_top(ranked, top_n);
                BuyView::Split {
                    top_picks,
                    suggestions,
                }
            }
            BuyLayout::Flat => BuyView::Flat(ranked),
        }
    }
}

/// Clamp a sell quantity to `[1, owned]`.
pub fn clamp_quantity(requested: u32, owned: u32) -> u32 {
    requested.min(owned).max(1)
}

/// Leading integer of `input`, the way a browser's `parseInt` reads it:
/// optional sign, then digits, ignoring whatever follows (`"2.5"` is 2,
/// `"3abc"` is 3). `None` when there are no leading digits.
pub fn leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Read a quantity input field and clamp it to `[1, owned]`. Input with no
/// leading digits selects a single share.
pub fn parse_quantity(input: &str, owned: u32) -> u32 {
    let requested = leading_int(input).unwrap_or(1);
    let requested = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
    clamp_quantity(requested, owned)
}

/// A holding with its derived profit figures.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingCard {
    pub symbol: String,
    pub quantity: u32,
    pub buy_price: f64,
    pub invested: f64,
    pub current_value: f64,
    pub profit: f64,
}

impl HoldingCard {
    pub fn from_stock(s: &PortfolioStock) -> Self {
        Self {
            symbol: s.symbol.clone(),
            quantity: s.quantity,
            buy_price: s.buy_price,
            invested: s.invested,
            current_value: s.current_value,
            profit: s.current_value - s.invested,
        }
    }

    /// Market price per share.
    pub fn current_price(&self) -> f64 {
        if self.quantity == 0 {
            return 0.0;
        }
        self.current_value / f64::from(self.quantity)
    }

    pub fn profit_percent(&self) -> f64 {
        if self.invested == 0.0 {
            return 0.0;
        }
        self.profit * 100.0 / self.invested
    }

    /// Bounds of the sell quantity selector, `(min, max)`.
    pub fn sell_bounds(&self) -> (u32, u32) {
        (1, self.quantity.max(1))
    }

    pub fn default_sell_quantity(&self) -> u32 {
        clamp_quantity(1, self.quantity)
    }

    pub fn buy_price_label(&self) -> String {
        format!("₹{}", self.buy_price)
    }
}

/// Holdings sorted by profit, largest first.
pub fn rank_holdings(stocks: &[PortfolioStock]) -> Vec<HoldingCard> {
    let mut cards: Vec<HoldingCard> = stocks.iter().map(HoldingCard::from_stock).collect();
    cards.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    cards
}

#[derive(Debug, Clone, PartialEq)]
pub enum SellView {
    /// Nothing held. The layout decides whether the empty page shows both
    /// regions or a single line.
    Empty(SellLayout),
    Ranked {
        top_picks: Vec<HoldingCard>,
        portfolio: Vec<HoldingCard>,
    },
    Flat(Vec<HoldingCard>),
}

impl SellView {
    pub fn build(stocks: &[PortfolioStock], layout: SellLayout, top_n: usize) -> Self {
        if stocks.is_empty() {
            return SellView::Empty(layout);
        }
        match layout {
            SellLayout::Ranked => {
                let (top_picks, portfolio) = split_top(rank_holdings(stocks), top_n);
                SellView::Ranked {
                    top_picks,
                    portfolio,
                }
            }
            SellLayout::Flat => {
                SellView::Flat(stocks.iter().map(HoldingCard::from_stock).collect())
            }
        }
    }

    /// Shares owned of `symbol`, if it is on screen.
    pub fn owned(&self, symbol: &str) -> Option<u32> {
        let find = |cards: &[HoldingCard]| {
            cards
                .iter()
                .find(|c| c.symbol == symbol)
                .map(|c| c.quantity)
        };
        match self {
            SellView::Empty(_) => None,
            SellView::Ranked {
                top_picks,
                portfolio,
            } => find(top_picks).or_else(|| find(portfolio)),
            SellView::Flat(cards) => find(cards),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(profit: f64) -> Self {
        if profit >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub invested: f64,
    pub current: f64,
    pub profit: f64,
    pub direction: Direction,
}

impl PortfolioSummary {
    pub fn from_stocks(stocks: &[PortfolioStock]) -> Self {
        let invested: f64 = stocks.iter().map(|s| s.invested).sum();
        let current: f64 = stocks.iter().map(|s| s.current_value).sum();
        let profit = current - invested;
        Self {
            invested,
            current,
            profit,
            direction: Direction::of(profit),
        }
    }
}

/// Read-only profile page: totals plus one card per holding, in backend order.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView {
    pub summary: PortfolioSummary,
    pub cards: Vec<HoldingCard>,
}

impl PortfolioView {
    pub fn build(stocks: &[PortfolioStock]) -> Self {
        Self {
            summary: PortfolioSummary::from_stocks(stocks),
            cards: stocks.iter().map(HoldingCard::from_stock).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(symbol: &str, price: f64) -> SuggestionItem {
        SuggestionItem {
            symbol: symbol.to_string(),
            price,
        }
    }

    fn stock(symbol: &str, quantity: u32, invested: f64, current_value: f64) -> PortfolioStock {
        PortfolioStock {
            symbol: symbol.to_string(),
            quantity,
            buy_price: invested / f64::from(quantity.max(1)),
            invested,
            current_value,
        }
    }

    #[test]
    fn test_rank_by_affordable_quantity() {
        let view = BuyView::build(
            100.0,
            vec![item("A", 50.0), item("B", 30.0)],
            BuyLayout::Split,
            2,
        );
        match view {
            BuyView::Split {
                top_picks,
                suggestions,
            } => {
                let symbols: Vec<_> = top_picks.iter().map(|p| p.symbol.as_str()).collect();
                assert_eq!(symbols, ["B", "A"]);
                assert_eq!(top_picks[0].qty, 3);
                assert_eq!(top_picks[1].qty, 2);
                assert!(suggestions.is_empty());
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_split_overflow_goes_to_suggestions() {
        let view = BuyView::build(
            100.0,
            vec![item("A", 60.0), item("B", 10.0), item("C", 25.0), item("D", 40.0)],
            BuyLayout::Split,
            2,
        );
        let BuyView::Split {
            top_picks,
            suggestions,
        } = view
        else {
            panic!("expected split view");
        };
        assert_eq!(top_picks.iter().map(|p| p.qty).collect::<Vec<_>>(), [10, 4]);
        assert_eq!(
            suggestions.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>(),
            ["D", "A"]
        );
    }

    #[test]
    fn test_ties_keep_backend_order() {
        let ranked = rank_suggestions(90.0, vec![item("X", 45.0), item("Y", 40.0), item("Z", 30.0)]);
        let symbols: Vec<_> = ranked.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, ["Z", "X", "Y"]);
    }

    #[test]
    fn test_flat_layout_keeps_everything() {
        let view = BuyView::build(
            100.0,
            vec![item("A", 50.0), item("B", 30.0), item("C", 5.0)],
            BuyLayout::Flat,
            2,
        );
        let BuyView::Flat(all) = view else {
            panic!("expected flat view");
        };
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].symbol, "C");
    }

    #[test]
    fn test_empty_suggestions() {
        assert_eq!(BuyView::build(100.0, vec![], BuyLayout::Split, 2), BuyView::Empty);
    }

    #[test]
    fn test_affordable_qty_edges() {
        assert_eq!(affordable_qty(100.0, 0.0), 0);
        assert_eq!(affordable_qty(100.0, -5.0), 0);
        assert_eq!(affordable_qty(99.99, 100.0), 0);
        assert_eq!(affordable_qty(100.0, 33.3), 3);
    }

    #[test]
    fn test_price_label_matches_raw_number() {
        let pick = BuyPick {
            symbol: "A".into(),
            price: 50.0,
            qty: 2,
        };
        assert_eq!(pick.price_label(), "₹50");
        assert_eq!(money(12.5), "₹12.50");
    }

    #[test]
    fn test_quantity_clamping() {
        assert_eq!(clamp_quantity(0, 5), 1);
        assert_eq!(clamp_quantity(3, 5), 3);
        assert_eq!(clamp_quantity(9, 5), 5);
        assert_eq!(parse_quantity("", 5), 1);
        assert_eq!(parse_quantity("abc", 5), 1);
        assert_eq!(parse_quantity("-4", 5), 1);
        assert_eq!(parse_quantity(" 4 ", 5), 4);
        assert_eq!(parse_quantity("40", 5), 5);
        assert_eq!(parse_quantity("2.5", 5), 2);
        assert_eq!(parse_quantity("3abc", 5), 3);
        assert_eq!(parse_quantity("+4", 5), 4);
        assert_eq!(parse_quantity("0.9", 5), 1);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("  12 shares"), Some(12));
        assert_eq!(leading_int("-7"), Some(-7));
        assert_eq!(leading_int("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(leading_int(".5"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_sell_view_ranks_by_profit() {
        let stocks = vec![
            stock("LOSS", 2, 100.0, 80.0),
            stock("WIN", 4, 50.0, 70.0),
            stock("FLAT", 1, 10.0, 10.0),
        ];
        let SellView::Ranked {
            top_picks,
            portfolio,
        } = SellView::build(&stocks, SellLayout::Ranked, 2)
        else {
            panic!("expected ranked view");
        };
        assert_eq!(top_picks[0].symbol, "WIN");
        assert_eq!(top_picks[0].profit, 20.0);
        assert_eq!(top_picks[1].symbol, "FLAT");
        assert_eq!(portfolio[0].symbol, "LOSS");
        assert_eq!(portfolio[0].current_price(), 40.0);
        assert_eq!(top_picks[0].sell_bounds(), (1, 4));
        assert_eq!(top_picks[0].default_sell_quantity(), 1);
    }

    #[test]
    fn test_sell_view_empty_and_owned() {
        assert_eq!(
            SellView::build(&[], SellLayout::Ranked, 2),
            SellView::Empty(SellLayout::Ranked)
        );
        assert_eq!(
            SellView::build(&[], SellLayout::Flat, 2),
            SellView::Empty(SellLayout::Flat)
        );
        assert_eq!(SellView::Empty(SellLayout::Flat).owned("X"), None);

        let stocks = vec![stock("A", 3, 30.0, 30.0)];
        let view = SellView::build(&stocks, SellLayout::Flat, 2);
        assert_eq!(view.owned("A"), Some(3));
        assert_eq!(view.owned("B"), None);
    }

    #[test]
    fn test_summary_break_even_points_up() {
        let stocks = vec![stock("A", 1, 100.0, 80.0), stock("B", 1, 50.0, 70.0)];
        let summary = PortfolioSummary::from_stocks(&stocks);
        assert_eq!(summary.invested, 150.0);
        assert_eq!(summary.current, 150.0);
        assert_eq!(summary.profit, 0.0);
        assert_eq!(summary.direction, Direction::Up);
        assert_eq!(summary.direction.arrow(), "↑");
    }

    #[test]
    fn test_summary_loss_points_down() {
        let view = PortfolioView::build(&[stock("A", 2, 100.0, 90.0)]);
        assert_eq!(view.summary.direction.arrow(), "↓");
        assert_eq!(view.cards[0].profit_percent(), -10.0);
        assert_eq!(money(view.summary.profit), "₹-10.00");
    }

    #[test]
    fn test_zero_quantity_and_invested_do_not_divide() {
        let card = HoldingCard::from_stock(&stock("Z", 0, 0.0, 0.0));
        assert_eq!(card.current_price(), 0.0);
        assert_eq!(card.profit_percent(), 0.0);
        assert_eq!(card.sell_bounds(), (1, 1));
    }
}
