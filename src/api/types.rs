//! Wire types for the trading backend.

use serde::{Deserialize, Serialize};

/// A stock the backend thinks is affordable for the requested amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub symbol: String,
    pub price: f64,
}

/// `/buy-suggestions` answers with either a list or an error object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SuggestionsPayload {
    Failed { error: String },
    Items(Vec<SuggestionItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionsRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyRequest {
    pub user_id: String,
    pub symbol: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellRequest {
    pub user_id: String,
    pub symbol: String,
    pub quantity: u32,
}

/// Outcome text for buy and sell, success or not.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A held position as reported by `/portfolio/{user}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStock {
    pub symbol: String,
    pub quantity: u32,
    #[serde(default)]
    pub buy_price: f64,
    #[serde(default)]
    pub invested: f64,
    #[serde(default)]
    pub current_value: f64,
}

/// Entry of the bare-array portfolio shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BareHolding {
    pub symbol: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

impl From<BareHolding> for PortfolioStock {
    /// The bare shape carries no market value, so the position is valued at
    /// its own price.
    fn from(h: BareHolding) -> Self {
        let value = h.price * f64::from(h.quantity);
        Self {
            symbol: h.symbol,
            quantity: h.quantity,
            buy_price: h.price,
            invested: value,
            current_value: value,
        }
    }
}

/// Both portfolio shapes the backend has been seen to return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PortfolioPayload {
    Wrapped {
        #[serde(default)]
        stocks: Vec<PortfolioStock>,
    },
    Bare(Vec<BareHolding>),
}

impl PortfolioPayload {
    pub fn into_stocks(self) -> Vec<PortfolioStock> {
        match self {
            PortfolioPayload::Wrapped { stocks } => stocks,
            PortfolioPayload::Bare(holdings) => holdings.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggestions_error_payload() {
        let p: SuggestionsPayload =
            serde_json::from_value(json!({"error": "market closed"})).unwrap();
        assert_eq!(p, SuggestionsPayload::Failed { error: "market closed".into() });
    }

    #[test]
    fn test_suggestions_ignore_server_qty() {
        let p: SuggestionsPayload = serde_json::from_value(json!([
            {"symbol": "INFY", "price": 1500.5, "qty": 6}
        ]))
        .unwrap();
        match p {
            SuggestionsPayload::Items(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].symbol, "INFY");
                assert_eq!(items[0].price, 1500.5);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_wrapped_portfolio_with_totals() {
        let p: PortfolioPayload = serde_json::from_value(json!({
            "total_invested": 200.0,
            "current_value": 210.0,
            "profit": 10.0,
            "direction": "UP",
            "stocks": [{
                "symbol": "TCS",
                "quantity": 2,
                "buy_price": 100.0,
                "current_price": 105.0,
                "invested": 200.0,
                "current_value": 210.0,
                "profit": 10.0,
                "profit_percent": 5.0
            }]
        }))
        .unwrap();
        let stocks = p.into_stocks();
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].current_value, 210.0);
    }

    #[test]
    fn test_bare_portfolio_normalized() {
        let p: PortfolioPayload = serde_json::from_value(json!([
            {"symbol": "WIPRO", "quantity": 3, "price": 40.0}
        ]))
        .unwrap();
        let stocks = p.into_stocks();
        assert_eq!(stocks[0].buy_price, 40.0);
        assert_eq!(stocks[0].invested, 120.0);
        assert_eq!(stocks[0].current_value, 120.0);
    }

    #[test]
    fn test_wrapped_without_stocks_is_empty() {
        let p: PortfolioPayload = serde_json::from_value(json!({})).unwrap();
        assert!(p.into_stocks().is_empty());
    }

    #[test]
    fn test_buy_request_body() {
        let body = serde_json::to_value(BuyRequest {
            user_id: "alice".into(),
            symbol: "HDFC".into(),
            price: 99.5,
            quantity: 1,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"user_id": "alice", "symbol": "HDFC", "price": 99.5, "quantity": 1})
        );
    }
}
