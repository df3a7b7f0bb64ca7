use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::market::model::Quote;
use crate::member::position::Position;

/// Investment-weighted average of each held symbol's daily percent change.
///
/// The system only knows dollars invested, never share counts, so today's
/// gain is approximated as sum over positions of
/// (amount / totalInvested) * dp. Symbols without usable market data
/// contribute zero; this function never fails.
pub fn compute_today_gain(
    positions: &[Position],
    total_invested: Decimal,
    quotes: &HashMap<String, Quote>,
) -> f64 {
    let total = match total_invested.to_f64() {
        Some(total) if total > 0.0 => total,
        _ => return 0.0,
    };

    let mut total_weighted_return = 0.0;
    for position in positions {
        let Some(quote) = quotes.get(&position.symbol) else {
            continue;
        };
        let Some(percent_change) = quote.percent_change else {
            continue;
        };
        let weight = position.amount_invested.to_f64().unwrap_or(0.0) / total;
        total_weighted_return += weight * (percent_change / 100.0);
    }

    total_weighted_return * 100.0
}

/// Gains are carried as f64 internally and rounded only at the response
/// boundary.
pub fn round_gain(gain: f64) -> f64 {
    (gain * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn position(symbol: &str, amount: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            amount_invested: amount,
        }
    }

    fn quote(dp: Option<f64>) -> Quote {
        Quote {
            last_price: Some(100.0),
            percent_change: dp,
        }
    }

    #[test]
    fn weights_each_symbol_by_invested_amount() {
        let positions = vec![position("AAA", dec!(600)), position("BBB", dec!(400))];
        let mut quotes = HashMap::new();
        quotes.insert("AAA".to_string(), quote(Some(10.0)));
        quotes.insert("BBB".to_string(), quote(Some(-5.0)));

        let gain = compute_today_gain(&positions, dec!(1000), &quotes);
        assert!((gain - 4.0).abs() < 1e-9, "gain was {gain}");
    }

    #[test]
    fn zero_total_invested_returns_zero() {
        let positions = vec![position("AAA", dec!(0))];
        let mut quotes = HashMap::new();
        quotes.insert("AAA".to_string(), quote(Some(10.0)));

        assert_eq!(compute_today_gain(&positions, dec!(0), &quotes), 0.0);
    }

    #[test]
    fn missing_symbols_contribute_zero() {
        let positions = vec![position("AAA", dec!(500)), position("BBB", dec!(500))];
        let mut quotes = HashMap::new();
        quotes.insert("AAA".to_string(), quote(Some(8.0)));

        let gain = compute_today_gain(&positions, dec!(1000), &quotes);
        assert!((gain - 4.0).abs() < 1e-9, "gain was {gain}");
    }

    #[test]
    fn quotes_without_percent_change_contribute_zero() {
        let positions = vec![position("AAA", dec!(500)), position("BBB", dec!(500))];
        let mut quotes = HashMap::new();
        quotes.insert("AAA".to_string(), quote(Some(8.0)));
        quotes.insert("BBB".to_string(), quote(None));

        let gain = compute_today_gain(&positions, dec!(1000), &quotes);
        assert!((gain - 4.0).abs() < 1e-9, "gain was {gain}");
    }

    #[test]
    fn empty_quote_map_means_flat_gain() {
        let positions = vec![position("AAA", dec!(750))];
        let gain = compute_today_gain(&positions, dec!(750), &HashMap::new());
        assert_eq!(gain, 0.0);
    }

    #[test]
    fn rounds_at_the_boundary() {
        assert_eq!(round_gain(4.005001), 4.01);
        assert_eq!(round_gain(-1.234), -1.23);
        assert_eq!(round_gain(0.0), 0.0);
    }
}
