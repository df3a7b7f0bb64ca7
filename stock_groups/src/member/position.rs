use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::GroupError;

/// Raw position entry as submitted by the client.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PositionForm {
    pub symbol: String,
    pub amount_invested: f64,
}

/// A validated position: trimmed uppercase symbol, amount rounded half-up
/// to two decimal places.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub amount_invested: Decimal,
}

/// Parse a JSON positions payload into raw entries. A payload that is not
/// a list, or an entry that is not a symbol/amount pair, is malformed.
pub fn parse_positions(raw: &serde_json::Value) -> Result<Vec<PositionForm>, GroupError> {
    let entries = raw.as_array().ok_or(GroupError::MalformedEntry)?;
    entries
        .iter()
        .map(|entry| {
            serde_json::from_value::<PositionForm>(entry.clone())
                .map_err(|_| GroupError::MalformedEntry)
        })
        .collect()
}

/// Normalize and validate submitted positions. Pure over its input.
///
/// Duplicate symbols are legal here so the same validator serves both the
/// replace-all and append call sites; the edit flow and the
/// (member_id, symbol) unique index reject duplicates where it matters.
pub fn validate(positions: &[PositionForm]) -> Result<Vec<Position>, GroupError> {
    if positions.is_empty() {
        return Err(GroupError::EmptyPositions);
    }

    let mut validated = Vec::with_capacity(positions.len());
    for pos in positions {
        let symbol = pos.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(GroupError::MissingSymbol);
        }

        let amount = pos.amount_invested;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(GroupError::InvalidAmount(symbol));
        }

        let amount = Decimal::from_f64(amount)
            .ok_or_else(|| GroupError::InvalidAmount(symbol.clone()))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        validated.push(Position {
            symbol,
            amount_invested: amount,
        });
    }

    Ok(validated)
}

pub fn parse_and_validate(raw: &serde_json::Value) -> Result<Vec<Position>, GroupError> {
    let forms = parse_positions(raw)?;
    validate(&forms)
}

pub fn has_duplicate_symbols(positions: &[Position]) -> bool {
    let mut seen = std::collections::HashSet::new();
    positions.iter().any(|p| !seen.insert(p.symbol.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use serde_json::json;

    fn form(symbol: &str, amount: f64) -> PositionForm {
        PositionForm {
            symbol: symbol.to_string(),
            amount_invested: amount,
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(validate(&[]), Err(GroupError::EmptyPositions)));
    }

    #[test]
    fn non_list_payload_is_malformed() {
        assert!(matches!(
            parse_positions(&json!({"symbol": "AAPL"})),
            Err(GroupError::MalformedEntry)
        ));
        assert!(matches!(
            parse_positions(&json!("AAPL")),
            Err(GroupError::MalformedEntry)
        ));
    }

    #[test]
    fn entry_missing_amount_is_malformed() {
        assert!(matches!(
            parse_positions(&json!([{"symbol": "AAPL"}])),
            Err(GroupError::MalformedEntry)
        ));
    }

    #[test]
    fn empty_list_payload_fails_validation_not_parsing() {
        assert!(matches!(
            parse_and_validate(&json!([])),
            Err(GroupError::EmptyPositions)
        ));
    }

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        let out = validate(&[form("  aapl ", 100.0)]).unwrap();
        assert_eq!(out[0].symbol, "AAPL");
    }

    #[test]
    fn blank_symbol_is_rejected() {
        assert!(matches!(
            validate(&[form("   ", 100.0)]),
            Err(GroupError::MissingSymbol)
        ));
    }

    #[test]
    fn non_positive_and_non_finite_amounts_are_rejected() {
        for bad in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            let result = validate(&[form("msft", bad)]);
            match result {
                Err(GroupError::InvalidAmount(symbol)) => assert_eq!(symbol, "MSFT"),
                other => panic!("expected InvalidAmount, got {:?}", other.err()),
            }
        }
    }

    #[test]
    fn amounts_round_half_up_to_two_decimals() {
        let out = validate(&[form("AAPL", 10.128), form("MSFT", 3.14159), form("TSLA", 49.999)])
            .unwrap();
        assert_eq!(out[0].amount_invested, dec!(10.13));
        assert_eq!(out[1].amount_invested, dec!(3.14));
        assert_eq!(out[2].amount_invested, dec!(50.00));
    }

    #[test]
    fn duplicates_pass_validation_but_are_detectable() {
        let out = validate(&[form("AAPL", 100.0), form("aapl", 200.0)]).unwrap();
        assert!(has_duplicate_symbols(&out));

        let distinct = validate(&[form("AAPL", 100.0), form("MSFT", 200.0)]).unwrap();
        assert!(!has_duplicate_symbols(&distinct));
    }
}
