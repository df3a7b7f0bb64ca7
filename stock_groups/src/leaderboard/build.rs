use std::collections::{BTreeSet, HashMap};

use crate::group::model::Group;
use crate::market::model::Quote;
use crate::member::model::MemberWithPositions;

use super::gain::{compute_today_gain, round_gain};
use super::model::{Leaderboard, LeaderboardRow};

/// Union of symbols held across the group, for one batched market-data
/// lookup instead of a round trip per member.
pub fn symbol_union(members: &[MemberWithPositions]) -> Vec<String> {
    let mut symbols = BTreeSet::new();
    for member in members {
        for position in &member.positions {
            symbols.insert(position.symbol.clone());
        }
    }
    symbols.into_iter().collect()
}

/// Rank members by today's gain from a single market-data snapshot.
/// The sort is stable, so tied members keep their fetch order.
pub fn build(
    group: &Group,
    members: Vec<MemberWithPositions>,
    quotes: &HashMap<String, Quote>,
) -> Leaderboard {
    let mut rows: Vec<LeaderboardRow> = members
        .into_iter()
        .map(|entry| {
            let total_invested = entry.total_invested();
            let MemberWithPositions { member, positions } = entry;
            let today_gain = round_gain(compute_today_gain(&positions, total_invested, quotes));
            LeaderboardRow {
                rank: 0,
                member_id: member.member_id,
                group_id: member.group_id,
                user_id: member.user_id,
                username: member.username,
                positions,
                total_invested,
                today_gain,
                joined_at: member.joined_at,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.today_gain
            .partial_cmp(&a.today_gain)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }

    Leaderboard {
        group: group.into(),
        members: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::model::Member;
    use crate::member::position::Position;
    use chrono::Utc;
    use rust_decimal::dec;
    use rust_decimal::Decimal;

    fn group() -> Group {
        Group {
            group_id: 7,
            name: "Alpha Club".to_string(),
            invite_code: "A1B2C3D4".to_string(),
            creator_id: "u-1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn member(member_id: i32, username: &str, symbol: &str, amount: Decimal) -> MemberWithPositions {
        MemberWithPositions {
            member: Member {
                member_id,
                group_id: 7,
                user_id: format!("u-{member_id}"),
                username: username.to_string(),
                joined_at: Utc::now(),
            },
            positions: vec![Position {
                symbol: symbol.to_string(),
                amount_invested: amount,
            }],
        }
    }

    fn quotes(entries: &[(&str, f64)]) -> HashMap<String, Quote> {
        entries
            .iter()
            .map(|(symbol, dp)| {
                (
                    symbol.to_string(),
                    Quote {
                        last_price: Some(100.0),
                        percent_change: Some(*dp),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn sorts_descending_and_keeps_tied_fetch_order() {
        let members = vec![
            member(1, "carol", "AAA", dec!(1000)),
            member(2, "alice", "BBB", dec!(1000)),
            member(3, "bob", "CCC", dec!(1000)),
        ];
        let quotes = quotes(&[("AAA", -1.2), ("BBB", 4.0), ("CCC", 4.0)]);

        let board = build(&group(), members, &quotes);
        let usernames: Vec<&str> = board.members.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(usernames, vec!["alice", "bob", "carol"]);
        assert_eq!(
            board.members.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(board.members[2].today_gain, -1.2);
    }

    #[test]
    fn carries_group_info_and_totals() {
        let mut entry = member(1, "alice", "AAA", dec!(600));
        entry.positions.push(Position {
            symbol: "BBB".to_string(),
            amount_invested: dec!(400),
        });
        let quotes = quotes(&[("AAA", 10.0), ("BBB", -5.0)]);

        let board = build(&group(), vec![entry], &quotes);
        assert_eq!(board.group.invite_code, "A1B2C3D4");
        assert_eq!(board.members[0].total_invested, dec!(1000));
        assert_eq!(board.members[0].today_gain, 4.0);
    }

    #[test]
    fn members_without_market_data_rank_last_at_zero() {
        let members = vec![
            member(1, "alice", "AAA", dec!(100)),
            member(2, "bob", "ZZZ", dec!(100)),
        ];
        let quotes = quotes(&[("AAA", 2.5)]);

        let board = build(&group(), members, &quotes);
        assert_eq!(board.members[0].username, "alice");
        assert_eq!(board.members[1].today_gain, 0.0);
    }

    #[test]
    fn symbol_union_dedupes_across_members() {
        let members = vec![
            member(1, "alice", "AAA", dec!(100)),
            member(2, "bob", "AAA", dec!(100)),
            member(3, "carol", "BBB", dec!(100)),
        ];
        assert_eq!(symbol_union(&members), vec!["AAA", "BBB"]);
    }
}
