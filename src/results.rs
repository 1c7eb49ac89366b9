use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::AnyPool;

use crate::db::models::StoredRow;
use crate::db::reader::fetch_rows;
use crate::error::Result;
use crate::types::{CardKey, GroupedCard, GroupedResult};

/// Full history as grouped cards, in the order the store returned the rows.
pub async fn grouped_results(pool: &AnyPool) -> Result<Vec<GroupedCard>> {
    let rows = fetch_rows(pool).await?;
    Ok(group_rows(rows))
}

/// Fold rows into one card per (title, time). Cards come out in first-seen
/// order and each card's results keep the row order.
pub fn group_rows(rows: Vec<StoredRow>) -> Vec<GroupedCard> {
    let mut index: HashMap<CardKey, usize> = HashMap::new();
    let mut cards: Vec<GroupedCard> = Vec::new();

    for row in rows {
        let key = CardKey {
            title: row.title.clone(),
            time: row.time.clone(),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            cards.push(GroupedCard {
                title: row.title.clone(),
                time: row.time.clone(),
                day: format_day(&row.inserted_at),
                results: Vec::new(),
            });
            cards.len() - 1
        });

        cards[slot].results.push(GroupedResult {
            prize: row.prize,
            result: row.result,
            group: row.group,
        });
    }

    cards
}

/// `2026-10-17 09:30:00` → `17/10/2026`. Unparseable input is passed through.
pub fn format_day(raw: &str) -> String {
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
