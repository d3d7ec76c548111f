//! Console tables for decks and balances.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat};

use crate::protocol::Deck;

/// Render a raw integer amount with `decimals` fractional digits.
pub fn format_amount(raw: i64, decimals: u8) -> String {
    let sign = if raw < 0 { "-" } else { "" };
    let digits = raw.unsigned_abs().to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return format!("{sign}{digits}");
    }
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    format!("{sign}{int}.{frac}")
}

pub fn format_issue_time(issue_time: Option<i64>) -> String {
    issue_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "unconfirmed".to_string())
}

fn deck_title(deck: &Deck) -> String {
    format!("Deck id: {}", deck.asset_id)
}

/// Left-aligned columns padded to the widest cell, under a title.
fn render_table(title: &str, heading: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = heading.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&render_row(heading.iter().copied(), &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    padded.join(" | ").trim_end().to_string()
}

pub fn deck_info_table(deck: &Deck) -> String {
    render_table(
        &deck_title(deck),
        &["asset name", "issuer", "issue mode", "decimals", "issue time"],
        &[vec![
            deck.name.clone(),
            deck.issuer.clone(),
            deck.issue_mode.to_string(),
            deck.number_of_decimals.to_string(),
            format_issue_time(deck.issue_time),
        ]],
    )
}

pub fn deck_balances_table(deck: &Deck, balances: &BTreeMap<String, i64>) -> String {
    let rows: Vec<Vec<String>> = balances
        .iter()
        .map(|(address, balance)| {
            vec![
                address.clone(),
                format_amount(*balance, deck.number_of_decimals),
            ]
        })
        .collect();
    render_table(&deck_title(deck), &["address", "balance"], &rows)
}

pub fn deck_list_table(decks: &[Deck]) -> String {
    let rows: Vec<Vec<String>> = decks
        .iter()
        .map(|deck| {
            vec![
                deck.short_id().to_string(),
                deck.name.clone(),
                deck.issuer.clone(),
                deck.issue_mode.to_string(),
            ]
        })
        .collect();
    render_table("Decks", &["asset ID", "asset name", "issuer", "mode"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::sample_deck;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_amount_scales_by_decimals() {
        assert_eq!(format_amount(12345, 2), "123.45");
        assert_eq!(format_amount(5, 3), "0.005");
        assert_eq!(format_amount(100, 2), "1.00");
        assert_eq!(format_amount(7, 0), "7");
        assert_eq!(format_amount(-12345, 2), "-123.45");
        assert_eq!(format_amount(i64::MIN, 18), "-9.223372036854775808");
    }

    #[test]
    fn issue_time_renders_utc_or_unconfirmed() {
        assert_eq!(format_issue_time(Some(0)), "1970-01-01T00:00:00Z");
        assert_eq!(format_issue_time(None), "unconfirmed");
    }

    #[test]
    fn info_table_has_single_row() {
        let deck = sample_deck("abc", "gold");
        let table = deck_info_table(&deck);
        assert_eq!(
            table,
            "Deck id: abc\n\
             asset name | issuer         | issue mode | decimals | issue time\n\
             -----------+----------------+------------+----------+---------------------\n\
             gold       | mIssuerAddress | ONCE       | 2        | 2017-07-14T02:40:00Z\n"
        );
    }

    #[test]
    fn balances_table_scales_amounts() {
        let deck = sample_deck("abc", "gold");
        let mut balances = BTreeMap::new();
        balances.insert("addr1".to_string(), 12345);
        balances.insert("addr2".to_string(), -12345);
        let table = deck_balances_table(&deck, &balances);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[1], "address | balance");
        assert_eq!(lines[3], "addr1   | 123.45");
        assert_eq!(lines[4], "addr2   | -123.45");
        assert_eq!(balances.len(), 2);
    }

    #[test]
    fn list_table_truncates_asset_id() {
        let decks = vec![sample_deck(&"ab".repeat(32), "gold")];
        let table = deck_list_table(&decks);
        let row = table.lines().nth(3).unwrap();
        assert!(row.starts_with(&format!("{} | gold", "ab".repeat(10))));
        assert!(!row.contains(&"ab".repeat(11)));
        assert!(table.starts_with("Decks\nasset ID"));
    }
}
