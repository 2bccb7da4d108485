// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("wastage", sub)) => wastage(conn, sub)?,
        Some(("daily", sub)) => daily(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct WastageRow {
    pub dish: String,
    pub sold: i64,
    pub wasted: i64,
    pub wastage_percent: i64,
    pub waste_cost: String,
}

// Half-up percentage, 0 when nothing was prepared.
fn percent(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        0
    } else {
        (200 * part + whole) / (2 * whole)
    }
}

/// Per-dish wastage between `from` and `to` inclusive, worst first.
pub fn wastage_rows(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<Vec<WastageRow>> {
    if from > to {
        bail!("Start date {} is after end date {}", from, to);
    }
    let mut stmt = conn.prepare(
        "SELECT d.name, d.price, IFNULL(SUM(s.quantity_sold),0), IFNULL(SUM(s.quantity_wasted),0)
         FROM dishes d
         JOIN sales s ON s.dish_id=d.id AND s.date>=?1 AND s.date<=?2
         GROUP BY d.id",
    )?;
    let rows = stmt.query_map(params![from.to_string(), to.to_string()], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;

    let mut data = Vec::new();
    for row in rows {
        let (dish, price_s, sold, wasted) = row?;
        let price = price_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid price '{}' for dish {}", price_s, dish))?;
        data.push(WastageRow {
            wastage_percent: percent(wasted, sold + wasted),
            waste_cost: fmt_money(&(price * Decimal::from(wasted))),
            dish,
            sold,
            wasted,
        });
    }
    data.sort_by(|a, b| {
        b.wastage_percent
            .cmp(&a.wastage_percent)
            .then_with(|| a.dish.cmp(&b.dish))
    });
    Ok(data)
}

fn wastage(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    let data = wastage_rows(conn, from, to)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.dish.clone(),
                    r.sold.to_string(),
                    r.wasted.to_string(),
                    format!("{}%", r.wastage_percent),
                    r.waste_cost.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Dish", "Sold", "Wasted", "Wastage", "Waste Cost"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct DailyRow {
    pub date: String,
    pub sold: i64,
    pub wasted: i64,
    pub revenue: String,
}

/// Totals for the `days` most recent dates that have sales, newest first.
pub fn daily_rows(conn: &Connection, days: usize) -> Result<Vec<DailyRow>> {
    let mut stmt = conn.prepare(
        "SELECT s.date, s.quantity_sold, s.quantity_wasted, d.price
         FROM sales s JOIN dishes d ON s.dish_id=d.id
         ORDER BY s.date DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;

    use std::collections::BTreeMap;
    let mut map: BTreeMap<String, (i64, i64, Decimal)> = BTreeMap::new();
    for row in rows {
        let (d, sold, wasted, price_s) = row?;
        let price = price_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid price '{}' on {}", price_s, d))?;
        let entry = map.entry(d).or_insert((0, 0, Decimal::ZERO));
        entry.0 += sold;
        entry.1 += wasted;
        entry.2 += price * Decimal::from(sold);
    }
    Ok(map
        .into_iter()
        .rev()
        .take(days)
        .map(|(date, (sold, wasted, revenue))| DailyRow {
            date,
            sold,
            wasted,
            revenue: fmt_money(&revenue),
        })
        .collect())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days: usize = *sub.get_one::<usize>("days").unwrap_or(&7);
    let data = daily_rows(conn, days)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.sold.to_string(),
                    r.wasted.to_string(),
                    r.revenue.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Sold", "Wasted", "Revenue"], rows)
        );
    }
    Ok(())
}
