// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::forecast::trailing_window;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn, chrono::Local::now().date_naive())?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// `[issue, detail]` pairs for everything that looks wrong as of `today`.
pub fn diagnose(conn: &Connection, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Negative quantities slipped in before the schema checks existed
    let mut stmt = conn.prepare(
        "SELECT d.name, s.date FROM sales s JOIN dishes d ON s.dish_id=d.id
         WHERE s.quantity_sold < 0 OR s.quantity_wasted < 0 ORDER BY s.date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let dish: String = r.get(0)?;
        let date: String = r.get(1)?;
        rows.push(vec!["negative_quantity".into(), format!("{} {}", date, dish)]);
    }

    // 2) Dishes that will cold-start
    let (start, end) = trailing_window(today);
    let mut stmt2 = conn.prepare(
        "SELECT name FROM dishes d WHERE NOT EXISTS
         (SELECT 1 FROM sales s WHERE s.dish_id=d.id AND s.date>=?1 AND s.date<=?2)
         ORDER BY name",
    )?;
    let mut cur2 = stmt2.query(params![start.to_string(), end.to_string()])?;
    while let Some(r) = cur2.next()? {
        let dish: String = r.get(0)?;
        rows.push(vec!["no_recent_sales".into(), dish]);
    }

    // 3) Entries dated after today
    let mut stmt3 = conn.prepare(
        "SELECT d.name, s.date FROM sales s JOIN dishes d ON s.dish_id=d.id
         WHERE s.date > ?1 ORDER BY s.date",
    )?;
    let mut cur3 = stmt3.query(params![today.to_string()])?;
    while let Some(r) = cur3.next()? {
        let dish: String = r.get(0)?;
        let date: String = r.get(1)?;
        rows.push(vec!["future_sale".into(), format!("{} {}", date, dish)]);
    }

    Ok(rows)
}
