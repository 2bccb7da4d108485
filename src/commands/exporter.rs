// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sales", sub)) => export_sales(conn, sub),
        _ => Ok(()),
    }
}

fn export_sales(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut stmt = conn.prepare(
        "SELECT s.date, d.name, s.quantity_sold, s.quantity_wasted
         FROM sales s JOIN dishes d ON s.dish_id=d.id
         ORDER BY s.date, d.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["date", "dish", "sold", "wasted"])?;
        for row in rows {
            let (d, dish, sold, wasted) = row?;
            wtr.write_record([d, dish, sold.to_string(), wasted.to_string()])?;
        }
        wtr.flush()?;
    } else {
        let mut items = Vec::new();
        for row in rows {
            let (d, dish, sold, wasted) = row?;
            items.push(json!({
                "date": d, "dish": dish, "sold": sold, "wasted": wasted
            }));
        }
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    tracing::info!(out, format = %fmt, "exported sales");
    println!("Exported sales to {}", out);
    Ok(())
}
