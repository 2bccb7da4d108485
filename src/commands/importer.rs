// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::SalesRecord;
use crate::store::{dish_id_by_name, parse_quantity, record_sale};
use crate::utils::parse_date;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sales", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_sales(conn, path)?;
            println!("Imported {} sales entries from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Load `date,dish,sold,wasted` rows in one transaction; any bad row aborts the whole file.
pub fn import_sales(conn: &mut Connection, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut dish_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result.with_context(|| format!("Read line {} of {}", line, path))?;
        let date_raw = rec.get(0).context("date missing")?;
        let dish = rec.get(1).context("dish missing")?.to_string();
        let sold_raw = rec.get(2).context("sold missing")?;
        let wasted_raw = rec.get(3).unwrap_or("");

        let date = parse_date(date_raw).with_context(|| format!("Line {}", line))?;
        let sold = parse_quantity("sold", sold_raw).with_context(|| format!("Line {}", line))?;
        let wasted = if wasted_raw.is_empty() {
            0
        } else {
            parse_quantity("wasted", wasted_raw).with_context(|| format!("Line {}", line))?
        };

        let dish_id = match dish_cache.entry(dish.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let fetched = dish_id_by_name(&tx, &dish).with_context(|| format!("Line {}", line))?;
                *entry.insert(fetched)
            }
        };

        record_sale(
            &tx,
            &dish,
            &SalesRecord {
                dish_id,
                quantity_sold: sold,
                quantity_wasted: wasted,
                date,
            },
        )
        .with_context(|| format!("Line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    info!(path, count, "imported sales");
    Ok(count)
}
