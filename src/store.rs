// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Access to recorded sales.
//!
//! Forecasting only ever reads through [`SalesSource`], so callers hand in
//! whichever store they hold: the SQLite ledger in production, or
//! [`MemorySales`] in tests.

use crate::error::EntryError;
use crate::models::SalesRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::{info, warn};

pub trait SalesSource {
    /// Records for `dish_id` dated within `start..=end`, oldest first.
    fn fetch_sales_window(
        &self,
        dish_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRecord>>;
}

pub struct SqliteSales<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSales<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SalesSource for SqliteSales<'_> {
    fn fetch_sales_window(
        &self,
        dish_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT date, quantity_sold, quantity_wasted FROM sales
             WHERE dish_id=?1 AND date>=?2 AND date<=?3 ORDER BY date",
        )?;
        let mut rows = stmt
            .query(params![dish_id, start.to_string(), end.to_string()])
            .with_context(|| format!("Fetch sales for dish {} from {} to {}", dish_id, start, end))?;

        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let d: String = r.get(0)?;
            let sold: i64 = r.get(1)?;
            let wasted: i64 = r.get(2)?;
            match to_record(dish_id, &d, sold, wasted) {
                Some(rec) => out.push(rec),
                None => warn!(
                    dish_id,
                    date = %d,
                    sold,
                    wasted,
                    "skipping malformed sales row"
                ),
            }
        }
        Ok(out)
    }
}

fn to_record(dish_id: i64, date: &str, sold: i64, wasted: i64) -> Option<SalesRecord> {
    Some(SalesRecord {
        dish_id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
        quantity_sold: u32::try_from(sold).ok()?,
        quantity_wasted: u32::try_from(wasted).ok()?,
    })
}

/// In-process store, handy as a stand-in for the SQLite ledger.
#[derive(Debug, Default, Clone)]
pub struct MemorySales {
    records: Vec<SalesRecord>,
}

impl MemorySales {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, keeping one entry per (dish, date).
    pub fn insert(&mut self, rec: SalesRecord) -> bool {
        if self
            .records
            .iter()
            .any(|r| r.dish_id == rec.dish_id && r.date == rec.date)
        {
            return false;
        }
        self.records.push(rec);
        true
    }
}

impl FromIterator<SalesRecord> for MemorySales {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        let mut store = MemorySales::new();
        for rec in iter {
            store.insert(rec);
        }
        store
    }
}

impl SalesSource for MemorySales {
    fn fetch_sales_window(
        &self,
        dish_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRecord>> {
        let mut out: Vec<SalesRecord> = self
            .records
            .iter()
            .filter(|r| r.dish_id == dish_id && r.date >= start && r.date <= end)
            .copied()
            .collect();
        out.sort_by_key(|r| r.date);
        Ok(out)
    }
}

/// Parse a quantity typed by an operator or read from an import file.
pub fn parse_quantity(field: &'static str, raw: &str) -> Result<u32, EntryError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| EntryError::InvalidQuantity {
            field,
            value: raw.trim().to_string(),
        })
}

pub fn dish_id_by_name(conn: &Connection, name: &str) -> Result<i64, EntryError> {
    conn.query_row(
        "SELECT id FROM dishes WHERE name=?1",
        params![name],
        |r| r.get(0),
    )
    .map_err(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => EntryError::UnknownDish(name.to_string()),
        other => EntryError::Database(other),
    })
}

/// Insert one daily entry. Existing entries are never overwritten.
pub fn record_sale(conn: &Connection, dish: &str, rec: &SalesRecord) -> Result<(), EntryError> {
    conn.execute(
        "INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES (?1,?2,?3,?4)",
        params![
            rec.dish_id,
            rec.date.to_string(),
            rec.quantity_sold,
            rec.quantity_wasted
        ],
    )
    .map_err(|err| EntryError::from_insert(err, dish, rec.date))?;
    info!(
        dish,
        date = %rec.date,
        sold = rec.quantity_sold,
        wasted = rec.quantity_wasted,
        "recorded sales entry"
    );
    Ok(())
}
