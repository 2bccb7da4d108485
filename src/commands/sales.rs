// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::SalesRecord;
use crate::store::{dish_id_by_name, parse_quantity, record_sale};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("record", sub)) => record(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn record(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let dish = sub.get_one::<String>("dish").unwrap().trim();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let sold = parse_quantity("sold", sub.get_one::<String>("sold").unwrap())?;
    let wasted = parse_quantity("wasted", sub.get_one::<String>("wasted").unwrap())?;
    let dish_id = dish_id_by_name(conn, dish)?;

    let rec = SalesRecord {
        dish_id,
        quantity_sold: sold,
        quantity_wasted: wasted,
        date,
    };
    record_sale(conn, dish, &rec)?;
    println!(
        "Recorded {} sold / {} wasted of '{}' on {}",
        sold, wasted, dish, date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.dish.clone(),
                    r.sold.to_string(),
                    r.wasted.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Dish", "Sold", "Wasted"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SalesRow {
    pub date: String,
    pub dish: String,
    pub sold: i64,
    pub wasted: i64,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<SalesRow>> {
    let mut sql = String::from(
        "SELECT s.date, d.name, s.quantity_sold, s.quantity_wasted FROM sales s JOIN dishes d ON s.dish_id=d.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(dish) = sub.get_one::<String>("dish") {
        sql.push_str(" AND d.name=?");
        params_vec.push(dish.trim().into());
    }
    if let Some(from) = sub.get_one::<String>("from") {
        sql.push_str(" AND s.date>=?");
        params_vec.push(parse_date(from)?.to_string());
    }
    if let Some(to) = sub.get_one::<String>("to") {
        sql.push_str(" AND s.date<=?");
        params_vec.push(parse_date(to)?.to_string());
    }
    sql.push_str(" ORDER BY s.date DESC, d.name");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(SalesRow {
            date: r.get(0)?,
            dish: r.get(1)?,
            sold: r.get(2)?,
            wasted: r.get(3)?,
        });
    }
    Ok(data)
}
