// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::forecast::{blend, forecast_dish, trailing_window};
use crate::models::Adjustment;
use crate::store::{SqliteSales, dish_id_by_name, parse_quantity};
use crate::utils::{all_dishes, maybe_print_json, parse_date, pretty_table, today_or};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("adjust", sub)) => adjust(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ForecastRow {
    pub dish: String,
    pub predicted_quantity: u32,
    pub confidence_percent: u8,
    pub wastage_percent: u8,
    pub wastage_alert: bool,
}

/// Forecasts for every dish (or just `dish`) as of `today`, ordered by dish name.
pub fn forecast_rows(
    conn: &Connection,
    dish: Option<&str>,
    today: NaiveDate,
) -> Result<Vec<ForecastRow>> {
    let source = SqliteSales::new(conn);
    let dishes: Vec<(i64, String)> = match dish {
        Some(name) => vec![(dish_id_by_name(conn, name)?, name.to_string())],
        None => all_dishes(conn)?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect(),
    };
    let mut out = Vec::with_capacity(dishes.len());
    for (id, name) in dishes {
        let f = forecast_dish(&source, id, today)?;
        out.push(ForecastRow {
            dish: name,
            predicted_quantity: f.predicted_quantity,
            confidence_percent: f.confidence_percent,
            wastage_percent: f.wastage_percent,
            wastage_alert: f.wastage_alert,
        });
    }
    Ok(out)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = today_or(sub.get_one::<String>("today"))?;
    let dish = sub.get_one::<String>("dish").map(|s| s.trim());
    let data = forecast_rows(conn, dish, today)?;

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let (start, end) = trailing_window(today);
        println!("Forecast for {} (history {} .. {})", today, start, end);
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.dish.clone(),
                    r.predicted_quantity.to_string(),
                    format!("{}%", r.confidence_percent),
                    format!("{}%", r.wastage_percent),
                    if r.wastage_alert { "⚠ high".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Dish", "Predicted", "Confidence", "Wastage", "Alert"],
                rows
            )
        );
    }
    Ok(())
}

/// Blend today's forecast for a dish with an operator estimate and keep the outcome.
pub fn adjust_dish(
    conn: &Connection,
    dish: &str,
    estimate: u32,
    today: NaiveDate,
) -> Result<(u32, u32)> {
    let dish_id = dish_id_by_name(conn, dish)?;
    let f = forecast_dish(&SqliteSales::new(conn), dish_id, today)?;
    let adjusted = blend(f.predicted_quantity, estimate);
    conn.execute(
        "INSERT INTO adjustments(dish_id, date, forecast_quantity, human_estimate, adjusted_quantity)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            dish_id,
            today.to_string(),
            f.predicted_quantity,
            estimate,
            adjusted
        ],
    )?;
    info!(
        dish,
        forecast = f.predicted_quantity,
        estimate,
        adjusted,
        "stored forecast adjustment"
    );
    Ok((f.predicted_quantity, adjusted))
}

fn adjust(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let dish = sub.get_one::<String>("dish").unwrap().trim();
    let estimate = parse_quantity("estimate", sub.get_one::<String>("estimate").unwrap())?;
    let today = today_or(sub.get_one::<String>("today"))?;
    let (forecast, adjusted) = adjust_dish(conn, dish, estimate, today)?;
    println!(
        "{} on {}: forecast {} + estimate {} -> {}",
        dish, today, forecast, estimate, adjusted
    );
    Ok(())
}

pub fn adjustments(
    conn: &Connection,
    dish: Option<&str>,
    limit: usize,
) -> Result<Vec<Adjustment>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.dish_id, a.date, a.forecast_quantity, a.human_estimate, a.adjusted_quantity
         FROM adjustments a JOIN dishes d ON a.dish_id=d.id
         WHERE ?1 IS NULL OR d.name=?1
         ORDER BY a.date DESC, a.id DESC LIMIT ?2",
    )?;
    let mut rows = stmt.query(params![dish, limit as i64])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let d: String = r.get(2)?;
        out.push(Adjustment {
            id: r.get(0)?,
            dish_id: r.get(1)?,
            date: parse_date(&d)?,
            forecast_quantity: r.get(3)?,
            human_estimate: r.get(4)?,
            adjusted_quantity: r.get(5)?,
        });
    }
    Ok(out)
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&20);
    let dish = sub.get_one::<String>("dish").map(|s| s.trim());
    let names: HashMap<i64, String> = all_dishes(conn)?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    let data = adjustments(conn, dish, limit)?
        .into_iter()
        .map(|a| {
            vec![
                a.date.to_string(),
                names.get(&a.dish_id).cloned().unwrap_or_default(),
                a.forecast_quantity.to_string(),
                a.human_estimate.to_string(),
                a.adjusted_quantity.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Dish", "Forecast", "Estimate", "Adjusted"], data)
    );
    Ok(())
}
