// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{all_dishes, fmt_money, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                bail!("Dish name must not be empty");
            }
            let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
            if price.is_sign_negative() {
                bail!("Price must not be negative, got {}", price);
            }
            conn.execute(
                "INSERT INTO dishes(name, price) VALUES (?1, ?2)",
                params![name, price.to_string()],
            )?;
            info!(dish = name, %price, "added dish");
            println!("Added dish '{}' ({})", name, fmt_money(&price));
        }
        Some(("list", _)) => {
            let data = all_dishes(conn)?
                .into_iter()
                .map(|d| {
                    let price = fmt_money(&d.price);
                    vec![d.name, price]
                })
                .collect();
            println!("{}", pretty_table(&["Dish", "Price"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let n = conn.execute("DELETE FROM dishes WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Dish '{}' not found", name);
            }
            info!(dish = name, "removed dish");
            println!("Removed dish '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
