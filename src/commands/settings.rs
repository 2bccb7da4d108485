// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{get_restaurant_name, pretty_table, set_restaurant_name};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["Restaurant".to_string(), get_restaurant_name(conn)?],
                vec!["Database".to_string(), db_path()?.display().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-name", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                bail!("Restaurant name must not be empty");
            }
            set_restaurant_name(conn, name)?;
            println!("Restaurant name set to {}", name);
        }
        _ => {}
    }
    Ok(())
}
