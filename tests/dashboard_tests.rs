// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kitchencast::commands::{doctor, forecast, settings};
use kitchencast::{cli, db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO dishes(id, name, price) VALUES (1, 'Pasta', '12'), (2, 'Salad', '8'), (3, 'Soup', '5');
        INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES
            (1, '2025-03-09', 20, 0),
            (1, '2025-03-03', 24, 4),
            (1, '2025-03-10', 90, 0),
            (2, '2025-03-08', 10, 5),
            (3, '2025-02-20', 30, 0);
        "#,
    )
    .unwrap();
    conn
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test]
fn forecast_rows_cover_every_dish() {
    let conn = setup();
    let rows = forecast::forecast_rows(&conn, None, today()).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.dish.as_str()).collect();
    assert_eq!(names, vec!["Pasta", "Salad", "Soup"]);

    assert_eq!(rows[0].predicted_quantity, 22);
    assert_eq!(rows[0].confidence_percent, 40);
    assert!(!rows[0].wastage_alert);

    // 5 of 15 wasted
    assert_eq!(rows[1].predicted_quantity, 10);
    assert_eq!(rows[1].wastage_percent, 33);
    assert!(rows[1].wastage_alert);

    // Only old history: cold start
    assert_eq!(rows[2].predicted_quantity, 5);
    assert_eq!(rows[2].confidence_percent, 20);
}

#[test]
fn forecast_for_single_unknown_dish_fails() {
    let conn = setup();
    assert!(forecast::forecast_rows(&conn, Some("Tacos"), today()).is_err());
    let one = forecast::forecast_rows(&conn, Some("Salad"), today()).unwrap();
    assert_eq!(one.len(), 1);
}

#[test]
fn adjust_blends_and_records_history() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "kitchencast",
        "forecast",
        "adjust",
        "--dish",
        " Pasta ",
        "--estimate",
        "30",
        "--today",
        "2025-03-10",
    ]);
    if let Some(("forecast", m)) = matches.subcommand() {
        forecast::handle(&conn, m).unwrap();
    } else {
        panic!("forecast command not parsed");
    }

    let (f, adjusted) = forecast::adjust_dish(&conn, "Salad", 10, today()).unwrap();
    assert_eq!((f, adjusted), (10, 10));

    let history = forecast::adjustments(&conn, Some("Pasta"), 10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].forecast_quantity, 22);
    assert_eq!(history[0].human_estimate, 30);
    assert_eq!(history[0].adjusted_quantity, 24);
    assert_eq!(history[0].date, today());

    assert_eq!(forecast::adjustments(&conn, None, 10).unwrap().len(), 2);
    assert_eq!(forecast::adjustments(&conn, None, 1).unwrap().len(), 1);
}

#[test]
fn doctor_flags_cold_starts_and_future_entries() {
    let conn = setup();
    let issues = doctor::diagnose(&conn, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()).unwrap();
    assert!(issues.contains(&vec!["no_recent_sales".to_string(), "Soup".to_string()]));
    assert!(issues.contains(&vec![
        "future_sale".to_string(),
        "2025-03-10 Pasta".to_string()
    ]));
    assert!(!issues.iter().any(|r| r[0] == "negative_quantity"));
}

#[test]
fn restaurant_name_defaults_and_updates() {
    let conn = setup();
    assert_eq!(
        utils::get_restaurant_name(&conn).unwrap(),
        utils::DEFAULT_RESTAURANT_NAME
    );

    let matches = cli::build_cli().get_matches_from([
        "kitchencast",
        "settings",
        "set-name",
        "--name",
        " Luigi's ",
    ]);
    if let Some(("settings", m)) = matches.subcommand() {
        settings::handle(&conn, m).unwrap();
    } else {
        panic!("settings command not parsed");
    }
    assert_eq!(utils::get_restaurant_name(&conn).unwrap(), "Luigi's");
}
