// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kitchencast::error::EntryError;
use kitchencast::store::{SalesSource, SqliteSales, parse_quantity};
use kitchencast::{cli, commands::dishes, commands::sales, db};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO dishes(id, name, price) VALUES (1, 'Pasta', '12.50'), (2, 'Salad', '8')",
        [],
    )
    .unwrap();
    conn
}

fn run_sales(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["kitchencast", "sales"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("sales", m)) = matches.subcommand() {
        sales::handle(conn, m)
    } else {
        panic!("sales command not parsed");
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn record_trims_inputs_and_stores_entry() {
    let conn = setup();
    run_sales(
        &conn,
        &[
            "record", "--dish", " Pasta ", "--date", " 2025-06-01 ", "--sold", " 12 ", "--wasted",
            "3",
        ],
    )
    .unwrap();

    let (sold, wasted): (i64, i64) = conn
        .query_row(
            "SELECT quantity_sold, quantity_wasted FROM sales WHERE dish_id=1 AND date='2025-06-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!((sold, wasted), (12, 3));
}

#[test]
fn wasted_defaults_to_zero() {
    let conn = setup();
    run_sales(
        &conn,
        &["record", "--dish", "Salad", "--date", "2025-06-01", "--sold", "4"],
    )
    .unwrap();
    let wasted: i64 = conn
        .query_row("SELECT quantity_wasted FROM sales WHERE dish_id=2", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(wasted, 0);
}

#[test]
fn second_entry_for_same_day_is_rejected() {
    let conn = setup();
    let args = ["record", "--dish", "Pasta", "--date", "2025-06-01", "--sold", "10"];
    run_sales(&conn, &args).unwrap();

    let err = run_sales(
        &conn,
        &["record", "--dish", "Pasta", "--date", "2025-06-01", "--sold", "99"],
    )
    .unwrap_err();
    match err.downcast_ref::<EntryError>() {
        Some(EntryError::Duplicate { dish, date }) => {
            assert_eq!(dish, "Pasta");
            assert_eq!(*date, day(2025, 6, 1));
        }
        other => panic!("expected duplicate error, got {:?}", other),
    }

    let sold: i64 = conn
        .query_row("SELECT quantity_sold FROM sales WHERE dish_id=1", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(sold, 10);
}

#[test]
fn negative_quantities_are_rejected() {
    let conn = setup();
    let err = run_sales(
        &conn,
        &["record", "--dish", "Pasta", "--date", "2025-06-01", "--sold=-4"],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EntryError>(),
        Some(EntryError::InvalidQuantity { field: "sold", .. })
    ));

    assert!(parse_quantity("wasted", "-1").is_err());
    assert!(parse_quantity("wasted", "2.5").is_err());
    assert_eq!(parse_quantity("wasted", " 7 ").unwrap(), 7);

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM sales", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn unknown_dish_is_reported() {
    let conn = setup();
    let err = run_sales(
        &conn,
        &["record", "--dish", "Soup", "--date", "2025-06-01", "--sold", "1"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Dish 'Soup' not found"));
}

#[test]
fn list_filters_and_limits() {
    let conn = setup();
    for (dish, d) in [(1, "2025-06-01"), (1, "2025-06-02"), (1, "2025-06-03"), (2, "2025-06-03")] {
        conn.execute(
            "INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES (?1, ?2, 5, 1)",
            params![dish, d],
        )
        .unwrap();
    }

    let matches = cli::build_cli().get_matches_from([
        "kitchencast", "sales", "list", "--dish", "Pasta", "--limit", "2",
    ]);
    let (_, sales_m) = matches.subcommand().unwrap();
    let (_, list_m) = sales_m.subcommand().unwrap();
    let rows = sales::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-06-03");
    assert!(rows.iter().all(|r| r.dish == "Pasta"));

    let matches = cli::build_cli().get_matches_from([
        "kitchencast", "sales", "list", "--from", "2025-06-02", "--to", "2025-06-02",
    ]);
    let (_, sales_m) = matches.subcommand().unwrap();
    let (_, list_m) = sales_m.subcommand().unwrap();
    let rows = sales::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sold, 5);
}

#[test]
fn sqlite_source_returns_window_oldest_first() {
    let conn = setup();
    for (d, sold) in [("2025-03-02", 100), ("2025-03-09", 20), ("2025-03-03", 24), ("2025-03-10", 100)] {
        conn.execute(
            "INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES (1, ?1, ?2, 0)",
            params![d, sold],
        )
        .unwrap();
    }
    let got = SqliteSales::new(&conn)
        .fetch_sales_window(1, day(2025, 3, 3), day(2025, 3, 9))
        .unwrap();
    let dates: Vec<NaiveDate> = got.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(2025, 3, 3), day(2025, 3, 9)]);
    assert!(got.iter().all(|r| r.dish_id == 1));
}

#[test]
fn sqlite_source_skips_malformed_rows() {
    // Legacy table without the quantity checks
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE sales(id INTEGER PRIMARY KEY, dish_id INTEGER NOT NULL, date TEXT NOT NULL,
            quantity_sold INTEGER NOT NULL, quantity_wasted INTEGER NOT NULL);
        INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES
            (1, '2025-03-04', 10, 2),
            (1, '2025-03-05', -3, 0),
            (1, '2025-03-06', 8, -1),
            (1, '2025-03-07x', 50, 0);
        "#,
    )
    .unwrap();
    let got = SqliteSales::new(&conn)
        .fetch_sales_window(1, day(2025, 3, 3), day(2025, 3, 9))
        .unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].quantity_sold, 10);
    assert_eq!(got[0].quantity_wasted, 2);
}

#[test]
fn removing_a_dish_drops_its_sales() {
    let conn = setup();
    conn.execute(
        "INSERT INTO sales(dish_id, date, quantity_sold, quantity_wasted) VALUES (2, '2025-06-01', 5, 0)",
        [],
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from(["kitchencast", "dish", "rm", "--name", "Salad"]);
    let (_, dish_m) = matches.subcommand().unwrap();
    dishes::handle(&conn, dish_m).unwrap();

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM sales", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);

    let matches = cli::build_cli().get_matches_from(["kitchencast", "dish", "rm", "--name", "Salad"]);
    let (_, dish_m) = matches.subcommand().unwrap();
    assert!(dishes::handle(&conn, dish_m).is_err());
}

#[test]
fn dish_add_rejects_negative_price() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "kitchencast", "dish", "add", "--name", "Soup", "--price=-2",
    ]);
    let (_, dish_m) = matches.subcommand().unwrap();
    assert!(dishes::handle(&conn, dish_m).is_err());

    let matches = cli::build_cli().get_matches_from([
        "kitchencast", "dish", "add", "--name", " Soup ", "--price", "6.75",
    ]);
    let (_, dish_m) = matches.subcommand().unwrap();
    dishes::handle(&conn, dish_m).unwrap();
    let price: String = conn
        .query_row("SELECT price FROM dishes WHERE name='Soup'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(price, "6.75");
}
