// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn today_arg() -> Arg {
    opt("today", "Treat this date (YYYY-MM-DD) as today")
}

pub fn build_cli() -> Command {
    Command::new("kitchencast")
        .version(crate_version!())
        .about("Restaurant sales forecasting, wastage alerts, and daily sales ledger")
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("dish")
                .about("Manage menu dishes")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Dish name"))
                        .arg(opt("price", "Menu price").default_value("0")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("name", "Dish name"))),
        )
        .subcommand(
            Command::new("sales")
                .about("Record and browse daily sales")
                .subcommand(
                    Command::new("record")
                        .about("Record one day of sales for a dish")
                        .arg(req("dish", "Dish name"))
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("sold", "Quantity sold"))
                        .arg(opt("wasted", "Quantity wasted").default_value("0")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("dish", "Only this dish"))
                        .arg(opt("from", "First date, YYYY-MM-DD"))
                        .arg(opt("to", "Last date, YYYY-MM-DD"))
                        .arg(opt("limit", "Max rows").value_parser(value_parser!(usize))),
                )),
        )
        .subcommand(
            Command::new("forecast")
                .about("Forecast tomorrow's quantities from the trailing week")
                .subcommand(json_flags(
                    Command::new("show")
                        .arg(opt("dish", "Only this dish"))
                        .arg(today_arg()),
                ))
                .subcommand(
                    Command::new("adjust")
                        .about("Blend the forecast with your own estimate")
                        .arg(req("dish", "Dish name"))
                        .arg(req("estimate", "Your estimate"))
                        .arg(today_arg()),
                )
                .subcommand(
                    Command::new("history")
                        .arg(opt("dish", "Only this dish"))
                        .arg(
                            opt("limit", "Max rows")
                                .value_parser(value_parser!(usize))
                                .default_value("20"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Sales and wastage reports")
                .subcommand(json_flags(
                    Command::new("wastage")
                        .arg(req("from", "First date, YYYY-MM-DD"))
                        .arg(req("to", "Last date, YYYY-MM-DD")),
                ))
                .subcommand(json_flags(
                    Command::new("daily")
                        .arg(
                            opt("days", "Number of most recent days")
                                .value_parser(value_parser!(usize))
                                .default_value("7"),
                        ),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Import data from CSV")
                .subcommand(
                    Command::new("sales")
                        .about("CSV columns: date,dish,sold,wasted")
                        .arg(req("path", "CSV file")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("sales")
                        .arg(req("format", "csv or json"))
                        .arg(req("out", "Output path")),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Restaurant settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-name").arg(req("name", "Restaurant name"))),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for problems"))
}
