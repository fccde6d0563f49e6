// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::aggregate::MAX_SERIES_MONTHS;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn page_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(usize)),
    )
    .arg(
        Arg::new("offset")
            .long("offset")
            .value_parser(value_parser!(usize)),
    )
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(req("kind").help("income|expense"))
        .arg(req("amount").allow_negative_numbers(true))
        .arg(req("category"))
        .arg(req("date").help("YYYY-MM-DD"))
        .arg(opt("description"))
}

pub fn build_cli() -> Command {
    Command::new("cashclip")
        .about("Income/expense ledger, monthly reports, and numbered proposals/invoices")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("kind"))
                        .arg(opt("color").help("#RRGGBB")),
                )
                .subcommand(Command::new("list").arg(opt("kind")))
                .subcommand(Command::new("rm").arg(req("name")).arg(req("kind"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record income and expenses")
                .subcommand(tx_fields(Command::new("add")))
                .subcommand(tx_fields(
                    Command::new("edit").arg(req("id").value_parser(value_parser!(i64))),
                ))
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64))))
                .subcommand(json_flags(page_flags(
                    Command::new("list")
                        .arg(opt("month").help("YYYY-MM"))
                        .arg(opt("kind"))
                        .arg(opt("category")),
                ))),
        )
        .subcommand(
            Command::new("invest")
                .about("Track investments")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("kind"))
                        .arg(req("amount"))
                        .arg(req("date"))
                        .arg(opt("note")),
                )
                .subcommand(json_flags(page_flags(
                    Command::new("list").arg(opt("month")),
                ))),
        )
        .subcommand(
            Command::new("card")
                .about("Credit-card purchases")
                .subcommand(
                    Command::new("add")
                        .arg(req("card"))
                        .arg(req("description"))
                        .arg(req("amount"))
                        .arg(req("date"))
                        .arg(
                            opt("installments")
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("1"),
                        )
                        .arg(opt("category")),
                )
                .subcommand(json_flags(page_flags(
                    Command::new("list").arg(opt("month")),
                ))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("target"))
                        .arg(opt("deadline")),
                )
                .subcommand(Command::new("deposit").arg(req("name")).arg(req("amount")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("note")
                .about("Free-form notes")
                .subcommand(Command::new("add").arg(req("title")).arg(opt("body")))
                .subcommand(json_flags(page_flags(Command::new("list"))))
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("doc")
                .about("Numbered proposals and invoices")
                .subcommand(
                    Command::new("new")
                        .arg(req("kind").help("proposal|invoice"))
                        .arg(req("client"))
                        .arg(req("title"))
                        .arg(req("amount")),
                )
                .subcommand(json_flags(page_flags(
                    Command::new("list")
                        .arg(opt("kind"))
                        .arg(opt("year").value_parser(value_parser!(i32))),
                ))),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated reports")
                .subcommand(json_flags(
                    Command::new("summary").arg(opt("month").help("YYYY-MM, default current")),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .arg(opt("month"))
                        .arg(opt("kind").default_value("expense"))
                        .arg(opt("top").value_parser(value_parser!(usize))),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow").arg(opt("month")).arg(
                        opt("months")
                            .value_parser(value_parser!(u16).range(1..=MAX_SERIES_MONTHS as i64))
                            .default_value("12"),
                    ),
                ))
                .subcommand(json_flags(Command::new("dashboard").arg(opt("month")))),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("get").arg(req("key")))
                .subcommand(Command::new("set").arg(req("key")).arg(req("value")))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(opt("format").default_value("csv").help("csv|json"))
                    .arg(req("out")),
            ),
        )
}
