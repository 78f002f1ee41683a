// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

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

fn currency_arg(name: &'static str, long: &'static str) -> Arg {
    Arg::new(name)
        .long(long)
        .required(true)
        .ignore_case(true)
        .value_parser(["SAR", "SDG"])
}

pub fn build_cli() -> Command {
    Command::new("dualledger")
        .version(clap::crate_version!())
        .about("SAR/SDG income and expense tracker")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a config.toml"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("error, warn, info, debug, trace"),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and remove transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(currency_arg("currency", "currency"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD or RFC 3339; defaults to now"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["all", "income", "expense"]),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Exact category; \"(uncategorized)\" selects blank ones"),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Case-insensitive match on note or category"),
                        ),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Today, this week and this month in SAR and SDG"),
        ))
        .subcommand(
            Command::new("fx")
                .about("SAR to SDG exchange rate")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(Command::new("refresh"))
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(currency_arg("from", "from"))
                        .arg(currency_arg("to", "to")),
                )
                .subcommand(
                    Command::new("watch").about("Refresh periodically until interrupted"),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly expense budgets per currency")
                .subcommand(
                    Command::new("set")
                        .arg(currency_arg("currency", "currency"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("0 removes the budget"),
                        ),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
}
