// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an account")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .default_value("0")
                        .help("Initial balance (may be negative)"),
                )
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .default_value("EGP")
                        .help("EGP or USD"),
                ),
        )
        .subcommand(json_flags(Command::new("list").about("List accounts with balances")))
        .subcommand(
            Command::new("edit")
                .about("Edit an account")
                .arg(Arg::new("name").required(true).help("Current account name"))
                .arg(Arg::new("new-name").long("name").help("New name"))
                .arg(Arg::new("balance").long("balance").help("New initial balance"))
                .arg(Arg::new("currency").long("currency").help("New currency")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove an account (refused while transactions reference it)")
                .arg(Arg::new("name").required(true)),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("icon")
                        .long("icon")
                        .default_value("ellipsis-horizontal-circle"),
                )
                .arg(Arg::new("color").long("color").default_value("#4ECDC4")),
        )
        .subcommand(json_flags(Command::new("list").about("List categories")))
        .subcommand(
            Command::new("edit")
                .about("Edit a category")
                .arg(Arg::new("name").required(true).help("Current category name"))
                .arg(Arg::new("new-name").long("name").help("New name"))
                .arg(Arg::new("icon").long("icon"))
                .arg(Arg::new("color").long("color")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a category; its transactions become uncategorized")
                .arg(Arg::new("name").required(true)),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an expense, income, or transfer")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("expense, income, or transfer"),
                )
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Required for expense and income"),
                )
                .arg(Arg::new("category").long("category").help("Category name (expense/income)"))
                .arg(Arg::new("to").long("to").help("Destination account (transfer)"))
                .arg(
                    Arg::new("received")
                        .long("received")
                        .help("Amount credited to the destination, for cross-currency transfers"),
                ),
        )
        .subcommand(
            json_flags(
                Command::new("list")
                    .about("List transactions, newest first")
                    .arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(clap::value_parser!(i64))
                            .help("Only the last N days"),
                    )
                    .arg(Arg::new("account").long("account"))
                    .arg(Arg::new("category").long("category"))
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(clap::value_parser!(usize)),
                    ),
            ),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a transaction")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("account").long("account"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("to").long("to"))
                .arg(Arg::new("received").long("received")),
        )
        .subcommand(
            Command::new("rm").about("Delete a transaction").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(clap::value_parser!(i64)),
            ),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Balances and summaries")
        .subcommand_required(true)
        .subcommand(
            json_flags(
                Command::new("balances")
                    .about("Per-account balances and the converted total")
                    .arg(
                        Arg::new("currency")
                            .long("currency")
                            .default_value("EGP")
                            .help("Currency of the total"),
                    ),
            ),
        )
        .subcommand(
            json_flags(
                Command::new("summary")
                    .about("Income, expenses, and net over a period")
                    .arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(clap::value_parser!(i64))
                            .help("Only the last N days; omit for all time"),
                    )
                    .arg(Arg::new("currency").long("currency").default_value("EGP")),
            ),
        )
        .subcommand(
            json_flags(
                Command::new("by-category")
                    .about("Expense totals and shares per category")
                    .arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(clap::value_parser!(i64)),
                    ),
            ),
        )
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("USD/EGP snapshot rate")
        .subcommand_required(true)
        .subcommand(Command::new("fetch").about("Refresh the rate now, ignoring the cache"))
        .subcommand(Command::new("show").about("Show the cached rate and its age"))
        .subcommand(
            Command::new("convert")
                .about("Convert an amount using the snapshot rate")
                .arg(Arg::new("amount").required(true))
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true)),
        )
}

fn export_cmd() -> Command {
    Command::new("export").about("Export data").subcommand_required(true).subcommand(
        Command::new("transactions")
            .about("Export the transaction log")
            .arg(
                Arg::new("format")
                    .long("format")
                    .default_value("csv")
                    .help("csv or json"),
            )
            .arg(Arg::new("out").long("out").required(true)),
    )
}

pub fn build_cli() -> Command {
    Command::new("piastre")
        .version(clap::crate_version!())
        .about("Personal finance tracking: accounts, categorized transactions, transfers, and multi-currency balances")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(account_cmd())
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(report_cmd())
        .subcommand(fx_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Scan for integrity issues"))
}
