// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use piastre::cli;
use piastre::commands::exporter;
use piastre::ledger::Ledger;
use piastre::models::{Account, Category, Currency, Transaction, TransactionKind};
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Ledger {
    let accounts = vec![
        Account {
            id: 1,
            name: "Cash".into(),
            initial_balance: Decimal::ZERO,
            currency: Currency::Egp,
        },
        Account {
            id: 2,
            name: "Dollars".into(),
            initial_balance: Decimal::ZERO,
            currency: Currency::Usd,
        },
    ];
    let categories = vec![Category {
        id: 1,
        name: "Food".into(),
        icon: "restaurant".into(),
        color: "#FF6B6B".into(),
        is_default: true,
    }];
    // newest first, like the loaded log
    let transactions = vec![
        Transaction {
            id: 2,
            description: String::new(),
            amount: Decimal::from(100),
            date: date("2025-08-02"),
            account_id: 2,
            kind: TransactionKind::Transfer {
                to_account_id: 1,
                received_amount: Some(Decimal::from(4700)),
            },
        },
        Transaction {
            id: 1,
            description: "lunch".into(),
            amount: Decimal::from(60),
            date: date("2025-08-01"),
            account_id: 1,
            kind: TransactionKind::Expense {
                category_id: Some(1),
            },
        },
    ];
    Ledger::from_parts(accounts, categories, transactions)
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["piastre", "export", "transactions"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    sub.clone()
}

#[test]
fn csv_export_is_oldest_first_with_resolved_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("txs.csv");
    let matches = export_matches(&["--format", "csv", "--out", path.to_str().unwrap()]);
    exporter::handle(&setup(), &matches).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "date,type,account,description,amount,currency,category,to_account,received_amount"
    );
    assert_eq!(lines[1], "2025-08-01,expense,Cash,lunch,60,EGP,Food,,");
    assert_eq!(lines[2], "2025-08-02,transfer,Dollars,,100,USD,,Cash,4700");
}

#[test]
fn json_export_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("txs.json");
    let matches = export_matches(&["--format", "json", "--out", path.to_str().unwrap()]);
    exporter::handle(&setup(), &matches).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let items: serde_json::Value = serde_json::from_str(&content).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "expense");
    assert_eq!(items[0]["category"], "Food");
    assert_eq!(items[1]["to_account"], "Cash");
    // Decimal serializes as a string to keep precision
    assert_eq!(items[1]["received_amount"], serde_json::json!("4700"));
}
