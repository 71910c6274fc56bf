// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::coordinator;
use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, parse_currency, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let ccy = parse_currency(sub.get_one::<String>("currency").unwrap())?;
            coordinator::add_account(conn, ledger, name, balance, ccy)?;
            println!(
                "Added account '{}' ({}, starting at {})",
                name.trim(),
                ccy,
                balance
            );
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = ledger
                .account_by_name(name)
                .ok_or_else(|| anyhow!("Account '{}' not found", name))?;
            let id = account.id;
            let new_name = sub
                .get_one::<String>("new-name")
                .cloned()
                .unwrap_or_else(|| account.name.clone());
            let balance = match sub.get_one::<String>("balance") {
                Some(s) => parse_decimal(s)?,
                None => account.initial_balance,
            };
            let ccy = match sub.get_one::<String>("currency") {
                Some(s) => parse_currency(s)?,
                None => account.currency,
            };
            coordinator::update_account(conn, ledger, id, &new_name, balance, ccy)?;
            println!("Updated account '{}'", new_name.trim());
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = ledger
                .account_by_name(name)
                .ok_or_else(|| anyhow!("Account '{}' not found", name))?
                .id;
            coordinator::delete_account(conn, ledger, id)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct AccountRow {
    name: String,
    currency: String,
    initial_balance: Decimal,
    balance: Decimal,
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data: Vec<AccountRow> = ledger
        .accounts()
        .iter()
        .map(|a| AccountRow {
            name: a.name.clone(),
            currency: a.currency.to_string(),
            initial_balance: a.initial_balance,
            balance: ledger.balance(a.id),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = ledger
            .accounts()
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.currency.to_string(),
                    fmt_money(&ledger.balance(a.id), a.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Account", "CCY", "Balance"], rows));
    }
    Ok(())
}
