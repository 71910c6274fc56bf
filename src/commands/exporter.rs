// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::ledger::Ledger;
use crate::models::Transaction;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ledger, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    // Oldest first for exports, regardless of display order.
    let mut txs: Vec<&Transaction> = ledger.transactions().iter().collect();
    txs.sort_by_key(|t| (t.date, t.id));

    let account_name = |id: i64| {
        ledger
            .account(id)
            .map(|a| a.name.clone())
            .unwrap_or_default()
    };
    let currency = |id: i64| {
        ledger
            .account(id)
            .map(|a| a.currency.to_string())
            .unwrap_or_default()
    };
    let category_name = |tx: &Transaction| {
        tx.kind
            .category_id()
            .and_then(|cid| ledger.category(cid))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "type",
                "account",
                "description",
                "amount",
                "currency",
                "category",
                "to_account",
                "received_amount",
            ])?;
            for tx in txs {
                wtr.write_record([
                    tx.date.to_string(),
                    tx.kind.type_str().to_string(),
                    account_name(tx.account_id),
                    tx.description.clone(),
                    tx.amount.to_string(),
                    currency(tx.account_id),
                    category_name(tx),
                    tx.kind
                        .transfer_to_account_id()
                        .map(account_name)
                        .unwrap_or_default(),
                    tx.kind
                        .received_amount()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for tx in txs {
                items.push(json!({
                    "date": tx.date.to_string(),
                    "type": tx.kind.type_str(),
                    "account": account_name(tx.account_id),
                    "description": tx.description,
                    "amount": tx.amount,
                    "currency": currency(tx.account_id),
                    "category": category_name(tx),
                    "to_account": tx.kind.transfer_to_account_id().map(account_name),
                    "received_amount": tx.kind.received_amount(),
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
