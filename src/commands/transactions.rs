// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::coordinator;
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionDraft, TransactionKind};
use crate::report::filter_by_period;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(conn, ledger, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            coordinator::delete_transaction(conn, ledger, id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn build_kind(
    ledger: &Ledger,
    type_str: &str,
    category: Option<&String>,
    to_account: Option<&String>,
    received: Option<&String>,
) -> Result<TransactionKind> {
    let category_id = category
        .map(|name| {
            ledger
                .category_by_name(name)
                .map(|c| c.id)
                .ok_or_else(|| anyhow!("Category '{}' not found", name))
        })
        .transpose()?;
    match type_str {
        "expense" | "income" => {
            if to_account.is_some() || received.is_some() {
                bail!("--to and --received only apply to transfers");
            }
            if type_str == "expense" {
                Ok(TransactionKind::Expense { category_id })
            } else {
                Ok(TransactionKind::Income { category_id })
            }
        }
        "transfer" => {
            if category_id.is_some() {
                bail!("Transfers cannot carry a category");
            }
            let to_name =
                to_account.ok_or_else(|| anyhow!("Transfers need --to <account>"))?;
            let to_account_id = ledger
                .account_by_name(to_name)
                .map(|a| a.id)
                .ok_or_else(|| anyhow!("Account '{}' not found", to_name))?;
            let received_amount = received.map(|s| parse_decimal(s)).transpose()?;
            Ok(TransactionKind::Transfer {
                to_account_id,
                received_amount,
            })
        }
        other => bail!("Unknown type '{}' (use expense|income|transfer)", other),
    }
}

fn add(conn: &Connection, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let type_str = sub.get_one::<String>("type").unwrap();
    let account_name = sub.get_one::<String>("account").unwrap();
    let account_id = ledger
        .account_by_name(account_name)
        .map(|a| a.id)
        .ok_or_else(|| anyhow!("Account '{}' not found", account_name))?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_default();
    let kind = build_kind(
        ledger,
        type_str,
        sub.get_one::<String>("category"),
        sub.get_one::<String>("to"),
        sub.get_one::<String>("received"),
    )?;

    let draft = TransactionDraft {
        description,
        amount,
        date,
        account_id,
        kind,
    };
    let id = coordinator::add_transaction(conn, ledger, draft)?;
    println!(
        "Recorded {} of {} on {} (acct: {}, id: {})",
        type_str, amount, date, account_name, id
    );
    Ok(())
}

fn edit(conn: &Connection, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = ledger
        .transaction(id)
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?
        .clone();

    let type_str = sub
        .get_one::<String>("type")
        .cloned()
        .unwrap_or_else(|| existing.kind.type_str().to_string());
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => ledger
            .account_by_name(name)
            .map(|a| a.id)
            .ok_or_else(|| anyhow!("Account '{}' not found", name))?,
        None => existing.account_id,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => existing.amount,
    };
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => existing.date,
    };
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_else(|| existing.description.clone());

    // Overrides are merged onto the existing payload only while the type
    // stays the same; changing the type starts from the flags alone.
    let same_type = type_str == existing.kind.type_str();
    let existing_category = if same_type {
        existing
            .kind
            .category_id()
            .and_then(|cid| ledger.category(cid))
            .map(|c| c.name.clone())
    } else {
        None
    };
    let existing_to = if same_type {
        existing
            .kind
            .transfer_to_account_id()
            .and_then(|aid| ledger.account(aid))
            .map(|a| a.name.clone())
    } else {
        None
    };
    let existing_received = if same_type {
        existing.kind.received_amount().map(|d| d.to_string())
    } else {
        None
    };
    let kind = build_kind(
        ledger,
        &type_str,
        sub.get_one::<String>("category").or(existing_category.as_ref()),
        sub.get_one::<String>("to").or(existing_to.as_ref()),
        sub.get_one::<String>("received").or(existing_received.as_ref()),
    )?;

    let draft = TransactionDraft {
        description,
        amount,
        date,
        account_id,
        kind,
    };
    coordinator::update_transaction(conn, ledger, id, draft)?;
    println!("Updated transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub description: String,
    pub account: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub to_account: String,
    pub received_amount: String,
}

fn row_for(ledger: &Ledger, tx: &Transaction) -> TransactionRow {
    let account = ledger.account(tx.account_id);
    TransactionRow {
        id: tx.id,
        date: tx.date.to_string(),
        r#type: tx.kind.type_str().to_string(),
        description: tx.description.clone(),
        account: account.map(|a| a.name.clone()).unwrap_or_default(),
        amount: tx.amount,
        currency: account.map(|a| a.currency.to_string()).unwrap_or_default(),
        category: tx
            .kind
            .category_id()
            .and_then(|cid| ledger.category(cid))
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        to_account: tx
            .kind
            .transfer_to_account_id()
            .and_then(|aid| ledger.account(aid))
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        received_amount: tx
            .kind
            .received_amount()
            .map(|d| d.to_string())
            .unwrap_or_default(),
    }
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let days = sub.get_one::<i64>("days").copied();
    let today = Utc::now().date_naive();
    let mut filtered = filter_by_period(ledger.transactions(), today, days);

    if let Some(name) = sub.get_one::<String>("account") {
        let id = ledger
            .account_by_name(name)
            .map(|a| a.id)
            .ok_or_else(|| anyhow!("Account '{}' not found", name))?;
        filtered.retain(|tx| tx.touches_account(id));
    }
    if let Some(name) = sub.get_one::<String>("category") {
        let id = ledger
            .category_by_name(name)
            .map(|c| c.id)
            .ok_or_else(|| anyhow!("Category '{}' not found", name))?;
        filtered.retain(|tx| tx.kind.category_id() == Some(id));
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filtered.truncate(*limit);
    }
    Ok(filtered.iter().map(|tx| row_for(ledger, tx)).collect())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.description.clone(),
                    r.account.clone(),
                    r.amount.to_string(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.to_account.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Description", "Account", "Amount", "CCY", "Category", "To"],
                rows,
            )
        );
    }
    Ok(())
}
