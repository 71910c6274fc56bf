// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::RateTable;
use crate::ledger::Ledger;
use crate::models::Currency;
use crate::rates;
use crate::report::{category_totals, filter_by_period, summarize};
use crate::utils::{fmt_money, http_client, maybe_print_json, parse_currency, pretty_table};

pub fn handle(conn: &Connection, ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, ledger, sub)?,
        Some(("summary", sub)) => summary(conn, ledger, sub)?,
        Some(("by-category", sub)) => by_category(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn snapshot_table(conn: &Connection) -> Result<RateTable> {
    let client = http_client()?;
    let rate = rates::snapshot_rate(conn, &client, Utc::now())?;
    Ok(RateTable::from_usd_to_egp(rate)?)
}

/// Snapshot rate table, or an empty table (same-currency conversions only)
/// when the rate is unavailable. Conversion-dependent output degrades; the
/// rest of the report still renders.
fn rate_table_or_empty(conn: &Connection, ledger: &Ledger, target: Currency) -> (RateTable, bool) {
    let needs_rate = ledger.accounts().iter().any(|a| a.currency != target);
    if !needs_rate {
        return (RateTable::default(), true);
    }
    match snapshot_table(conn) {
        Ok(t) => (t, true),
        Err(_) => (RateTable::default(), false),
    }
}

#[derive(Serialize)]
struct BalancesReport {
    accounts: Vec<BalanceRow>,
    total: Decimal,
    currency: String,
    rate_available: bool,
}

#[derive(Serialize)]
struct BalanceRow {
    account: String,
    currency: String,
    balance: Decimal,
}

fn balances(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let target = parse_currency(sub.get_one::<String>("currency").unwrap())?;

    let (table, rate_available) = rate_table_or_empty(conn, ledger, target);
    let total = ledger.total_balance(target, &table);
    let report = BalancesReport {
        accounts: ledger
            .accounts()
            .iter()
            .map(|a| BalanceRow {
                account: a.name.clone(),
                currency: a.currency.to_string(),
                balance: ledger.balance(a.id),
            })
            .collect(),
        total,
        currency: target.to_string(),
        rate_available,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let rows: Vec<Vec<String>> = report
            .accounts
            .iter()
            .map(|r| vec![r.account.clone(), r.currency.clone(), format!("{:.2}", r.balance)])
            .collect();
        println!("{}", pretty_table(&["Account", "CCY", "Balance"], rows));
        println!("Total: {}", fmt_money(&total, target));
        if !rate_available {
            eprintln!("No exchange rate available; the total excludes foreign-currency accounts.");
        }
    }
    Ok(())
}

fn summary(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days = sub.get_one::<i64>("days").copied();
    let base = parse_currency(sub.get_one::<String>("currency").unwrap())?;

    let today = Utc::now().date_naive();
    let filtered = filter_by_period(ledger.transactions(), today, days);
    let (table, _) = rate_table_or_empty(conn, ledger, base);
    let s = summarize(&filtered, ledger, base, &table);

    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![vec![
            format!("{:.2}", s.income),
            format!("{:.2}", s.expenses),
            format!("{:.2}", s.net),
        ]];
        let period = match days {
            Some(d) => format!("last {} days", d),
            None => "all time".to_string(),
        };
        println!("Summary ({period}, in {base}):");
        println!("{}", pretty_table(&["Income", "Expenses", "Net"], rows));
        if s.missing_rate > 0 {
            eprintln!(
                "No exchange rate available; {} transaction(s) were left out.",
                s.missing_rate
            );
        }
    }
    Ok(())
}

fn by_category(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days = sub.get_one::<i64>("days").copied();

    let today = Utc::now().date_naive();
    let filtered = filter_by_period(ledger.transactions(), today, days);
    let totals = category_totals(&filtered, ledger.categories());

    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        let rows: Vec<Vec<String>> = totals
            .iter()
            .map(|t| {
                vec![
                    t.category.name.clone(),
                    format!("{:.2}", t.amount),
                    format!("{}%", t.share_percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }
    Ok(())
}
