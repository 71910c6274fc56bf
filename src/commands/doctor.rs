// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::ledger::Ledger;
use crate::models::{Currency, TransactionKind};
use crate::rates;
use crate::utils::pretty_table;

/// Integrity scan over the loaded ledger. Everything reported here is
/// prevented by the mutation entry points, so findings point at data written
/// by older builds or edited out-of-band.
pub fn handle(conn: &Connection, ledger: &Ledger) -> Result<()> {
    let mut rows = Vec::new();

    for tx in ledger.transactions() {
        if ledger.account(tx.account_id).is_none() {
            rows.push(vec![
                "missing_account".into(),
                format!("tx {} references account {}", tx.id, tx.account_id),
            ]);
        }
        match &tx.kind {
            TransactionKind::Transfer {
                to_account_id,
                received_amount,
            } => {
                if ledger.account(*to_account_id).is_none() {
                    rows.push(vec![
                        "missing_transfer_account".into(),
                        format!("tx {} references account {}", tx.id, to_account_id),
                    ]);
                }
                if *to_account_id == tx.account_id {
                    rows.push(vec![
                        "self_transfer".into(),
                        format!("tx {} moves money to its own account", tx.id),
                    ]);
                }
                if received_amount.is_some() {
                    let same_currency = match (
                        ledger.account(tx.account_id),
                        ledger.account(*to_account_id),
                    ) {
                        (Some(src), Some(dst)) => src.currency == dst.currency,
                        _ => false,
                    };
                    if same_currency {
                        rows.push(vec![
                            "unexpected_received_amount".into(),
                            format!("tx {} is a same-currency transfer", tx.id),
                        ]);
                    }
                }
            }
            TransactionKind::Expense { category_id } | TransactionKind::Income { category_id } => {
                if let Some(cid) = category_id {
                    if ledger.category(*cid).is_none() {
                        rows.push(vec![
                            "missing_category".into(),
                            format!("tx {} references category {}", tx.id, cid),
                        ]);
                    }
                }
            }
        }
    }

    // Category shares are summed in native amounts, so categorized expenses
    // from foreign-currency accounts skew the percentages.
    let foreign_categorized = ledger
        .transactions()
        .iter()
        .filter(|tx| {
            matches!(tx.kind, TransactionKind::Expense { category_id: Some(_) })
                && ledger
                    .account(tx.account_id)
                    .is_some_and(|a| a.currency != Currency::Egp)
        })
        .count();
    if foreign_categorized > 0 {
        rows.push(vec![
            "mixed_currency_categories".into(),
            format!(
                "{} categorized expense(s) in a non-EGP account; category shares mix currencies",
                foreign_categorized
            ),
        ]);
    }

    match rates::read_snapshot(conn)? {
        None => rows.push(vec![
            "no_rate_snapshot".into(),
            "run 'piastre fx fetch' to enable conversions".into(),
        ]),
        Some((_, at)) => {
            let age = Utc::now() - at;
            if age >= rates::cache_ttl() {
                rows.push(vec![
                    "stale_rate_snapshot".into(),
                    format!("fetched {} minutes ago", age.num_minutes()),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
