// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only summaries over the transaction log.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use crate::currency::{convert, RateTable};
use crate::ledger::Ledger;
use crate::models::{Category, Currency, Transaction, TransactionKind};

/// Transactions newer than `days` full days before `today`. A transaction
/// dated exactly `days` ago falls outside the window; `None` keeps
/// everything.
pub fn filter_by_period<'a>(
    transactions: &'a [Transaction],
    today: NaiveDate,
    days: Option<i64>,
) -> Vec<&'a Transaction> {
    match days {
        None => transactions.iter().collect(),
        Some(d) => {
            let cutoff = today - Duration::days(d);
            transactions.iter().filter(|tx| tx.date > cutoff).collect()
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    /// Transactions left out because their account's currency had no rate.
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub missing_rate: usize,
}

fn is_zero_usize(n: &usize) -> bool {
    *n == 0
}

/// Income and expense totals in `base`, converted per transaction using the
/// owning account's currency. Transfers move money between accounts without
/// changing the system total, so they are excluded.
pub fn summarize(
    transactions: &[&Transaction],
    ledger: &Ledger,
    base: Currency,
    rates: &RateTable,
) -> PeriodSummary {
    let mut summary = PeriodSummary::default();
    for tx in transactions {
        let is_income = match tx.kind {
            TransactionKind::Income { .. } => true,
            TransactionKind::Expense { .. } => false,
            TransactionKind::Transfer { .. } => continue,
        };
        let Some(account) = ledger.account(tx.account_id) else {
            continue;
        };
        match convert(tx.amount, account.currency, base, rates) {
            Some(amount) if is_income => summary.income += amount,
            Some(amount) => summary.expenses += amount,
            None => summary.missing_rate += 1,
        }
    }
    summary.net = summary.income - summary.expenses;
    summary
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    /// Native-amount sum; no currency normalization is applied here.
    pub amount: Decimal,
    pub share_percent: i64,
}

/// Expense totals per category, descending by amount with stable ties.
/// Only categorized expenses count; categories with no matching transaction
/// are omitted. Shares are whole percents of the included total.
pub fn category_totals(
    transactions: &[&Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let mut sums: HashMap<i64, Decimal> = HashMap::new();
    let mut order: Vec<i64> = Vec::new();
    for tx in transactions {
        let TransactionKind::Expense {
            category_id: Some(category_id),
        } = tx.kind
        else {
            continue;
        };
        if !categories.iter().any(|c| c.id == category_id) {
            continue;
        }
        let entry = sums.entry(category_id).or_insert_with(|| {
            order.push(category_id);
            Decimal::ZERO
        });
        *entry += tx.amount;
    }

    let total: Decimal = sums.values().copied().sum();
    let mut totals: Vec<CategoryTotal> = order
        .iter()
        .filter_map(|id| {
            let category = categories.iter().find(|c| c.id == *id)?.clone();
            let amount = sums[id];
            let share_percent = if total.is_zero() {
                0
            } else {
                (amount / total * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
                    .unwrap_or(0)
            };
            Some(CategoryTotal {
                category,
                amount,
                share_percent,
            })
        })
        .collect();
    // sort_by is stable, so equal amounts keep first-seen order
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}
