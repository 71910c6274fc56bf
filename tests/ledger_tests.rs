// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use piastre::currency::RateTable;
use piastre::ledger::Ledger;
use piastre::models::{Account, Currency, Transaction, TransactionKind};
use rust_decimal::Decimal;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn account(id: i64, name: &str, initial: i64, currency: Currency) -> Account {
    Account {
        id,
        name: name.into(),
        initial_balance: d(initial),
        currency,
    }
}

fn tx(id: i64, account_id: i64, amount: i64, kind: TransactionKind) -> Transaction {
    Transaction {
        id,
        description: format!("tx {id}"),
        amount: d(amount),
        date: date("2025-08-01"),
        account_id,
        kind,
    }
}

fn income() -> TransactionKind {
    TransactionKind::Income { category_id: None }
}

fn expense() -> TransactionKind {
    TransactionKind::Expense { category_id: None }
}

fn transfer(to: i64, received: Option<i64>) -> TransactionKind {
    TransactionKind::Transfer {
        to_account_id: to,
        received_amount: received.map(d),
    }
}

#[test]
fn balance_of_fresh_account_is_initial_balance() {
    let ledger = Ledger::from_parts(
        vec![account(1, "Cash", 250, Currency::Egp)],
        vec![],
        vec![],
    );
    assert_eq!(ledger.balance(1), d(250));
}

#[test]
fn balance_of_unknown_account_is_zero() {
    let ledger = Ledger::from_parts(vec![account(1, "Cash", 250, Currency::Egp)], vec![], vec![]);
    assert_eq!(ledger.balance(99), Decimal::ZERO);
}

#[test]
fn income_expense_transfer_scenario() {
    let accounts = vec![
        account(1, "Cash", 0, Currency::Egp),
        account(2, "Savings", 0, Currency::Egp),
    ];
    let mut txs = vec![tx(1, 1, 500, income())];
    let ledger = Ledger::from_parts(accounts.clone(), vec![], txs.clone());
    assert_eq!(ledger.balance(1), d(500));

    txs.push(tx(2, 1, 200, expense()));
    let ledger = Ledger::from_parts(accounts.clone(), vec![], txs.clone());
    assert_eq!(ledger.balance(1), d(300));

    txs.push(tx(3, 1, 100, transfer(2, None)));
    let ledger = Ledger::from_parts(accounts, vec![], txs);
    assert_eq!(ledger.balance(1), d(200));
    assert_eq!(ledger.balance(2), d(100));
}

#[test]
fn balance_does_not_depend_on_transaction_order() {
    let accounts = vec![
        account(1, "Cash", 40, Currency::Egp),
        account(2, "Bank", 0, Currency::Egp),
    ];
    let txs = vec![
        tx(1, 1, 500, income()),
        tx(2, 1, 120, expense()),
        tx(3, 1, 60, transfer(2, None)),
        tx(4, 2, 15, expense()),
        tx(5, 2, 30, transfer(1, None)),
    ];
    let forward = Ledger::from_parts(accounts.clone(), vec![], txs.clone());
    let mut reversed_txs = txs.clone();
    reversed_txs.reverse();
    let reversed = Ledger::from_parts(accounts.clone(), vec![], reversed_txs);
    let mut rotated_txs = txs;
    rotated_txs.rotate_left(2);
    let rotated = Ledger::from_parts(accounts, vec![], rotated_txs);

    for id in [1, 2] {
        assert_eq!(forward.balance(id), reversed.balance(id));
        assert_eq!(forward.balance(id), rotated.balance(id));
    }
    assert_eq!(forward.balance(1), d(40) + d(500) - d(120) - d(60) + d(30));
    assert_eq!(forward.balance(2), d(60) - d(15) - d(30));
}

#[test]
fn same_currency_transfer_moves_exact_amount() {
    let accounts = vec![
        account(1, "Cash", 1000, Currency::Egp),
        account(2, "Savings", 0, Currency::Egp),
    ];
    let ledger = Ledger::from_parts(accounts, vec![], vec![tx(1, 1, 75, transfer(2, None))]);
    assert_eq!(ledger.balance(1), d(925));
    assert_eq!(ledger.balance(2), d(75));
}

#[test]
fn cross_currency_transfer_credits_received_amount() {
    let accounts = vec![
        account(1, "Dollars", 500, Currency::Usd),
        account(2, "Cash", 0, Currency::Egp),
    ];
    let ledger = Ledger::from_parts(accounts, vec![], vec![tx(1, 1, 100, transfer(2, Some(4700)))]);
    // source loses the sent amount, destination gains the received amount
    assert_eq!(ledger.balance(1), d(400));
    assert_eq!(ledger.balance(2), d(4700));
}

#[test]
fn total_balance_converts_into_target_currency() {
    let accounts = vec![
        account(1, "Cash", 100, Currency::Egp),
        account(2, "Dollars", 2, Currency::Usd),
    ];
    let ledger = Ledger::from_parts(accounts, vec![], vec![]);
    let rates = RateTable::from_usd_to_egp(d(50)).unwrap();
    assert_eq!(ledger.total_balance(Currency::Egp, &rates), d(200));
    assert_eq!(ledger.total_balance(Currency::Usd, &rates), d(4));
}

#[test]
fn total_balance_excludes_accounts_without_a_rate() {
    let accounts = vec![
        account(1, "Cash", 100, Currency::Egp),
        account(2, "Dollars", 2, Currency::Usd),
    ];
    let ledger = Ledger::from_parts(accounts, vec![], vec![]);
    // no rate table entries: the USD account is left out, not guessed at
    assert_eq!(
        ledger.total_balance(Currency::Egp, &RateTable::default()),
        d(100)
    );
}
