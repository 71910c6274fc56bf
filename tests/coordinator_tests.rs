// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use piastre::coordinator;
use piastre::db;
use piastre::errors::{LedgerError, ValidationError};
use piastre::ledger::Ledger;
use piastre::models::{Currency, TransactionDraft, TransactionKind};
use piastre::store;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> (Connection, Ledger) {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::load(&conn).unwrap();
    (conn, ledger)
}

fn expense_draft(account_id: i64, amount: i64, description: &str) -> TransactionDraft {
    TransactionDraft {
        description: description.into(),
        amount: d(amount),
        date: date("2025-08-01"),
        account_id,
        kind: TransactionKind::Expense { category_id: None },
    }
}

#[test]
fn add_account_persists_and_reflects() {
    let (conn, mut ledger) = setup();
    let id = coordinator::add_account(&conn, &mut ledger, "Cash", d(100), Currency::Egp).unwrap();
    assert_eq!(ledger.account(id).unwrap().name, "Cash");
    // a fresh load from the store sees the same account
    let reloaded = Ledger::load(&conn).unwrap();
    assert_eq!(reloaded.account(id).unwrap().initial_balance, d(100));
}

#[test]
fn scenario_income_expense_transfer_through_the_stack() {
    let (conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();
    let savings =
        coordinator::add_account(&conn, &mut ledger, "Savings", d(0), Currency::Egp).unwrap();

    let mut draft = expense_draft(cash, 500, "salary");
    draft.kind = TransactionKind::Income { category_id: None };
    coordinator::add_transaction(&conn, &mut ledger, draft).unwrap();
    assert_eq!(ledger.balance(cash), d(500));

    coordinator::add_transaction(&conn, &mut ledger, expense_draft(cash, 200, "rent")).unwrap();
    assert_eq!(ledger.balance(cash), d(300));

    let transfer = TransactionDraft {
        description: String::new(),
        amount: d(100),
        date: date("2025-08-02"),
        account_id: cash,
        kind: TransactionKind::Transfer {
            to_account_id: savings,
            received_amount: None,
        },
    };
    coordinator::add_transaction(&conn, &mut ledger, transfer).unwrap();
    assert_eq!(ledger.balance(cash), d(200));
    assert_eq!(ledger.balance(savings), d(100));

    // the persisted log agrees after a reload
    let reloaded = Ledger::load(&conn).unwrap();
    assert_eq!(reloaded.balance(cash), d(200));
    assert_eq!(reloaded.balance(savings), d(100));
}

#[test]
fn validation_failures_never_reach_the_store() {
    let (conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();

    let err = coordinator::add_transaction(&conn, &mut ledger, expense_draft(cash, 10, "   "))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::EmptyDescription)
    ));

    let err = coordinator::add_transaction(&conn, &mut ledger, expense_draft(cash, 0, "coffee"))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::NonPositiveAmount)
    ));

    let err = coordinator::add_transaction(&conn, &mut ledger, expense_draft(99, 10, "coffee"))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownAccount(99))
    ));

    assert!(ledger.transactions().is_empty());
    assert!(store::fetch_transactions(&conn).unwrap().is_empty());
}

#[test]
fn transfer_validation_rules() {
    let (conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();
    let savings =
        coordinator::add_account(&conn, &mut ledger, "Savings", d(0), Currency::Egp).unwrap();

    let make = |to, received: Option<i64>| TransactionDraft {
        description: String::new(),
        amount: d(50),
        date: date("2025-08-01"),
        account_id: cash,
        kind: TransactionKind::Transfer {
            to_account_id: to,
            received_amount: received.map(d),
        },
    };

    let err = coordinator::add_transaction(&conn, &mut ledger, make(cash, None)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::TransferToSameAccount)
    ));

    let err = coordinator::add_transaction(&conn, &mut ledger, make(77, None)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownAccount(77))
    ));

    // received_amount is reserved for cross-currency transfers
    let err = coordinator::add_transaction(&conn, &mut ledger, make(savings, Some(50))).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnexpectedReceivedAmount)
    ));

    // a transfer may omit the description entirely
    coordinator::add_transaction(&conn, &mut ledger, make(savings, None)).unwrap();
}

#[test]
fn cross_currency_transfer_accepts_received_amount() {
    let (conn, mut ledger) = setup();
    let dollars =
        coordinator::add_account(&conn, &mut ledger, "Dollars", d(500), Currency::Usd).unwrap();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();

    let draft = TransactionDraft {
        description: String::new(),
        amount: d(100),
        date: date("2025-08-01"),
        account_id: dollars,
        kind: TransactionKind::Transfer {
            to_account_id: cash,
            received_amount: Some(d(4700)),
        },
    };
    coordinator::add_transaction(&conn, &mut ledger, draft).unwrap();
    assert_eq!(ledger.balance(dollars), d(400));
    assert_eq!(ledger.balance(cash), d(4700));
}

#[test]
fn deleting_a_referenced_account_is_blocked_with_the_count() {
    let (conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();
    let savings =
        coordinator::add_account(&conn, &mut ledger, "Savings", d(0), Currency::Egp).unwrap();

    coordinator::add_transaction(&conn, &mut ledger, expense_draft(cash, 10, "coffee")).unwrap();
    let transfer = TransactionDraft {
        description: String::new(),
        amount: d(20),
        date: date("2025-08-02"),
        account_id: savings,
        kind: TransactionKind::Transfer {
            to_account_id: cash,
            received_amount: None,
        },
    };
    coordinator::add_transaction(&conn, &mut ledger, transfer).unwrap();

    // one reference as source, one as destination
    let err = coordinator::delete_account(&conn, &mut ledger, cash).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::ReferentialBlock {
            transaction_count: 2
        }
    ));
    assert!(ledger.account(cash).is_some());
    assert!(store::fetch_accounts(&conn).unwrap().iter().any(|a| a.id == cash));

    // an unreferenced account deletes fine
    let spare = coordinator::add_account(&conn, &mut ledger, "Spare", d(0), Currency::Egp).unwrap();
    coordinator::delete_account(&conn, &mut ledger, spare).unwrap();
    assert!(ledger.account(spare).is_none());
}

#[test]
fn deleting_a_category_unlinks_its_transactions() {
    let (mut conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(0), Currency::Egp).unwrap();
    let food =
        coordinator::add_category(&conn, &mut ledger, "Food", "restaurant", "#FF6B6B").unwrap();

    for i in 0..3 {
        let mut draft = expense_draft(cash, 10 + i, "lunch");
        draft.kind = TransactionKind::Expense {
            category_id: Some(food),
        };
        coordinator::add_transaction(&conn, &mut ledger, draft).unwrap();
    }

    coordinator::delete_category(&mut conn, &mut ledger, food).unwrap();

    assert!(ledger.category(food).is_none());
    assert_eq!(ledger.transactions().len(), 3);
    assert!(ledger
        .transactions()
        .iter()
        .all(|tx| tx.kind.category_id().is_none()));

    // the unlink is persisted too
    let reloaded = Ledger::load(&conn).unwrap();
    assert_eq!(reloaded.transactions().len(), 3);
    assert!(reloaded
        .transactions()
        .iter()
        .all(|tx| tx.kind.category_id().is_none()));
}

#[test]
fn update_and_delete_transaction_rebalance() {
    let (conn, mut ledger) = setup();
    let cash = coordinator::add_account(&conn, &mut ledger, "Cash", d(100), Currency::Egp).unwrap();
    let id =
        coordinator::add_transaction(&conn, &mut ledger, expense_draft(cash, 30, "coffee")).unwrap();
    assert_eq!(ledger.balance(cash), d(70));

    coordinator::update_transaction(&conn, &mut ledger, id, expense_draft(cash, 45, "coffee"))
        .unwrap();
    assert_eq!(ledger.balance(cash), d(55));

    coordinator::delete_transaction(&conn, &mut ledger, id).unwrap();
    assert_eq!(ledger.balance(cash), d(100));
    assert!(ledger.transactions().is_empty());
}

#[test]
fn category_edits_persist_and_keep_the_default_flag() {
    let (conn, _) = setup();
    db::seed_default_categories(&conn).unwrap();
    let mut ledger = Ledger::load(&conn).unwrap();
    let seeded = ledger.categories()[0].clone();
    assert!(seeded.is_default);

    coordinator::update_category(&conn, &mut ledger, seeded.id, "Groceries", "cart", "#58D68D")
        .unwrap();
    let edited = ledger.category(seeded.id).unwrap();
    assert_eq!(edited.name, "Groceries");
    assert!(edited.is_default);

    let reloaded = Ledger::load(&conn).unwrap();
    let stored = reloaded.category(seeded.id).unwrap();
    assert_eq!(stored.icon, "cart");
    assert_eq!(stored.color, "#58D68D");
    assert!(stored.is_default);
}

#[test]
fn unknown_targets_are_rejected() {
    let (mut conn, mut ledger) = setup();
    let err = coordinator::delete_transaction(&conn, &mut ledger, 5).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownTransaction(5))
    ));
    let err = coordinator::delete_account(&conn, &mut ledger, 5).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownAccount(5))
    ));
    let err = coordinator::delete_category(&mut conn, &mut ledger, 5).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownCategory(5))
    ));
}

#[test]
fn account_and_category_field_rules() {
    let (conn, mut ledger) = setup();
    let err =
        coordinator::add_account(&conn, &mut ledger, "   ", d(0), Currency::Egp).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::EmptyAccountName)
    ));

    // negative starting balances are allowed
    coordinator::add_account(&conn, &mut ledger, "Overdraft", d(-50), Currency::Egp).unwrap();

    let err = coordinator::add_category(&conn, &mut ledger, "  ", "cart", "#FFFFFF").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::EmptyCategoryName)
    ));

    let long = "x".repeat(31);
    let err = coordinator::add_category(&conn, &mut ledger, &long, "cart", "#FFFFFF").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::CategoryNameTooLong)
    ));

    let err =
        coordinator::add_category(&conn, &mut ledger, "Pets", "dinosaur", "#FFFFFF").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::UnknownIcon(_))
    ));

    coordinator::add_category(&conn, &mut ledger, "Pets", "paw", "#8D6E63").unwrap();
}
