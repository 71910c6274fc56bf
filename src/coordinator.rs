// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mutation entry points: validate against the current ledger, persist, then
//! reflect in memory. A validation failure never reaches the store; a store
//! failure leaves the ledger exactly as it was.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::errors::{LedgerError, ValidationError};
use crate::ledger::Ledger;
use crate::models::{Account, Category, Currency, TransactionDraft, TransactionKind, ICONS,
                    MAX_CATEGORY_NAME_LEN};
use crate::store;

// ---- transactions ----

fn validate_transaction(ledger: &Ledger, draft: &TransactionDraft) -> Result<(), ValidationError> {
    if draft.amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    let source = ledger
        .account(draft.account_id)
        .ok_or(ValidationError::UnknownAccount(draft.account_id))?;
    match &draft.kind {
        TransactionKind::Expense { category_id } | TransactionKind::Income { category_id } => {
            if draft.description.trim().is_empty() {
                return Err(ValidationError::EmptyDescription);
            }
            if let Some(cid) = category_id {
                if ledger.category(*cid).is_none() {
                    return Err(ValidationError::UnknownCategory(*cid));
                }
            }
        }
        TransactionKind::Transfer {
            to_account_id,
            received_amount,
        } => {
            if *to_account_id == draft.account_id {
                return Err(ValidationError::TransferToSameAccount);
            }
            let dest = ledger
                .account(*to_account_id)
                .ok_or(ValidationError::UnknownAccount(*to_account_id))?;
            if let Some(received) = received_amount {
                if *received <= Decimal::ZERO {
                    return Err(ValidationError::NonPositiveReceivedAmount);
                }
                if source.currency == dest.currency {
                    return Err(ValidationError::UnexpectedReceivedAmount);
                }
            }
        }
    }
    Ok(())
}

pub fn add_transaction(
    conn: &Connection,
    ledger: &mut Ledger,
    draft: TransactionDraft,
) -> Result<i64, LedgerError> {
    validate_transaction(ledger, &draft)?;
    let id = store::insert_transaction(conn, &draft)?;
    ledger.apply_transaction_added(draft.into_transaction(id));
    Ok(id)
}

pub fn update_transaction(
    conn: &Connection,
    ledger: &mut Ledger,
    id: i64,
    draft: TransactionDraft,
) -> Result<(), LedgerError> {
    if ledger.transaction(id).is_none() {
        return Err(ValidationError::UnknownTransaction(id).into());
    }
    validate_transaction(ledger, &draft)?;
    store::update_transaction(conn, id, &draft)?;
    ledger.apply_transaction_updated(draft.into_transaction(id));
    Ok(())
}

pub fn delete_transaction(
    conn: &Connection,
    ledger: &mut Ledger,
    id: i64,
) -> Result<(), LedgerError> {
    if ledger.transaction(id).is_none() {
        return Err(ValidationError::UnknownTransaction(id).into());
    }
    store::delete_transaction(conn, id)?;
    ledger.apply_transaction_deleted(id);
    Ok(())
}

// ---- accounts ----

pub fn add_account(
    conn: &Connection,
    ledger: &mut Ledger,
    name: &str,
    initial_balance: Decimal,
    currency: Currency,
) -> Result<i64, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyAccountName.into());
    }
    let id = store::insert_account(conn, name, initial_balance, currency)?;
    ledger.apply_account_added(Account {
        id,
        name: name.to_string(),
        initial_balance,
        currency,
    });
    Ok(id)
}

pub fn update_account(
    conn: &Connection,
    ledger: &mut Ledger,
    id: i64,
    name: &str,
    initial_balance: Decimal,
    currency: Currency,
) -> Result<(), LedgerError> {
    if ledger.account(id).is_none() {
        return Err(ValidationError::UnknownAccount(id).into());
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyAccountName.into());
    }
    store::update_account(conn, id, name, initial_balance, currency)?;
    ledger.apply_account_updated(Account {
        id,
        name: name.to_string(),
        initial_balance,
        currency,
    });
    Ok(())
}

/// Refuses while any transaction references the account, as source or as
/// transfer destination. The error carries the exact count for display.
pub fn delete_account(conn: &Connection, ledger: &mut Ledger, id: i64) -> Result<(), LedgerError> {
    if ledger.account(id).is_none() {
        return Err(ValidationError::UnknownAccount(id).into());
    }
    let transaction_count = store::count_transactions_referencing_account(conn, id)?;
    if transaction_count > 0 {
        return Err(LedgerError::ReferentialBlock { transaction_count });
    }
    store::delete_account(conn, id)?;
    ledger.apply_account_deleted(id);
    Ok(())
}

// ---- categories ----

pub fn add_category(
    conn: &Connection,
    ledger: &mut Ledger,
    name: &str,
    icon: &str,
    color: &str,
) -> Result<i64, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategoryName.into());
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::CategoryNameTooLong.into());
    }
    if !ICONS.contains(&icon) {
        return Err(ValidationError::UnknownIcon(icon.to_string()).into());
    }
    let id = store::insert_category(conn, name, icon, color)?;
    ledger.apply_category_added(Category {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        is_default: false,
    });
    Ok(id)
}

pub fn update_category(
    conn: &Connection,
    ledger: &mut Ledger,
    id: i64,
    name: &str,
    icon: &str,
    color: &str,
) -> Result<(), LedgerError> {
    let Some(existing) = ledger.category(id) else {
        return Err(ValidationError::UnknownCategory(id).into());
    };
    let is_default = existing.is_default;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategoryName.into());
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::CategoryNameTooLong.into());
    }
    if !ICONS.contains(&icon) {
        return Err(ValidationError::UnknownIcon(icon.to_string()).into());
    }
    store::update_category(conn, id, name, icon, color)?;
    ledger.apply_category_updated(Category {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        is_default,
    });
    Ok(())
}

/// Always permitted. Referencing transactions are kept and unlinked, in the
/// store and in memory, as one logical operation.
pub fn delete_category(
    conn: &mut Connection,
    ledger: &mut Ledger,
    id: i64,
) -> Result<(), LedgerError> {
    if ledger.category(id).is_none() {
        return Err(ValidationError::UnknownCategory(id).into());
    }
    store::delete_category_and_unlink(conn, id)?;
    ledger.apply_category_unlinked(id);
    ledger.apply_category_deleted(id);
    Ok(())
}
