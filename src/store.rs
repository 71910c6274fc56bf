// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entity CRUD over the SQLite store. Every mutation here is called by the
//! coordinator after validation; nothing in this module checks business
//! rules beyond what the schema enforces.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

use crate::errors::StoreError;
use crate::models::{Account, Category, Currency, Transaction, TransactionDraft, TransactionKind};

fn decimal_from_text(s: &str, what: &str) -> Result<Decimal, StoreError> {
    s.parse::<Decimal>()
        .map_err(|_| StoreError::Corrupted(format!("invalid {what} '{s}'")))
}

fn date_from_text(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| StoreError::Corrupted(format!("invalid date '{s}'")))
}

// ---- accounts ----

pub fn insert_account(
    conn: &Connection,
    name: &str,
    initial_balance: Decimal,
    currency: Currency,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO accounts(name, initial_balance, currency) VALUES (?1, ?2, ?3)",
        params![name, initial_balance.to_string(), currency.code()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_accounts(conn: &Connection) -> Result<Vec<Account>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, initial_balance, currency FROM accounts ORDER BY id ASC")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, balance, currency) = row?;
        out.push(Account {
            id,
            name,
            initial_balance: decimal_from_text(&balance, "initial balance")?,
            currency: currency
                .parse::<Currency>()
                .map_err(|_| StoreError::Corrupted(format!("invalid currency '{currency}'")))?,
        });
    }
    Ok(out)
}

pub fn update_account(
    conn: &Connection,
    id: i64,
    name: &str,
    initial_balance: Decimal,
    currency: Currency,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE accounts SET name=?1, initial_balance=?2, currency=?3 WHERE id=?4",
        params![name, initial_balance.to_string(), currency.code(), id],
    )?;
    Ok(())
}

pub fn delete_account(conn: &Connection, id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    Ok(())
}

/// References as source or as transfer destination both count.
pub fn count_transactions_referencing_account(
    conn: &Connection,
    account_id: i64,
) -> Result<i64, StoreError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id=?1 OR transfer_to_account_id=?1",
        params![account_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

// ---- categories ----

pub fn insert_category(
    conn: &Connection,
    name: &str,
    icon: &str,
    color: &str,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO categories(name, icon, color, is_default) VALUES (?1, ?2, ?3, 0)",
        params![name, icon, color],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_categories(conn: &Connection) -> Result<Vec<Category>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, icon, color, is_default FROM categories ORDER BY id ASC")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            icon: r.get(2)?,
            color: r.get(3)?,
            is_default: r.get::<_, i64>(4)? != 0,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    name: &str,
    icon: &str,
    color: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE categories SET name=?1, icon=?2, color=?3 WHERE id=?4",
        params![name, icon, color, id],
    )?;
    Ok(())
}

/// Deletes a category and nulls out `category_id` on every referencing
/// transaction, atomically. Transactions themselves are never deleted.
pub fn delete_category_and_unlink(conn: &mut Connection, id: i64) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE transactions SET category_id=NULL WHERE category_id=?1",
        params![id],
    )?;
    tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tx.commit()?;
    Ok(())
}

// ---- transactions ----

pub fn insert_transaction(conn: &Connection, draft: &TransactionDraft) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO transactions(type, description, amount, date, account_id,
                                  transfer_to_account_id, category_id, received_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            draft.kind.type_str(),
            draft.description,
            draft.amount.to_string(),
            draft.date.to_string(),
            draft.account_id,
            draft.kind.transfer_to_account_id(),
            draft.kind.category_id(),
            draft.kind.received_amount().map(|d| d.to_string()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_transaction(
    conn: &Connection,
    id: i64,
    draft: &TransactionDraft,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE transactions SET type=?1, description=?2, amount=?3, date=?4, account_id=?5,
                                 transfer_to_account_id=?6, category_id=?7, received_amount=?8
         WHERE id=?9",
        params![
            draft.kind.type_str(),
            draft.description,
            draft.amount.to_string(),
            draft.date.to_string(),
            draft.account_id,
            draft.kind.transfer_to_account_id(),
            draft.kind.category_id(),
            draft.kind.received_amount().map(|d| d.to_string()),
            id,
        ],
    )?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

/// Newest first, matching the display order of the in-memory log.
pub fn fetch_transactions(conn: &Connection) -> Result<Vec<Transaction>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, type, description, amount, date, account_id,
                transfer_to_account_id, category_id, received_amount
         FROM transactions ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], raw_transaction_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_transaction(row?)?);
    }
    Ok(out)
}

type RawTransaction = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    Option<i64>,
    Option<i64>,
    Option<String>,
);

fn raw_transaction_row(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn decode_transaction(raw: RawTransaction) -> Result<Transaction, StoreError> {
    let (id, type_str, description, amount, date, account_id, transfer_to, category_id, received) =
        raw;
    let kind = match type_str.as_str() {
        "expense" => TransactionKind::Expense { category_id },
        "income" => TransactionKind::Income { category_id },
        "transfer" => TransactionKind::Transfer {
            to_account_id: transfer_to.ok_or_else(|| {
                StoreError::Corrupted(format!("transfer {id} has no destination account"))
            })?,
            received_amount: received
                .map(|s| decimal_from_text(&s, "received amount"))
                .transpose()?,
        },
        other => {
            return Err(StoreError::Corrupted(format!(
                "unknown transaction type '{other}'"
            )));
        }
    };
    Ok(Transaction {
        id,
        description,
        amount: decimal_from_text(&amount, "amount")?,
        date: date_from_text(&date)?,
        account_id,
        kind,
    })
}

// ---- settings ----

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    use rusqlite::OptionalExtension;
    let v = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
