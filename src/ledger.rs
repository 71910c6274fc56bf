// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory mirror of the store and the balance math over it.
//!
//! One `Ledger` instance owns the canonical collections for a session. The
//! coordinator is the only writer; apply-methods run after the matching store
//! mutation succeeded, so readers always observe committed state.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::currency::{convert, RateTable};
use crate::errors::StoreError;
use crate::models::{Account, Category, Currency, Transaction, TransactionKind};
use crate::store;

#[derive(Debug, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    /// Most-recent-first display order. Balance math never depends on it.
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn load(conn: &Connection) -> Result<Self, StoreError> {
        Ok(Ledger {
            accounts: store::fetch_accounts(conn)?,
            categories: store::fetch_categories(conn)?,
            transactions: store::fetch_transactions(conn)?,
        })
    }

    pub fn from_parts(
        accounts: Vec<Account>,
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Ledger {
            accounts,
            categories,
            transactions,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn account(&self, id: i64) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Balance of one account: initial balance folded with every transaction
    /// that touches it. Pure addition over the whole log, so the result does
    /// not depend on transaction order. An unknown account has balance zero.
    pub fn balance(&self, account_id: i64) -> Decimal {
        let Some(account) = self.account(account_id) else {
            return Decimal::ZERO;
        };
        let mut balance = account.initial_balance;
        for tx in &self.transactions {
            match &tx.kind {
                TransactionKind::Income { .. } if tx.account_id == account_id => {
                    balance += tx.amount;
                }
                TransactionKind::Expense { .. } if tx.account_id == account_id => {
                    balance -= tx.amount;
                }
                TransactionKind::Transfer {
                    to_account_id,
                    received_amount,
                } => {
                    if tx.account_id == account_id {
                        balance -= tx.amount;
                    }
                    if *to_account_id == account_id {
                        balance += received_amount.unwrap_or(tx.amount);
                    }
                }
                _ => {}
            }
        }
        balance
    }

    /// Sum of all account balances in `target`. Accounts whose currency has
    /// no rate in the table are left out; the total is incomplete rather
    /// than an error.
    pub fn total_balance(&self, target: Currency, rates: &RateTable) -> Decimal {
        self.accounts
            .iter()
            .filter_map(|a| convert(self.balance(a.id), a.currency, target, rates))
            .sum()
    }

    // Writers below are called by the coordinator once persistence succeeded.

    pub fn apply_account_added(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub fn apply_account_updated(&mut self, updated: Account) {
        if let Some(slot) = self.accounts.iter_mut().find(|a| a.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn apply_account_deleted(&mut self, id: i64) {
        self.accounts.retain(|a| a.id != id);
    }

    pub fn apply_category_added(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn apply_category_updated(&mut self, updated: Category) {
        if let Some(slot) = self.categories.iter_mut().find(|c| c.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn apply_category_deleted(&mut self, id: i64) {
        self.categories.retain(|c| c.id != id);
    }

    /// Nulls out the category on every referencing transaction, mirroring the
    /// store-side unlink that runs when a category is deleted.
    pub fn apply_category_unlinked(&mut self, category_id: i64) {
        for tx in &mut self.transactions {
            match &mut tx.kind {
                TransactionKind::Expense { category_id: c } | TransactionKind::Income { category_id: c } => {
                    if *c == Some(category_id) {
                        *c = None;
                    }
                }
                TransactionKind::Transfer { .. } => {}
            }
        }
    }

    pub fn apply_transaction_added(&mut self, tx: Transaction) {
        self.transactions.insert(0, tx);
    }

    pub fn apply_transaction_updated(&mut self, updated: Transaction) {
        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn apply_transaction_deleted(&mut self, id: i64) {
        self.transactions.retain(|t| t.id != id);
    }
}
