// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Closed currency set. EGP is the base currency everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Egp,
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Egp => "EGP",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EGP" => Ok(Currency::Egp),
            "USD" => Ok(Currency::Usd),
            other => Err(ValidationError::UnknownCurrency(other.to_string())),
        }
    }
}

pub const MAX_CATEGORY_NAME_LEN: usize = 30;

/// Icon identifiers a category may carry.
pub const ICONS: &[&str] = &[
    "restaurant", "fast-food", "cafe", "beer",
    "car", "bus", "airplane", "bicycle",
    "bag-handle", "cart", "shirt", "gift",
    "receipt", "home", "flash", "wifi",
    "film", "game-controller", "musical-notes", "headset",
    "medical", "fitness", "heart", "bandage",
    "school", "book", "library", "laptop",
    "cash", "card", "trending-up", "trending-down",
    "phone-portrait", "camera", "paw", "leaf",
    "ellipsis-horizontal-circle",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub initial_balance: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
}

/// Per-type payload of a transaction. Which ids a transaction may carry is a
/// property of the variant: only transfers have a destination, only
/// expense/income may have a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Expense {
        category_id: Option<i64>,
    },
    Income {
        category_id: Option<i64>,
    },
    Transfer {
        to_account_id: i64,
        /// Amount credited to the destination, in its own currency. Set only
        /// when the transfer crosses currencies.
        received_amount: Option<Decimal>,
    },
}

impl TransactionKind {
    pub fn type_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense { .. } => "expense",
            TransactionKind::Income { .. } => "income",
            TransactionKind::Transfer { .. } => "transfer",
        }
    }

    pub fn category_id(&self) -> Option<i64> {
        match self {
            TransactionKind::Expense { category_id } | TransactionKind::Income { category_id } => {
                *category_id
            }
            TransactionKind::Transfer { .. } => None,
        }
    }

    pub fn transfer_to_account_id(&self) -> Option<i64> {
        match self {
            TransactionKind::Transfer { to_account_id, .. } => Some(*to_account_id),
            _ => None,
        }
    }

    pub fn received_amount(&self) -> Option<Decimal> {
        match self {
            TransactionKind::Transfer {
                received_amount, ..
            } => *received_amount,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    /// Always positive, in the currency of the source account. Direction is
    /// implied by the kind.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: i64,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    /// True when the account is the source or the transfer destination.
    pub fn touches_account(&self, account_id: i64) -> bool {
        self.account_id == account_id || self.kind.transfer_to_account_id() == Some(account_id)
    }
}

/// Unpersisted transaction fields, as accepted by the mutation entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: i64,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl TransactionDraft {
    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            account_id: self.account_id,
            kind: self.kind,
        }
    }
}
