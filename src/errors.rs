// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Field-level failures caught before anything reaches storage.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("received amount must be greater than zero")]
    NonPositiveReceivedAmount,

    #[error("received amount only applies to transfers between currencies")]
    UnexpectedReceivedAmount,

    #[error("description must not be empty")]
    EmptyDescription,

    #[error("account name must not be empty")]
    EmptyAccountName,

    #[error("category name must not be empty")]
    EmptyCategoryName,

    #[error("category name must be at most 30 characters")]
    CategoryNameTooLong,

    #[error("unknown icon '{0}'")]
    UnknownIcon(String),

    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),

    #[error("account {0} does not exist")]
    UnknownAccount(i64),

    #[error("category {0} does not exist")]
    UnknownCategory(i64),

    #[error("transaction {0} does not exist")]
    UnknownTransaction(i64),

    #[error("transfer source and destination must differ")]
    TransferToSameAccount,
}

/// Storage failures. Open/init problems are kept distinguishable from
/// failures of individual statements.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("database operation failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("corrupt record: {0}")]
    Corrupted(String),
}

/// Exchange rate provider failures. A missing or non-positive rate is a
/// failure, never a silent 1:1 fallback.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("provider returned no usable USD to EGP rate")]
    MissingRate,

    #[error("invalid exchange rate {0}")]
    InvalidRate(Decimal),
}

/// Top-level error for mutation and conversion entry points.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("account has {transaction_count} transaction(s); delete or reassign them first")]
    ReferentialBlock { transaction_count: i64 },

    #[error("storage failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rate(#[from] RateError),
}
