// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::RateError;
use crate::models::Currency;

/// Snapshot conversion rates keyed by (from, to) pair. Built from a single
/// USD to EGP quote; the reciprocal pair is derived at construction so
/// lookups never divide.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl RateTable {
    /// Builds the table from one USD to EGP rate. Rejects zero and negative
    /// rates; those are fetch failures upstream, not usable quotes.
    pub fn from_usd_to_egp(rate: Decimal) -> Result<Self, RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate(rate));
        }
        let mut rates = HashMap::new();
        rates.insert((Currency::Usd, Currency::Egp), rate);
        rates.insert((Currency::Egp, Currency::Usd), Decimal::ONE / rate);
        Ok(RateTable { rates })
    }

    pub fn rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.rates.get(&(from, to)).copied()
    }
}

/// Converts `amount` between currencies using the snapshot table.
/// Same-currency conversion is the identity and needs no table entry.
/// Returns `None` when the pair has no rate; callers decide whether to fail
/// open (exclude from a total) or surface the gap.
pub fn convert(
    amount: Decimal,
    from: Currency,
    to: Currency,
    rates: &RateTable,
) -> Option<Decimal> {
    if from == to {
        return Some(amount);
    }
    rates.rate(from, to).map(|r| amount * r)
}
