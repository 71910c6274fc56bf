// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! USD to EGP snapshot rate: single-attempt fetch from the provider plus a
//! one-hour cache in the settings table. The cache write is the only side
//! effect; everything that needs a rate goes through `snapshot_rate`.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{LedgerError, RateError, StoreError};
use crate::store;

const PROVIDER_URL: &str = "https://open.er-api.com/v6/latest/USD";

const RATE_KEY: &str = "usd_egp_rate";
const RATE_FETCHED_AT_KEY: &str = "usd_egp_rate_fetched_at";

pub fn cache_ttl() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: std::collections::HashMap<String, f64>,
}

/// Extracts the USD to EGP rate from a provider response body. A missing,
/// zero, or negative quote is an error, never a 1:1 fallback.
pub fn parse_rate_response(body: &str) -> Result<Decimal, RateError> {
    let resp: RateResponse = serde_json::from_str(body)?;
    let raw = resp.rates.get("EGP").copied().ok_or(RateError::MissingRate)?;
    let rate = Decimal::try_from(raw).map_err(|_| RateError::MissingRate)?;
    if rate <= Decimal::ZERO {
        return Err(RateError::InvalidRate(rate));
    }
    Ok(rate)
}

/// One attempt against the provider. Callers decide whether to retry.
pub fn fetch_usd_to_egp_rate(client: &reqwest::blocking::Client) -> Result<Decimal, RateError> {
    let body = client
        .get(PROVIDER_URL)
        .send()?
        .error_for_status()?
        .text()?;
    parse_rate_response(&body)
}

/// Last stored snapshot with its fetch time, fresh or not.
pub fn read_snapshot(
    conn: &Connection,
) -> Result<Option<(Decimal, DateTime<Utc>)>, StoreError> {
    let Some(rate_s) = store::get_setting(conn, RATE_KEY)? else {
        return Ok(None);
    };
    let Some(at_s) = store::get_setting(conn, RATE_FETCHED_AT_KEY)? else {
        return Ok(None);
    };
    // An unreadable snapshot is treated as absent so the next read refetches.
    let Ok(rate) = rate_s.parse::<Decimal>() else {
        return Ok(None);
    };
    let Ok(at) = DateTime::parse_from_rfc3339(&at_s) else {
        return Ok(None);
    };
    Ok(Some((rate, at.with_timezone(&Utc))))
}

pub fn store_rate(conn: &Connection, rate: Decimal, now: DateTime<Utc>) -> Result<(), StoreError> {
    store::set_setting(conn, RATE_KEY, &rate.to_string())?;
    store::set_setting(conn, RATE_FETCHED_AT_KEY, &now.to_rfc3339())?;
    Ok(())
}

/// Cached rate, only while younger than the TTL. Expired snapshots are not
/// served; the caller must refetch.
pub fn cached_rate(conn: &Connection, now: DateTime<Utc>) -> Result<Option<Decimal>, StoreError> {
    match read_snapshot(conn)? {
        Some((rate, at)) if now - at < cache_ttl() => Ok(Some(rate)),
        _ => Ok(None),
    }
}

/// The rate every conversion uses: cache when fresh, otherwise one fetch
/// whose result is stored before being returned.
pub fn snapshot_rate(
    conn: &Connection,
    client: &reqwest::blocking::Client,
    now: DateTime<Utc>,
) -> Result<Decimal, LedgerError> {
    if let Some(rate) = cached_rate(conn, now)? {
        return Ok(rate);
    }
    let rate = fetch_usd_to_egp_rate(client)?;
    store_rate(conn, rate, now)?;
    Ok(rate)
}
