// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::Connection;

use crate::currency::{convert, RateTable};
use crate::rates;
use crate::utils::{http_client, parse_currency, parse_decimal};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("fetch", _)) => {
            // Manual refresh bypasses the cache on purpose.
            let client = http_client()?;
            let rate = rates::fetch_usd_to_egp_rate(&client)?;
            rates::store_rate(conn, rate, Utc::now())?;
            println!("USD/EGP rate: {}", rate);
        }
        Some(("show", _)) => match rates::read_snapshot(conn)? {
            None => println!("No cached rate; run 'piastre fx fetch'"),
            Some((rate, at)) => {
                let age = Utc::now() - at;
                let stale = age >= rates::cache_ttl();
                println!(
                    "USD/EGP rate: {} (fetched {} minutes ago{})",
                    rate,
                    age.num_minutes(),
                    if stale { ", stale" } else { "" }
                );
            }
        },
        Some(("convert", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let from = parse_currency(sub.get_one::<String>("from").unwrap())?;
            let to = parse_currency(sub.get_one::<String>("to").unwrap())?;
            let table = if from == to {
                RateTable::default()
            } else {
                let client = http_client()?;
                let rate = rates::snapshot_rate(conn, &client, Utc::now())?;
                RateTable::from_usd_to_egp(rate)?
            };
            let result = convert(amount, from, to, &table)
                .ok_or_else(|| anyhow!("No rate available for {} to {}", from, to))?;
            println!("{} {} -> {:.4} {}", amount, from, result, to);
        }
        _ => {}
    }
    Ok(())
}
