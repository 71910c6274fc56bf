// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use piastre::{cli, commands, db, ledger::Ledger};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let mut ledger = Ledger::load(&conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, &mut ledger, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut conn, &mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &ledger, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &ledger)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
