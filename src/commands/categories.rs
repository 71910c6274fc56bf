// Copyright (c) Piastre.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::coordinator;
use crate::ledger::Ledger;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &mut Connection, ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let icon = sub.get_one::<String>("icon").unwrap();
            let color = sub.get_one::<String>("color").unwrap();
            coordinator::add_category(conn, ledger, name, icon, color)?;
            println!("Added category '{}'", name.trim());
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            if !maybe_print_json(json_flag, jsonl_flag, &ledger.categories())? {
                let rows: Vec<Vec<String>> = ledger
                    .categories()
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.icon.clone(),
                            c.color.clone(),
                            if c.is_default { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Icon", "Color", "Default"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let existing = ledger
                .category_by_name(name)
                .ok_or_else(|| anyhow!("Category '{}' not found", name))?
                .clone();
            let new_name = sub
                .get_one::<String>("new-name")
                .cloned()
                .unwrap_or(existing.name);
            let icon = sub.get_one::<String>("icon").cloned().unwrap_or(existing.icon);
            let color = sub
                .get_one::<String>("color")
                .cloned()
                .unwrap_or(existing.color);
            coordinator::update_category(conn, ledger, existing.id, &new_name, &icon, &color)?;
            println!("Updated category '{}'", new_name.trim());
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = ledger
                .category_by_name(name)
                .ok_or_else(|| anyhow!("Category '{}' not found", name))?
                .id;
            coordinator::delete_category(conn, ledger, id)?;
            println!("Removed category '{}'; its transactions are now uncategorized", name);
        }
        _ => {}
    }
    Ok(())
}
