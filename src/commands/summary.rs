// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;

use crate::commands::Context;
use crate::models::Currency;
use crate::summary::{Dashboard, Summary};
use crate::utils::{maybe_print_json, pretty_table};

pub async fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let list = ctx.backend.get_all_transactions().await;
    let rate = ctx.current_rate().await;
    let dash = Dashboard::compute(&list, &Local::now(), rate, ctx.week_start);

    if maybe_print_json(json_flag, jsonl_flag, &dash)? {
        return Ok(());
    }

    let state = ctx.rates.state();
    let rate_line = if rate.is_zero() {
        "unavailable".to_string()
    } else {
        format!("{:.2}", rate)
    };
    let updated = state
        .last_updated
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!("1 SAR = {} SDG (updated: {})", rate_line, updated);

    let mut data = Vec::new();
    for (label, s) in [("Today", &dash.day), ("This week", &dash.week), ("This month", &dash.month)] {
        for ccy in Currency::ALL {
            data.push(row(label, s, ccy));
        }
    }
    println!(
        "{}",
        pretty_table(&["Period", "CCY", "Income", "Expense", "Net"], data)
    );
    println!(
        "Income share today: {}%",
        (dash.day.income_share() * Decimal::ONE_HUNDRED).round()
    );
    Ok(())
}

fn row(label: &str, s: &Summary, ccy: Currency) -> Vec<String> {
    vec![
        label.to_string(),
        ccy.to_string(),
        format!("{:.2}", s.income(ccy)),
        format!("{:.2}", s.expense(ccy)),
        format!("{:.2}", s.net(ccy)),
    ]
}
