// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::Context;
use crate::models::Currency;
use crate::summary::{summarize, Window};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub async fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ctx, sub).await?,
        Some(("show", sub)) => show(ctx, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn set(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let currency: Currency = sub
        .get_one::<String>("currency")
        .ok_or_else(|| anyhow!("Missing --currency"))?
        .parse()?;
    let amount = parse_decimal(
        sub.get_one::<String>("amount")
            .ok_or_else(|| anyhow!("Missing --amount"))?,
    )?;
    if amount < Decimal::ZERO {
        return Err(anyhow!("Budget cannot be negative"));
    }
    let mut settings = ctx.backend.get_settings().await;
    settings.set_budget(currency, Some(amount).filter(|a| !a.is_zero()));
    ctx.backend.save_settings(&settings).await?;
    if amount.is_zero() {
        println!("Budget for {} removed", currency);
    } else {
        println!("Budget set for {} = {}", currency, amount);
    }
    Ok(())
}

#[derive(Serialize)]
struct BudgetRow {
    currency: Currency,
    budget: Option<Decimal>,
    spent: Decimal,
    exceeded: bool,
}

async fn show(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let settings = ctx.backend.get_settings().await;
    let list = ctx.backend.get_all_transactions().await;
    let rate = ctx.current_rate().await;
    let month_start = Window::Month.start(&Local::now(), ctx.week_start);
    let month = summarize(&list, month_start, rate);

    let data: Vec<BudgetRow> = Currency::ALL
        .iter()
        .map(|&currency| {
            let budget = settings.budget_for(currency);
            let spent = month.expense(currency);
            BudgetRow {
                currency,
                budget,
                spent,
                exceeded: budget.is_some_and(|b| spent > b),
            }
        })
        .collect();

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.currency.to_string(),
                    r.budget
                        .map(|b| format!("{:.2}", b))
                        .unwrap_or_else(|| "-".into()),
                    format!("{:.2}", r.spent),
                    if r.exceeded { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["CCY", "Budget", "Spent this month", "Exceeded"], rows)
        );
    }
    Ok(())
}
