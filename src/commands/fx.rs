// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use anyhow::{anyhow, Context as _, Result};
use chrono::Local;

use crate::commands::Context;
use crate::currency::convert;
use crate::models::Currency;
use crate::rates::RateState;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub async fn handle(ctx: &Context, m: &clap::ArgMatches, every: Duration) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(ctx, sub).await?,
        Some(("refresh", _)) => refresh(ctx).await?,
        Some(("convert", sub)) => convert_amount(ctx, sub).await?,
        Some(("watch", _)) => watch(ctx, every).await?,
        _ => {}
    }
    Ok(())
}

fn state_row(s: &RateState) -> Vec<String> {
    vec![
        format!("{:.4}", s.rate),
        s.last_updated
            .map(|t| t.with_timezone(&Local).to_rfc3339())
            .unwrap_or_else(|| "never".into()),
        if s.error { "failed" } else { "ok" }.to_string(),
    ]
}

async fn show(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    ctx.rates.load_cached().await;
    let state = ctx.rates.state();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state)? {
        println!(
            "{}",
            pretty_table(&["SDG per SAR", "Updated", "Last fetch"], vec![state_row(&state)])
        );
    }
    Ok(())
}

async fn refresh(ctx: &Context) -> Result<()> {
    ctx.rates.load_cached().await;
    match ctx.rates.refresh().await {
        Ok(rate) => println!("1 SAR = {:.4} SDG", rate),
        Err(e) => {
            let kept = ctx.rates.rate();
            println!("Refresh failed ({}); keeping cached rate {:.4}", e, kept);
        }
    }
    Ok(())
}

async fn convert_amount(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let get = |name: &str| {
        sub.get_one::<String>(name)
            .ok_or_else(|| anyhow!("Missing --{}", name))
    };
    let amount = parse_decimal(get("amount")?)?;
    let from: Currency = get("from")?.parse()?;
    let to: Currency = get("to")?.parse()?;
    let rate = ctx.current_rate().await;
    let res = convert(amount, from, to, rate);
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}

async fn watch(ctx: &Context, every: Duration) -> Result<()> {
    let mut updates = ctx.rates.subscribe();
    let handle = ctx.rates.clone().spawn(every);
    println!("Refreshing every {}s, Ctrl-C to stop", every.as_secs());
    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed.context("rate provider stopped")?;
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    println!("{}", state_row(&state).join("  "));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    handle.cancel();
    Ok(())
}
