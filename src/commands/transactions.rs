// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use serde::Serialize;

use crate::commands::Context;
use crate::currency::fmt_money;
use crate::models::{Currency, NewTransaction, Transaction, TxType};
use crate::summary::{budget_alerts, Window};
use crate::utils::{maybe_print_json, parse_amount, parse_date, pretty_table};

pub async fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub).await?,
        Some(("list", sub)) => list(ctx, sub).await?,
        Some(("rm", sub)) => remove(ctx, sub).await?,
        _ => {}
    }
    Ok(())
}

/// Validate `tx add` arguments into a transaction ready to store.
pub fn new_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let arg = |name: &str| {
        sub.get_one::<String>(name)
            .ok_or_else(|| anyhow!("Missing --{}", name))
    };
    let kind: TxType = arg("type")?.parse()?;
    let currency: Currency = arg("currency")?.parse()?;
    let amount = parse_amount(arg("amount")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now(),
    };
    let category = sub.get_one::<String>("category").cloned().unwrap_or_default();
    let note = sub.get_one::<String>("note").cloned();
    Ok(NewTransaction::new(kind, amount, currency, category, date, note)?)
}

async fn add(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let new = new_from_args(sub)?;
    let created = ctx
        .backend
        .add_transaction(new)
        .await
        .ok_or_else(|| anyhow!("Transaction was not saved"))?;
    println!(
        "Recorded {} {} on {} (id: {})",
        created.kind,
        fmt_money(&created.amount, created.currency),
        created.date.format("%Y-%m-%d"),
        created.id
    );

    let list = ctx.backend.get_all_transactions().await;
    let settings = ctx.backend.get_settings().await;
    let rate = ctx.current_rate().await;
    let month_start = Window::Month.start(&Local::now(), ctx.week_start);
    for alert in budget_alerts(&list, &settings, month_start, rate) {
        println!(
            "Budget alert: {} spent this month, budget is {}",
            fmt_money(&alert.spent, alert.currency),
            fmt_money(&alert.budget, alert.currency)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            date: tx.date.to_rfc3339(),
            kind: tx.kind.to_string(),
            amount: format!("{:.2}", tx.amount),
            currency: tx.currency.to_string(),
            category: tx.category_label().to_string(),
            note: tx.note.clone().unwrap_or_default(),
        }
    }
}

/// `tx list` narrowing. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub kind: Option<TxType>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn from_args(sub: &clap::ArgMatches) -> Result<Self> {
        let kind = match sub.get_one::<String>("type").map(String::as_str) {
            None | Some("all") => None,
            Some(t) => Some(t.parse::<TxType>()?),
        };
        let text = |name: &str| {
            sub.get_one::<String>(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Ok(Self {
            kind,
            category: text("category"),
            search: text("search"),
        })
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.kind.is_some_and(|k| k != tx.kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if tx.category_label().to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        match &self.search {
            Some(q) => {
                let q = q.to_lowercase();
                tx.category.to_lowercase().contains(&q)
                    || tx
                        .note
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&q))
            }
            None => true,
        }
    }
}

/// Matching transactions, newest first, optionally capped at `limit`.
pub fn rows_for(
    list: &[Transaction],
    filter: &ListFilter,
    limit: Option<usize>,
) -> Vec<TransactionRow> {
    let mut sorted: Vec<&Transaction> = list.iter().filter(|tx| filter.matches(tx)).collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(TransactionRow::from)
        .collect()
}

async fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let all = ctx.backend.get_all_transactions().await;
    let filter = ListFilter::from_args(sub)?;
    let data = rows_for(&all, &filter, sub.get_one::<usize>("limit").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.date, r.kind, r.amount, r.currency, r.category, r.note, r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Amount", "CCY", "Category", "Note", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

async fn remove(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("Missing transaction id"))?;
    if !ctx.backend.delete_transaction(id).await {
        return Err(anyhow!("Could not delete transaction '{}'", id));
    }
    println!("Removed transaction '{}'", id);
    Ok(())
}
