// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON rows <-> `Transaction` / `Settings`, shared by the local and remote stores so
//! both hand out the same shape.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::warn;

use crate::models::{Currency, NewTransaction, Settings, Transaction, TxType};
use crate::utils::parse_timestamp;

/// Map a stored row to a transaction. Rows without a usable id, type, currency, or
/// date are rejected; an unreadable amount becomes zero.
pub fn normalize_row(row: &Value) -> Option<Transaction> {
    let id = match row.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let kind = row.get("type")?.as_str()?.parse::<TxType>().ok()?;
    let currency = row.get("currency")?.as_str()?.parse::<Currency>().ok()?;
    let date = parse_timestamp(row.get("date")?.as_str()?)?;
    let category = row
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let note = row
        .get("note")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Some(Transaction {
        id,
        kind,
        amount: lenient_decimal(row.get("amount")).unwrap_or(Decimal::ZERO),
        currency,
        category,
        date,
        note,
    })
}

pub fn normalize_rows(rows: &[Value]) -> Vec<Transaction> {
    rows.iter()
        .filter_map(|row| {
            let tx = normalize_row(row);
            if tx.is_none() {
                warn!("skipping malformed transaction row: {row}");
            }
            tx
        })
        .collect()
}

/// Numbers or numeric strings; anything non-finite or unparseable is `None`.
pub fn lenient_decimal(v: Option<&Value>) -> Option<Decimal> {
    let from_f64 = |f: f64| {
        if f.is_finite() {
            Decimal::try_from(f).ok()
        } else {
            None
        }
    };
    match v? {
        Value::Number(n) => n.as_f64().and_then(from_f64),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_f64))
        }
        _ => None,
    }
}

pub fn transaction_payload(user_id: &str, new: &NewTransaction) -> Value {
    let category = Some(new.category.as_str()).filter(|c| !c.is_empty());
    json!({
        "user_id": user_id,
        "type": new.kind.as_str(),
        "amount": new.amount.to_f64(),
        "currency": new.currency.code(),
        "category": category,
        "date": new.date.to_rfc3339(),
        "note": new.note.as_deref(),
    })
}

pub fn settings_from_row(row: &Value) -> Settings {
    let text = |key: &str| row.get(key).and_then(Value::as_str);
    Settings {
        budget_sar: lenient_decimal(row.get("budget_sar")),
        budget_sdg: lenient_decimal(row.get("budget_sdg")),
        theme: text("theme").and_then(|s| s.parse().ok()),
        locale: text("locale").and_then(|s| s.parse().ok()),
    }
}

pub fn settings_payload(user_id: &str, settings: &Settings, now: DateTime<Utc>) -> Value {
    json!({
        "user_id": user_id,
        "budget_sar": settings.budget_sar.and_then(|b| b.to_f64()),
        "budget_sdg": settings.budget_sdg.and_then(|b| b.to_f64()),
        "theme": settings.theme,
        "locale": settings.locale,
        "updated_at": now.to_rfc3339(),
    })
}
