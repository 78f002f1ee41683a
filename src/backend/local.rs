// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::rows::normalize_rows;
use crate::backend::store::TransactionStore;
use crate::db::KeyValueStore;
use crate::errors::Result;
use crate::models::{NewTransaction, Settings, Transaction};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const SETTINGS_KEY: &str = "settings";

/// Transactions and settings kept on the device, each collection stored as one JSON
/// document and rewritten whole on every change.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The stored rows as written, including any the reader would skip.
    async fn raw_rows(&self) -> Result<Vec<Value>> {
        match self.kv.get(TRANSACTIONS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_rows(&self, rows: &[Value]) -> Result<()> {
        let raw = serde_json::to_string(rows)?;
        self.kv.set(TRANSACTIONS_KEY, &raw).await
    }
}

fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl TransactionStore for LocalStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(normalize_rows(&self.raw_rows().await?))
    }

    // Writes edit the raw rows so unreadable ones survive untouched.
    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let mut rows = self.raw_rows().await?;
        let tx = Transaction::from_new(Uuid::new_v4().to_string(), new);
        rows.push(serde_json::to_value(&tx)?);
        self.write_rows(&rows).await?;
        Ok(tx)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        let mut rows = self.raw_rows().await?;
        rows.retain(|row| row_id(row).as_deref() != Some(id));
        self.write_rows(&rows).await
    }

    async fn get_settings(&self) -> Result<Settings> {
        match self.kv.get(SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Settings::default()),
        }
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.kv.set(SETTINGS_KEY, &raw).await
    }
}
