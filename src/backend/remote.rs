// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::backend::rows::{
    normalize_row, normalize_rows, settings_from_row, settings_payload, transaction_payload,
};
use crate::backend::store::TransactionStore;
use crate::errors::{Error, Result};
use crate::models::{NewTransaction, Settings, Transaction};

pub const TRANSACTIONS_TABLE: &str = "transactions";
pub const SETTINGS_TABLE: &str = "user_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub eq: Vec<(String, String)>,
    pub order: Option<(String, Order)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.eq.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }
}

/// Hosted database client. Rows are JSON objects; the client owns authentication.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Signed-in user id, if any.
    async fn session(&self) -> Result<Option<String>>;
    async fn query(&self, table: &str, filter: &Filter) -> Result<Vec<Value>>;
    /// Returns the inserted rows as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>>;
    async fn delete(&self, table: &str, id: &str) -> Result<()>;
    async fn upsert(&self, table: &str, row: Value) -> Result<()>;
}

/// The remote store scoped to one signed-in user.
#[derive(Clone)]
pub struct RemoteStore {
    client: Arc<dyn RemoteClient>,
    user_id: String,
}

impl RemoteStore {
    pub fn new(client: Arc<dyn RemoteClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Bulk insert; returns how many rows the store reports as inserted.
    pub async fn insert_all(&self, list: &[Transaction]) -> Result<usize> {
        let rows: Vec<Value> = list
            .iter()
            .map(|tx| transaction_payload(&self.user_id, &tx.to_new()))
            .collect();
        let inserted = self.client.insert(TRANSACTIONS_TABLE, rows).await?;
        Ok(inserted.len())
    }
}

#[async_trait]
impl TransactionStore for RemoteStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let filter = Filter::new()
            .eq("user_id", &self.user_id)
            .order_by("date", Order::Desc);
        let rows = self.client.query(TRANSACTIONS_TABLE, &filter).await?;
        Ok(normalize_rows(&rows))
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let payload = transaction_payload(&self.user_id, &new);
        let inserted = self.client.insert(TRANSACTIONS_TABLE, vec![payload]).await?;
        inserted
            .first()
            .and_then(normalize_row)
            .ok_or_else(|| Error::remote("insert did not return a usable row"))
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        self.client.delete(TRANSACTIONS_TABLE, id).await
    }

    async fn get_settings(&self) -> Result<Settings> {
        let filter = Filter::new().eq("user_id", &self.user_id);
        let rows = self.client.query(SETTINGS_TABLE, &filter).await?;
        Ok(rows.first().map(settings_from_row).unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let row = settings_payload(&self.user_id, settings, Utc::now());
        self.client.upsert(SETTINGS_TABLE, row).await
    }
}
