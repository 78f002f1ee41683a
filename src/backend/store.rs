// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{NewTransaction, Settings, Transaction};

/// Where transactions and settings live for one operation: the local store when
/// signed out, the remote store when a session exists.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;
    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction>;
    async fn delete_transaction(&self, id: &str) -> Result<()>;
    async fn get_settings(&self) -> Result<Settings>;
    async fn save_settings(&self, settings: &Settings) -> Result<()>;
}
