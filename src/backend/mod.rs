// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Uniform access to transactions and settings whether or not a user is signed in.
//!
//! Each call looks up the session once and routes to the remote store (signed in)
//! or the local store (signed out). Remote reads fall back to local data; remote
//! transaction writes do not, so the two stores never silently diverge.

pub mod local;
pub mod remote;
pub mod rows;
pub mod store;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::db::KeyValueStore;
use crate::errors::Result;
use crate::models::{NewTransaction, Settings, Transaction};

pub use local::LocalStore;
pub use remote::{Filter, Order, RemoteClient, RemoteStore};
pub use store::TransactionStore;

enum Route {
    Local,
    Remote(RemoteStore),
}

pub struct Backend {
    local: LocalStore,
    remote: Option<Arc<dyn RemoteClient>>,
}

impl Backend {
    pub fn new(kv: Arc<dyn KeyValueStore>, remote: Option<Arc<dyn RemoteClient>>) -> Self {
        Self {
            local: LocalStore::new(kv),
            remote,
        }
    }

    /// A backend with no remote attached; every call uses the local store.
    pub fn offline(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::new(kv, None)
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// A failing session lookup counts as signed out.
    pub async fn session_user_id(&self) -> Option<String> {
        let client = self.remote.as_ref()?;
        match client.session().await {
            Ok(user) => user.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!("session lookup failed, using local storage: {e}");
                None
            }
        }
    }

    async fn route(&self) -> Route {
        match (self.session_user_id().await, &self.remote) {
            (Some(user_id), Some(client)) => Route::Remote(RemoteStore::new(client.clone(), user_id)),
            _ => Route::Local,
        }
    }

    fn store<'a>(&'a self, route: &'a Route) -> &'a dyn TransactionStore {
        match route {
            Route::Local => &self.local,
            Route::Remote(remote) => remote,
        }
    }

    async fn local_transactions(&self) -> Vec<Transaction> {
        self.local.list_transactions().await.unwrap_or_else(|e| {
            error!("could not read local transactions: {e}");
            Vec::new()
        })
    }

    async fn local_settings(&self) -> Settings {
        self.local.get_settings().await.unwrap_or_else(|e| {
            error!("could not read local settings: {e}");
            Settings::default()
        })
    }

    pub async fn get_all_transactions(&self) -> Vec<Transaction> {
        match self.route().await {
            Route::Local => self.local_transactions().await,
            Route::Remote(remote) => match remote.list_transactions().await {
                Ok(list) => list,
                Err(e) => {
                    warn!("remote transaction query failed, serving local copy: {e}");
                    self.local_transactions().await
                }
            },
        }
    }

    /// `None` when the write failed; remote failures are not queued locally.
    pub async fn add_transaction(&self, new: NewTransaction) -> Option<Transaction> {
        let route = self.route().await;
        match self.store(&route).add_transaction(new).await {
            Ok(tx) => {
                debug!(id = %tx.id, "transaction added");
                Some(tx)
            }
            Err(e) => {
                error!("could not add transaction: {e}");
                None
            }
        }
    }

    pub async fn delete_transaction(&self, id: &str) -> bool {
        let route = self.route().await;
        match self.store(&route).delete_transaction(id).await {
            Ok(()) => true,
            Err(e) => {
                error!("could not delete transaction {id}: {e}");
                false
            }
        }
    }

    /// Missing remote settings are empty settings, not an error.
    pub async fn get_settings(&self) -> Settings {
        match self.route().await {
            Route::Local => self.local_settings().await,
            Route::Remote(remote) => match remote.get_settings().await {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("remote settings query failed, serving local copy: {e}");
                    self.local_settings().await
                }
            },
        }
    }

    /// A failed remote upsert is cached locally instead, which may drift from the
    /// remote copy until the next successful save.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        if let Route::Remote(remote) = self.route().await {
            match remote.save_settings(settings).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!("remote settings save failed, caching locally: {e}"),
            }
        }
        self.local.save_settings(settings).await
    }

    /// Copy every local transaction to the remote store in one insert and return the
    /// inserted count. This is a plain push: running it again inserts the same rows
    /// again.
    pub async fn sync_local_to_remote(&self) -> usize {
        let Route::Remote(remote) = self.route().await else {
            return 0;
        };
        let list = self.local_transactions().await;
        if list.is_empty() {
            return 0;
        }
        match remote.insert_all(&list).await {
            Ok(count) => {
                info!(count, user = remote.user_id(), "pushed local transactions");
                count
            }
            Err(e) => {
                error!("sync to remote store failed: {e}");
                0
            }
        }
    }
}
