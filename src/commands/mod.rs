// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod fx;
pub mod summary;
pub mod transactions;

use std::sync::Arc;
use std::time::Duration;

use chrono::Weekday;
use rust_decimal::Decimal;

use crate::backend::Backend;
use crate::rates::RateProvider;

/// Everything a command handler needs, built once in `main`.
pub struct Context {
    pub backend: Backend,
    pub rates: Arc<RateProvider>,
    pub week_start: Weekday,
    /// Age after which a cached rate is fetched again.
    pub rate_max_age: Duration,
}

impl Context {
    /// Cached rate, refetched when missing or stale. Zero when nothing was ever
    /// fetched, which leaves converted figures at zero.
    pub async fn current_rate(&self) -> Decimal {
        self.rates.fresh_rate(self.rate_max_age).await
    }
}
