// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense totals over a time window, viewed in both currencies.
//!
//! Every transaction counts twice: once in its native currency and once converted
//! into the other one, so the SAR and SDG figures are two complete views of the
//! same activity rather than a partition of it.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::convert;
use crate::models::{Currency, Settings, Transaction, TxType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income_sar: Decimal,
    pub expense_sar: Decimal,
    pub income_sdg: Decimal,
    pub expense_sdg: Decimal,
}

impl Summary {
    pub fn income(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Sar => self.income_sar,
            Currency::Sdg => self.income_sdg,
        }
    }

    pub fn expense(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Sar => self.expense_sar,
            Currency::Sdg => self.expense_sdg,
        }
    }

    pub fn net(&self, currency: Currency) -> Decimal {
        self.income(currency) - self.expense(currency)
    }

    /// Share of income in all activity, summed over both currency views. Zero when
    /// there is no activity.
    pub fn income_share(&self) -> Decimal {
        let income = self.income_sar + self.income_sdg;
        let total = income + self.expense_sar + self.expense_sdg;
        if total.is_zero() {
            return Decimal::ZERO;
        }
        income.checked_div(total).unwrap_or(Decimal::ZERO)
    }

    fn add(&mut self, kind: TxType, currency: Currency, amount: Decimal) {
        let slot = match (kind, currency) {
            (TxType::Income, Currency::Sar) => &mut self.income_sar,
            (TxType::Expense, Currency::Sar) => &mut self.expense_sar,
            (TxType::Income, Currency::Sdg) => &mut self.income_sdg,
            (TxType::Expense, Currency::Sdg) => &mut self.expense_sdg,
        };
        *slot = slot.checked_add(amount).unwrap_or(*slot);
    }
}

/// Totals for transactions dated at or after `window_start`. `rate` is SDG per SAR.
pub fn summarize(transactions: &[Transaction], window_start: DateTime<Utc>, rate: Decimal) -> Summary {
    let mut s = Summary::default();
    for tx in transactions.iter().filter(|tx| tx.date >= window_start) {
        // negative magnitudes are malformed; they contribute nothing
        let amount = tx.amount.max(Decimal::ZERO);
        let other = tx.currency.other();
        s.add(tx.kind, tx.currency, amount);
        s.add(tx.kind, other, convert(amount, tx.currency, other, rate));
    }
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Day,
    Week,
    Month,
}

impl Window {
    /// Inclusive lower bound of this window relative to `now`, at local midnight in
    /// `now`'s time zone.
    pub fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>, week_start: Weekday) -> DateTime<Utc> {
        let today = now.date_naive();
        let date = match self {
            Window::Day => today,
            Window::Week => {
                let back = (7 + today.weekday().num_days_from_monday()
                    - week_start.num_days_from_monday())
                    % 7;
                today - Duration::days(i64::from(back))
            }
            Window::Month => today.with_day(1).unwrap_or(today),
        };
        local_midnight(&now.timezone(), date)
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        // midnight skipped by a DST jump
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dashboard {
    pub rate: Decimal,
    pub day: Summary,
    pub week: Summary,
    pub month: Summary,
}

impl Dashboard {
    pub fn compute<Tz: TimeZone>(
        transactions: &[Transaction],
        now: &DateTime<Tz>,
        rate: Decimal,
        week_start: Weekday,
    ) -> Self {
        let at = |w: Window| summarize(transactions, w.start(now, week_start), rate);
        Self {
            rate,
            day: at(Window::Day),
            week: at(Window::Week),
            month: at(Window::Month),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub currency: Currency,
    pub budget: Decimal,
    pub spent: Decimal,
}

/// Budgets exceeded by expenses since `month_start`. Unset or zero budgets never
/// trigger.
pub fn budget_alerts(
    transactions: &[Transaction],
    settings: &Settings,
    month_start: DateTime<Utc>,
    rate: Decimal,
) -> Vec<BudgetAlert> {
    let month = summarize(transactions, month_start, rate);
    Currency::ALL
        .iter()
        .filter_map(|&currency| {
            let budget = settings.budget_for(currency)?;
            let spent = month.expense(currency);
            (spent > budget).then_some(BudgetAlert {
                currency,
                budget,
                spent,
            })
        })
        .collect()
}
