// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "SAR")]
    Sar,
    #[serde(rename = "SDG")]
    Sdg,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Sar, Currency::Sdg];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Sar => "SAR",
            Currency::Sdg => "SDG",
        }
    }

    /// The currency every transaction is mirrored into.
    pub fn other(&self) -> Currency {
        match self {
            Currency::Sar => Currency::Sdg,
            Currency::Sdg => Currency::Sar,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SAR" => Ok(Currency::Sar),
            "SDG" => Ok(Currency::Sdg),
            other => Err(Error::validation(format!(
                "Unknown currency '{}', expected SAR or SDG",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(Error::validation(format!(
                "Unknown transaction type '{}', expected income or expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn from_new(id: String, new: NewTransaction) -> Self {
        Self {
            id,
            kind: new.kind,
            amount: new.amount,
            currency: new.currency,
            category: new.category,
            date: new.date,
            note: new.note,
        }
    }

    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            amount: self.amount,
            currency: self.currency,
            category: self.category.clone(),
            date: self.date,
            note: self.note.clone(),
        }
    }

    pub fn category_label(&self) -> &str {
        if self.category.trim().is_empty() {
            "(uncategorized)"
        } else {
            &self.category
        }
    }
}

/// A transaction that has passed input validation but has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TxType,
    pub amount: Decimal,
    pub currency: Currency,
    pub category: String,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn new(
        kind: TxType,
        amount: f64,
        currency: Currency,
        category: impl Into<String>,
        date: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::validation(format!(
                "Amount must be a positive number, got {}",
                amount
            )));
        }
        let amount = Decimal::try_from(amount)
            .map_err(|e| Error::validation(format!("Amount {} out of range: {}", amount, e)))?;
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(Self {
            kind,
            amount,
            currency,
            category: category.into().trim().to_string(),
            date,
            note,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::validation(format!("Unknown theme '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            other => Err(Error::validation(format!("Unknown locale '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(
        rename = "budgetSAR",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub budget_sar: Option<Decimal>,
    #[serde(
        rename = "budgetSDG",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub budget_sdg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl Settings {
    /// Budget threshold for a currency; zero counts as unset.
    pub fn budget_for(&self, currency: Currency) -> Option<Decimal> {
        let b = match currency {
            Currency::Sar => self.budget_sar,
            Currency::Sdg => self.budget_sdg,
        };
        b.filter(|v| *v > Decimal::ZERO)
    }

    pub fn set_budget(&mut self, currency: Currency, amount: Option<Decimal>) {
        match currency {
            Currency::Sar => self.budget_sar = amount,
            Currency::Sdg => self.budget_sdg = amount,
        }
    }
}

/// Persisted form of the last successfully fetched rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(rename = "lastUpdated", with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}
