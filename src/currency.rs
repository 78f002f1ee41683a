// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::Currency;

/// Convert `amount` between SAR and SDG, where `rate` is the number of SDG per 1 SAR.
///
/// Same-currency conversion is the identity. A rate that is zero or negative is
/// treated as unavailable and yields zero, as does an overflowing result.
pub fn convert(amount: Decimal, from: Currency, to: Currency, rate: Decimal) -> Decimal {
    if from == to {
        return amount;
    }
    if rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let converted = match (from, to) {
        (Currency::Sar, Currency::Sdg) => amount.checked_mul(rate),
        (Currency::Sdg, Currency::Sar) => amount.checked_div(rate),
        _ => None,
    };
    converted.unwrap_or(Decimal::ZERO)
}

pub fn fmt_money(d: &Decimal, ccy: Currency) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}
