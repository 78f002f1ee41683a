// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc, Weekday};
use dualledger::models::{Currency, Settings, Transaction, TxType};
use dualledger::summary::{budget_alerts, summarize, Dashboard, Summary, Window};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: &str, kind: TxType, amount: &str, currency: Currency, date: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind,
        amount: dec(amount),
        currency,
        category: String::new(),
        date,
        note: None,
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[test]
fn empty_list_is_all_zero() {
    let s = summarize(&[], at(2025, 3, 1, 0, 0), dec("10"));
    assert_eq!(s, Summary::default());
    assert_eq!(s.income_share(), Decimal::ZERO);
    assert_eq!(s.net(Currency::Sar), Decimal::ZERO);
}

#[test]
fn today_window_mirrors_each_transaction_into_the_other_currency() {
    let today = at(2025, 3, 12, 0, 0);
    let list = vec![
        tx("1", TxType::Income, "100", Currency::Sar, today + Duration::hours(9)),
        tx("2", TxType::Expense, "50", Currency::Sar, today + Duration::hours(13)),
        tx("3", TxType::Income, "200", Currency::Sdg, today - Duration::hours(5)),
    ];
    let s = summarize(&list, today, dec("10"));
    assert_eq!(s.income_sar, dec("100"));
    assert_eq!(s.expense_sar, dec("50"));
    assert_eq!(s.income_sdg, dec("1000"));
    assert_eq!(s.expense_sdg, dec("500"));
    assert_eq!(s.net(Currency::Sar), dec("50"));
    assert_eq!(s.net(Currency::Sdg), dec("500"));
}

#[test]
fn sdg_transactions_convert_into_sar() {
    let start = at(2025, 3, 1, 0, 0);
    let list = vec![tx("1", TxType::Expense, "600", Currency::Sdg, start)];
    let s = summarize(&list, start, dec("600"));
    assert_eq!(s.expense_sdg, dec("600"));
    assert_eq!(s.expense_sar, dec("1"));
    assert_eq!(s.income_sar, Decimal::ZERO);
}

#[test]
fn transaction_at_window_start_is_included() {
    let start = at(2025, 3, 12, 0, 0);
    let list = vec![
        tx("edge", TxType::Income, "5", Currency::Sar, start),
        tx("before", TxType::Income, "7", Currency::Sar, start - Duration::seconds(1)),
    ];
    let s = summarize(&list, start, dec("2"));
    assert_eq!(s.income_sar, dec("5"));
}

#[test]
fn zero_rate_keeps_native_figures() {
    let start = at(2025, 3, 12, 0, 0);
    let list = vec![
        tx("1", TxType::Income, "100", Currency::Sar, start),
        tx("2", TxType::Expense, "300", Currency::Sdg, start),
    ];
    let s = summarize(&list, start, Decimal::ZERO);
    assert_eq!(s.income_sar, dec("100"));
    assert_eq!(s.income_sdg, Decimal::ZERO);
    assert_eq!(s.expense_sdg, dec("300"));
    assert_eq!(s.expense_sar, Decimal::ZERO);
}

#[test]
fn negative_amounts_do_not_contribute() {
    let start = at(2025, 3, 12, 0, 0);
    let list = vec![
        tx("1", TxType::Income, "-40", Currency::Sar, start),
        tx("2", TxType::Income, "10", Currency::Sar, start),
    ];
    let s = summarize(&list, start, dec("3"));
    assert_eq!(s.income_sar, dec("10"));
    assert_eq!(s.income_sdg, dec("30"));
}

#[test]
fn income_share_sums_both_currency_views() {
    let s = Summary {
        income_sar: dec("100"),
        expense_sar: dec("50"),
        income_sdg: dec("1000"),
        expense_sdg: dec("500"),
    };
    // 1100 / 1650
    assert_eq!(s.income_share().round_dp(4), dec("0.6667"));

    let only_expense = Summary {
        expense_sar: dec("3"),
        ..Summary::default()
    };
    assert_eq!(only_expense.income_share(), Decimal::ZERO);
}

#[test]
fn window_starts_are_local_midnights() {
    // Wednesday 2025-03-12 15:30 at UTC+3
    let tz = FixedOffset::east_opt(3 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 12, 15, 30, 0).unwrap();

    assert_eq!(Window::Day.start(&now, Weekday::Sun), at(2025, 3, 11, 21, 0));
    // previous Sunday, 2025-03-09
    assert_eq!(Window::Week.start(&now, Weekday::Sun), at(2025, 3, 8, 21, 0));
    // Monday-start week
    assert_eq!(Window::Week.start(&now, Weekday::Mon), at(2025, 3, 9, 21, 0));
    assert_eq!(Window::Month.start(&now, Weekday::Sun), at(2025, 2, 28, 21, 0));
}

#[test]
fn week_starting_today_begins_today() {
    let now = Utc.with_ymd_and_hms(2025, 3, 9, 8, 0, 0).unwrap(); // a Sunday
    assert_eq!(Window::Week.start(&now, Weekday::Sun), at(2025, 3, 9, 0, 0));
}

#[test]
fn dashboard_computes_three_windows_from_one_now() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap();
    let list = vec![
        tx("today", TxType::Income, "10", Currency::Sar, at(2025, 3, 12, 8, 0)),
        tx("monday", TxType::Expense, "4", Currency::Sar, at(2025, 3, 10, 8, 0)),
        tx("march-1", TxType::Income, "20", Currency::Sar, at(2025, 3, 1, 8, 0)),
        tx("feb", TxType::Income, "99", Currency::Sar, at(2025, 2, 20, 8, 0)),
    ];
    let d = Dashboard::compute(&list, &now, dec("2"), Weekday::Sun);
    assert_eq!(d.day.income_sar, dec("10"));
    assert_eq!(d.day.expense_sar, Decimal::ZERO);
    assert_eq!(d.week.income_sar, dec("10"));
    assert_eq!(d.week.expense_sar, dec("4"));
    assert_eq!(d.month.income_sar, dec("30"));
    assert_eq!(d.month.income_sdg, dec("60"));
}

#[test]
fn budget_alerts_fire_only_for_set_and_exceeded_budgets() {
    let month_start = at(2025, 3, 1, 0, 0);
    let list = vec![
        tx("1", TxType::Expense, "80", Currency::Sar, at(2025, 3, 5, 10, 0)),
        tx("2", TxType::Expense, "1000", Currency::Sdg, at(2025, 3, 6, 10, 0)),
        tx("3", TxType::Income, "5000", Currency::Sar, at(2025, 3, 6, 11, 0)),
        tx("old", TxType::Expense, "900", Currency::Sar, at(2025, 2, 27, 10, 0)),
    ];
    // SAR view: 80 + 1000/100 = 90; SDG view: 8000 + 1000 = 9000
    let settings = Settings {
        budget_sar: Some(dec("85")),
        budget_sdg: Some(dec("10000")),
        ..Settings::default()
    };
    let alerts = budget_alerts(&list, &settings, month_start, dec("100"));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].currency, Currency::Sar);
    assert_eq!(alerts[0].spent, dec("90"));
    assert_eq!(alerts[0].budget, dec("85"));

    let zero_budget = Settings {
        budget_sar: Some(Decimal::ZERO),
        ..Settings::default()
    };
    assert!(budget_alerts(&list, &zero_budget, month_start, dec("100")).is_empty());
}
