// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use dualledger::models::{Currency, NewTransaction, Transaction, TxType};
use dualledger::commands::transactions::ListFilter;
use dualledger::{cli, commands::transactions};
use rust_decimal::Decimal;

fn add_matches(extra: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["dualledger", "tx", "add"];
    argv.extend_from_slice(extra);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => match tx_m.subcommand() {
            Some(("add", add_m)) => add_m.clone(),
            _ => panic!("no add subcommand"),
        },
        _ => panic!("no tx subcommand"),
    }
}

fn tx(id: &str, day: u32) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TxType::Expense,
        amount: Decimal::from(10),
        currency: Currency::Sar,
        category: String::new(),
        date: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
        note: None,
    }
}

#[test]
fn add_args_build_a_transaction() {
    let m = add_matches(&[
        "--type", "income", "--amount", "12.5", "--currency", "sdg", "--category", " Salary ",
        "--date", "2025-02-03", "--note", "  ",
    ]);
    let new = transactions::new_from_args(&m).unwrap();
    assert_eq!(new.kind, TxType::Income);
    assert_eq!(new.currency, Currency::Sdg);
    assert_eq!(new.amount, "12.5".parse::<Decimal>().unwrap());
    assert_eq!(new.category, "Salary");
    assert_eq!(new.date, Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap());
    assert_eq!(new.note, None);
}

#[test]
fn add_args_reject_unusable_amounts() {
    for amount in ["0", "-5", "NaN", "abc", "inf"] {
        let flag = format!("--amount={}", amount);
        let m = add_matches(&["--type", "expense", &flag, "--currency", "SAR"]);
        assert!(
            transactions::new_from_args(&m).is_err(),
            "amount {} was accepted",
            amount
        );
    }
}

#[test]
fn add_args_reject_bad_date() {
    let m = add_matches(&[
        "--type", "expense", "--amount", "3", "--currency", "SAR", "--date", "03/02/2025",
    ]);
    assert!(transactions::new_from_args(&m).is_err());
}

#[test]
fn new_transaction_validation() {
    let when = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    assert!(NewTransaction::new(TxType::Expense, 0.0, Currency::Sar, "", when, None).is_err());
    assert!(NewTransaction::new(TxType::Expense, f64::NAN, Currency::Sar, "", when, None).is_err());
    let ok = NewTransaction::new(
        TxType::Expense,
        0.5,
        Currency::Sar,
        "Food",
        when,
        Some(" lunch ".into()),
    )
    .unwrap();
    assert_eq!(ok.note.as_deref(), Some("lunch"));
}

#[test]
fn list_rows_are_newest_first_and_limited() {
    let list = vec![tx("a", 1), tx("c", 3), tx("b", 2)];
    let rows = transactions::rows_for(&list, &ListFilter::default(), Some(2));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "c");
    assert_eq!(rows[1].id, "b");
    assert_eq!(rows[0].category, "(uncategorized)");
    assert_eq!(rows[0].amount, "10.00");

    assert_eq!(transactions::rows_for(&list, &ListFilter::default(), None).len(), 3);
}

fn list_matches(extra: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["dualledger", "tx", "list"];
    argv.extend_from_slice(extra);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    list_m.clone()
}

fn ledger() -> Vec<Transaction> {
    let mut salary = tx("salary", 1);
    salary.kind = TxType::Income;
    salary.category = "Salary".into();
    let mut lunch = tx("lunch", 2);
    lunch.category = "Food".into();
    lunch.note = Some("Lunch with Omar".into());
    let mut taxi = tx("taxi", 3);
    taxi.note = Some("airport".into());
    vec![salary, lunch, taxi]
}

fn ids(extra: &[&str]) -> Vec<String> {
    let filter = ListFilter::from_args(&list_matches(extra)).unwrap();
    transactions::rows_for(&ledger(), &filter, None)
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn list_limit_flag_is_parsed() {
    let m = list_matches(&["--limit", "2"]);
    assert_eq!(m.get_one::<usize>("limit").copied(), Some(2));
}

#[test]
fn list_filters_by_type() {
    assert_eq!(ids(&["--type", "income"]), vec!["salary"]);
    assert_eq!(ids(&["--type", "expense"]), vec!["taxi", "lunch"]);
    assert_eq!(ids(&["--type", "all"]).len(), 3);
}

#[test]
fn list_filters_by_category() {
    assert_eq!(ids(&["--category", "food"]), vec!["lunch"]);
    assert_eq!(ids(&["--category", "(uncategorized)"]), vec!["taxi"]);
    assert!(ids(&["--category", "Rent"]).is_empty());
}

#[test]
fn list_search_covers_note_and_category() {
    assert_eq!(ids(&["--search", "OMAR"]), vec!["lunch"]);
    assert_eq!(ids(&["--search", "sal"]), vec!["salary"]);
    assert_eq!(ids(&["--search", "  "]).len(), 3);
    assert_eq!(ids(&["--type", "expense", "--search", "air"]), vec!["taxi"]);
}
