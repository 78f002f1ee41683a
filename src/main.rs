// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::stderr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use dualledger::backend::Backend;
use dualledger::commands::{self, Context};
use dualledger::config::AppConfig;
use dualledger::db::{self, KeyValueStore, SqliteStore};
use dualledger::rates::{RateProvider, ReqwestFetcher};
use dualledger::{cli, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    let level = matches
        .get_one::<String>("log-level")
        .unwrap_or(&config.log_level);
    setup_logging(parse_log_level(level));

    let path = db::db_path(config.data_dir.as_deref())?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path)?);
    let fetcher = ReqwestFetcher::new(utils::http_client(config.request_timeout())?);
    let rates = RateProvider::new(Arc::new(fetcher), kv.clone(), config.endpoints())
        .with_attempt_timeout(config.request_timeout());

    let ctx = Context {
        backend: Backend::offline(kv),
        rates: Arc::new(rates),
        week_start: config.first_weekday()?,
        rate_max_age: config.refresh_interval(),
    };

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub).await?,
        Some(("summary", sub)) => commands::summary::handle(&ctx, sub).await?,
        Some(("fx", sub)) => commands::fx::handle(&ctx, sub, config.refresh_interval()).await?,
        Some(("budget", sub)) => commands::budgets::handle(&ctx, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'warn'", level);
            LevelFilter::WARN
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // stdout carries tables and JSON; logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}
