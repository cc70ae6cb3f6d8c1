//! Subcommands and their handlers.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};

use ecotrack_core::budget::{BudgetAllocator, BudgetError, BudgetPeriod, CategoryWeights};
use ecotrack_core::kdv::{KdvCalculator, KdvItem};
use ecotrack_shared::types::UserId;
use ecotrack_shared::{AppConfig, AppError};

/// KDV subcommands
#[derive(Subcommand)]
pub enum KdvCommands {
    /// Split a VAT-inclusive total into net amount and KDV
    Breakdown {
        /// VAT-inclusive total (e.g. "120.00")
        total: Decimal,
        /// KDV rate in percent: 1, 10 or 20
        rate: Decimal,
    },

    /// Gross up a net amount
    Gross {
        /// Amount without KDV
        amount: Decimal,
        /// KDV rate in percent: 1, 10 or 20
        rate: Decimal,
    },

    /// Suggest a KDV rate for a category or line description
    Suggest {
        /// Free text, e.g. "fresh bread"
        text: String,
    },

    /// Totals of a receipt with lines at different rates
    Mixed {
        /// Lines as AMOUNT:RATE, e.g. "120:20 110:10"
        #[arg(required = true, value_parser = parse_item)]
        items: Vec<KdvItem>,
    },
}

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Allocate a total budget across categories
    Allocate {
        /// Total budget
        total: Decimal,
        /// Budget period (weekly, monthly, quarterly, yearly)
        #[arg(short, long)]
        period: Option<String>,
        /// First day of the period (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// Owner of the plan, defaults to a fresh id
        #[arg(short, long)]
        user: Option<UserId>,
        /// Category weight override as CATEGORY=PERCENT (repeatable)
        #[arg(short = 'o', long = "override", value_parser = parse_pair)]
        overrides: Vec<(String, Decimal)>,
    },

    /// Evaluate spend against an allocated amount
    Evaluate {
        /// Allocated amount
        allocated: Decimal,
        /// Spent amount
        spent: Decimal,
    },

    /// Allocate a budget and evaluate category spend against it
    Report {
        /// Total budget
        total: Decimal,
        /// Category spend as CATEGORY=AMOUNT (repeatable)
        #[arg(long = "spent", value_parser = parse_pair)]
        spent: Vec<(String, Decimal)>,
        /// Category weight override as CATEGORY=PERCENT (repeatable)
        #[arg(short = 'o', long = "override", value_parser = parse_pair)]
        overrides: Vec<(String, Decimal)>,
    },
}

/// Runs a KDV subcommand.
pub fn run_kdv(command: KdvCommands, config: &AppConfig) -> Result<Value> {
    match command {
        KdvCommands::Breakdown { total, rate } => {
            to_json(&KdvCalculator::breakdown(total, rate).map_err(AppError::from)?)
        }
        KdvCommands::Gross { amount, rate } => {
            let total = KdvCalculator::total_with_kdv(amount, rate).map_err(AppError::from)?;
            Ok(json!({ "amount_without_kdv": amount, "kdv_rate": rate, "total_amount": total }))
        }
        KdvCommands::Suggest { text } => {
            let calculator = KdvCalculator::from_config(&config.kdv).map_err(AppError::from)?;
            let rate = calculator.suggest_rate(&text);
            Ok(json!({ "text": text, "kdv_rate": rate }))
        }
        KdvCommands::Mixed { items } => {
            to_json(&KdvCalculator::mixed_total(&items).map_err(AppError::from)?)
        }
    }
}

/// Runs a budget subcommand.
pub fn run_budget(command: BudgetCommands, config: &AppConfig) -> Result<Value> {
    match command {
        BudgetCommands::Allocate {
            total,
            period,
            start,
            user,
            overrides,
        } => {
            let weights = CategoryWeights::from_config(&config.budget).map_err(AppError::from)?;
            let period: BudgetPeriod = period
                .as_deref()
                .unwrap_or(&config.budget.default_period)
                .parse()
                .map_err(AppError::from)?;
            let start = start.unwrap_or_else(|| chrono::Local::now().date_naive());
            let overrides = into_map(overrides)?;

            let plan = BudgetAllocator::apply_allocation(
                user.unwrap_or_default(),
                total,
                period,
                start,
                &weights,
                Some(&overrides),
            )
            .map_err(AppError::from)?;
            to_json(&plan)
        }
        BudgetCommands::Evaluate { allocated, spent } => {
            to_json(&BudgetAllocator::evaluate(allocated, spent).map_err(AppError::from)?)
        }
        BudgetCommands::Report {
            total,
            spent,
            overrides,
        } => {
            let weights = CategoryWeights::from_config(&config.budget).map_err(AppError::from)?;
            let overrides = into_map(overrides)?;
            let spent = into_map(spent)?;

            let allocations = BudgetAllocator::auto_allocate(total, &weights, Some(&overrides))
                .map_err(AppError::from)?;
            let report =
                BudgetAllocator::build_report(&allocations, &spent).map_err(AppError::from)?;
            let shares = BudgetAllocator::spending_shares(&spent).map_err(AppError::from)?;
            Ok(json!({ "report": report, "spending_shares": shares }))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}

/// Collects CATEGORY=VALUE pairs, rejecting repeated categories.
fn into_map(pairs: Vec<(String, Decimal)>) -> Result<BTreeMap<String, Decimal>> {
    let mut map = BTreeMap::new();
    for (category, value) in pairs {
        if map.insert(category.clone(), value).is_some() {
            return Err(AppError::from(BudgetError::InvalidWeights(format!(
                "{category} given more than once"
            )))
            .into());
        }
    }
    Ok(map)
}

fn parse_pair(s: &str) -> Result<(String, Decimal), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing category in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    Ok((key.to_string(), value))
}

fn parse_item(s: &str) -> Result<KdvItem, String> {
    let (amount, rate) = s
        .split_once(':')
        .ok_or_else(|| format!("expected AMOUNT:RATE, got '{s}'"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount in '{s}': {e}"))?;
    let rate = rate
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid rate in '{s}': {e}"))?;
    Ok(KdvItem { amount, rate })
}
