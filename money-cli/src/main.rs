//! Money CLI
//!
//! Command-line interface for parsing, formatting and summing exact amounts.

mod config;

use std::cmp::Ordering;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use money_types::{BigInt, Currency, Money, MoneyParser};

use config::{Config, Currencies};

#[derive(Parser)]
#[command(name = "money")]
#[command(author, version, about = "Exact money parsing and formatting", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, env = "MONEY_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an amount such as "$1,234.56", "¥213860" or "12.5"
    Parse {
        input: String,
        /// Currency used when the input names none
        #[arg(long)]
        currency: Option<String>,
        /// Read a plain integer as minor units (cents) instead of major units
        #[arg(long)]
        minor_units: bool,
    },
    /// Format an amount given in minor units
    Format {
        #[arg(allow_hyphen_values = true)]
        minor_units: String,
        #[arg(long)]
        currency: String,
    },
    /// Add up amounts of one currency
    Sum {
        #[arg(required = true, allow_hyphen_values = true)]
        inputs: Vec<String>,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Compare two amounts of one currency
    Compare {
        #[arg(allow_hyphen_values = true)]
        left: String,
        #[arg(allow_hyphen_values = true)]
        right: String,
        #[arg(long)]
        currency: Option<String>,
    },
    /// List the configured currencies
    Currencies,
}

/// JSON view of an amount.
#[derive(Debug, Serialize)]
struct MoneyView {
    amount: String,
    currency: String,
    formatted: String,
    decimal: String,
}

impl From<&Money> for MoneyView {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount().to_string(),
            currency: money.currency_code().to_string(),
            formatted: money.format(),
            decimal: money.to_decimal_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Comparison {
    ordering: &'static str,
    left: MoneyView,
    right: MoneyView,
}

#[derive(Serialize)]
struct CurrencyList<'a> {
    default_currency: String,
    currencies: Vec<&'a Currency>,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,money_cli=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_amount(parser: &MoneyParser, input: &str, minor_units: bool, currency: &str) -> Result<Money> {
    match input.trim().parse::<BigInt>() {
        Ok(amount) if minor_units => Ok(parser.registry().money(amount, currency)?),
        _ => Ok(parser.parse_str(input, currency)?),
    }
}

fn sum(parser: &MoneyParser, inputs: &[String], currency: &str) -> Result<Money> {
    let mut total: Option<Money> = None;
    for input in inputs {
        let money = parser.parse_str(input, currency)?;
        total = Some(match total {
            Some(total) => total.checked_add(&money)?,
            None => money,
        });
    }
    total.ok_or_else(|| anyhow::anyhow!("nothing to sum"))
}

fn compare(parser: &MoneyParser, left: &str, right: &str, currency: &str) -> Result<Comparison> {
    let left = parser.parse_str(left, currency)?;
    let right = parser.parse_str(right, currency)?;
    let ordering = match left.checked_cmp(&right)? {
        Ordering::Less => "less",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    };
    Ok(Comparison {
        ordering,
        left: MoneyView::from(&left),
        right: MoneyView::from(&right),
    })
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_env()?;
    let currencies = config.build()?;
    for (symbol, code) in currencies.unregistered_symbols() {
        tracing::warn!(symbol = %symbol, currency = %code, "symbol maps to an unregistered currency");
    }
    let Currencies {
        parser,
        default_currency,
    } = currencies;
    tracing::debug!(
        currencies = parser.registry().len(),
        default_currency = %default_currency,
        "currency registry loaded"
    );

    let fallback = default_currency.to_string();
    match cli.command {
        Commands::Parse {
            input,
            currency,
            minor_units,
        } => {
            let currency = currency.unwrap_or(fallback);
            let money = parse_amount(&parser, &input, minor_units, &currency)?;
            print_json(&MoneyView::from(&money))?;
        }
        Commands::Format {
            minor_units,
            currency,
        } => {
            let amount: BigInt = minor_units
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid minor units: {}", minor_units))?;
            let money = parser.registry().money(amount, &currency)?;
            print_json(&MoneyView::from(&money))?;
        }
        Commands::Sum { inputs, currency } => {
            let currency = currency.unwrap_or(fallback);
            let total = sum(&parser, &inputs, &currency)?;
            print_json(&MoneyView::from(&total))?;
        }
        Commands::Compare {
            left,
            right,
            currency,
        } => {
            let currency = currency.unwrap_or(fallback);
            print_json(&compare(&parser, &left, &right, &currency)?)?;
        }
        Commands::Currencies => {
            let list = CurrencyList {
                default_currency: default_currency.to_string(),
                currencies: parser.registry().iter().map(|c| c.as_ref()).collect(),
            };
            print_json(&list)?;
        }
    }

    Ok(())
}
