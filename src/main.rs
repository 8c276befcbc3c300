#![forbid(unsafe_code)]

use anyhow::{ensure, Result};
use clap::Parser;
use rust_decimal::Decimal;

use teller::{session::Session, Bank, BankConfig};

/// Interactive bank teller terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Branch code assigned to new accounts
    #[arg(long, default_value_t = BankConfig::default().default_branch)]
    branch: String,

    /// Suffix appended to every account number
    #[arg(long, default_value_t = BankConfig::default().number_suffix)]
    suffix: String,

    /// Maximum total withdrawal per account and day
    #[arg(long, default_value_t = BankConfig::default().daily_withdrawal_limit)]
    daily_limit: Decimal,

    /// Maximum number of deposits and withdrawals per account and day
    #[arg(long)]
    max_daily_operations: Option<u32>,

    /// Maximum number of withdrawals per account and day
    #[arg(long)]
    max_daily_withdrawals: Option<u32>,
}

impl From<Args> for BankConfig {
    fn from(args: Args) -> Self {
        Self {
            default_branch: args.branch,
            number_suffix: args.suffix,
            daily_withdrawal_limit: args.daily_limit,
            max_daily_operations: args.max_daily_operations,
            max_daily_withdrawals: args.max_daily_withdrawals,
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    ensure!(
        args.daily_limit > Decimal::ZERO,
        "Daily limit must be positive (got {})",
        args.daily_limit
    );

    let mut bank = Bank::new(args.into());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(&mut bank, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
