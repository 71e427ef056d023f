use amortize::loan::{calculate, LoanSpec};
use amortize::record::RecordReader;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};
use miette::{IntoDiagnostic, Result};
use simple_logger::SimpleLogger;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Loan amortization schedules", long_about = None)]
struct Cli {
    /// Log verbosity (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the amortization schedule of one loan
    Calc(CalcArgs),
    /// Summarize every loan in a CSV export of saved loans
    Batch {
        /// CSV file with a name,principal,rate,termYears,monthlyPayment,extraMonthlyPayment header
        input: PathBuf,
    },
}

#[derive(Args)]
struct CalcArgs {
    /// Loan amount, e.g. "$126,000.00"
    #[arg(short, long)]
    principal: String,

    /// Annual rate, e.g. "2.99%" or "0.0299"
    #[arg(short, long)]
    rate: String,

    /// Term in years; derives the monthly payment
    #[arg(short, long)]
    term_years: Option<String>,

    /// Fixed monthly payment, used when no term is given
    #[arg(short, long)]
    monthly_payment: Option<String>,

    /// Extra principal paid every month
    #[arg(short, long)]
    extra: Option<String>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    first_payment: Option<NaiveDate>,

    /// Print only the payoff summary
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level.into())
        .init()
        .into_diagnostic()?;

    match cli.command {
        Command::Calc(args) => Ok(run_calc(args)),
        Command::Batch { input } => run_batch(input),
    }
}

fn run_calc(args: CalcArgs) -> ExitCode {
    let spec = LoanSpec {
        principal: args.principal.into(),
        rate: args.rate.into(),
        term_years: args.term_years.map(Into::into),
        monthly_payment: args.monthly_payment.map(Into::into),
        extra_monthly_payment: args.extra.map(Into::into),
        first_payment_date: args.first_payment,
    };
    let result = calculate(&spec);
    info!("{} months to payoff", result.months_to_payoff());

    if !args.summary {
        for month in &result.loan_months {
            println!("{}", month);
        }
    }
    println!("{}", result);
    if let Some(payoff_date) = result.payoff_date {
        println!("Final payment on {}.", payoff_date);
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_batch(input: PathBuf) -> Result<ExitCode> {
    let file = File::open(&input).into_diagnostic()?;
    info!("reading loans from {}", input.display());

    for record in RecordReader::new(file).records() {
        match record {
            Ok(record) => {
                let name = record.name.clone();
                let result = calculate(&record.into());
                println!("{}: {}", name, result);
            }
            Err(e) => {
                eprintln!("Error reading loan record: {}", e);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
