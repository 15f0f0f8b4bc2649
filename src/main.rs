//! Loan Amortizer CLI
//!
//! Command-line interface for building schedules, comparing against the
//! no-prepayment baseline and attributing savings to prepayments

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use loan_amortizer::loan::{load_prepayments, load_rate_changes, parse_date};
use loan_amortizer::scenario::LoanComparison;
use loan_amortizer::schedule::ScheduleSummary;
use loan_amortizer::{LoanCalculator, LoanRequest, LoanTerms, PrepaymentSaving, Schedule};

/// Loan amortization with variable rates and prepayments
#[derive(Parser)]
#[command(name = "loan_amortizer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the schedule with prepayments applied
    Schedule {
        #[command(flatten)]
        loan: LoanArgs,

        /// Write every row to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Rows to print to the console
        #[arg(long, default_value_t = 24)]
        rows: usize,

        /// Print calendar-year totals instead of monthly rows
        #[arg(long)]
        yearly: bool,
    },
    /// Compare the schedule against the no-prepayment baseline
    Compare {
        #[command(flatten)]
        loan: LoanArgs,
    },
    /// Attribute interest and months saved to each prepayment
    Attribute {
        #[command(flatten)]
        loan: LoanArgs,
    },
}

/// Loan inputs, from a request file and/or individual flags
#[derive(Args)]
struct LoanArgs {
    /// JSON request file (terms, rate_changes, prepayments)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Amount borrowed
    #[arg(long)]
    principal: Option<f64>,

    /// Initial annual rate in percent
    #[arg(long)]
    rate: Option<f64>,

    /// Tenure in months
    #[arg(long, allow_negative_numbers = true)]
    months: Option<i32>,

    /// First EMI date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// CSV of rate changes (EffectiveDate,AnnualRate)
    #[arg(long)]
    rate_changes: Option<PathBuf>,

    /// CSV of prepayments (Kind,Amount,EffectiveDate,Strategy)
    #[arg(long)]
    prepayments: Option<PathBuf>,

    /// Save the resolved request as JSON for later sessions
    #[arg(long)]
    save_inputs: Option<PathBuf>,
}

impl LoanArgs {
    /// Merge the request file with flag overrides
    fn resolve(&self) -> Result<LoanRequest> {
        let mut request = match (&self.input, &self.start) {
            (Some(path), _) => LoanRequest::from_json_file(path)
                .with_context(|| format!("Failed to load request from {}", path.display()))?,
            (None, Some(start)) => {
                let start_date = parse_date("start", start)?;
                LoanRequest::new(LoanTerms::new(0.0, 0.0, 240, start_date))
            }
            (None, None) => bail!("either --input or --start is required"),
        };

        if let Some(start) = &self.start {
            request.start_date = parse_date("start", start)?;
        }
        if let Some(principal) = self.principal {
            request.principal = principal;
        }
        if let Some(rate) = self.rate {
            request.annual_rate = rate;
        }
        if let Some(months) = self.months {
            request.total_months = months;
        }
        if let Some(path) = &self.rate_changes {
            request.rate_changes = load_rate_changes(path)
                .with_context(|| format!("Failed to load rate changes from {}", path.display()))?;
        }
        if let Some(path) = &self.prepayments {
            request.prepayments = load_prepayments(path)
                .with_context(|| format!("Failed to load prepayments from {}", path.display()))?;
        }

        if let Some(path) = &self.save_inputs {
            request
                .save_json_file(path)
                .with_context(|| format!("Failed to save inputs to {}", path.display()))?;
            info!("Inputs saved to {}", path.display());
        }

        Ok(request)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let calculator = LoanCalculator::new();

    match cli.command {
        Commands::Schedule { loan, csv, rows, yearly } => {
            let request = loan.resolve()?;
            let schedule = calculator.schedule(&request)?;

            if let Some(path) = &csv {
                write_schedule_csv(path, &schedule)?;
                info!("Full schedule written to {}", path.display());
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else if yearly {
                print_yearly(&schedule);
            } else {
                print_schedule(&schedule, rows);
            }
        }
        Commands::Compare { loan } => {
            let request = loan.resolve()?;
            let comparison = calculator.compare(&request)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                print_comparison(&comparison);
            }
        }
        Commands::Attribute { loan } => {
            let request = loan.resolve()?;
            let savings = calculator.attribute(&request)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&savings)?);
            } else {
                print_savings(&savings);
            }
        }
    }

    Ok(())
}

fn write_schedule_csv(path: &Path, schedule: &Schedule) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in &schedule.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_summary(label: &str, summary: &ScheduleSummary) {
    println!("{}:", label);
    println!("  EMI:             {:>16.2}", summary.base_emi);
    println!("  Months:          {:>16}", summary.months_taken);
    println!("  Total Interest:  {:>16.2}", summary.total_interest);
    println!("  Total Prepaid:   {:>16.2}", summary.total_prepaid);
    println!("  Total Paid:      {:>16.2}", summary.total_paid);
    match summary.payoff_date {
        Some(date) => println!("  Payoff Date:     {:>16}", date),
        None => println!("  Payoff Date:     {:>16}", "-"),
    }
}

fn print_schedule(schedule: &Schedule, rows: usize) {
    print_summary("Schedule", &schedule.summary());
    println!();

    println!(
        "{:>5} {:>10} {:>7} {:>14} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Month", "Date", "Rate", "Opening", "EMI", "Interest", "Principal", "Prepaid", "Closing"
    );
    println!("{}", "-".repeat(110));

    for row in schedule.rows.iter().take(rows) {
        println!(
            "{:>5} {:>10} {:>7.3} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.month,
            row.payment_date,
            row.annual_rate,
            row.opening_balance,
            row.emi_paid,
            row.interest,
            row.principal,
            row.prepayment,
            row.closing_balance,
        );
    }

    if schedule.rows.len() > rows {
        println!("... ({} more months)", schedule.rows.len() - rows);
    }
}

fn print_yearly(schedule: &Schedule) {
    print_summary("Schedule", &schedule.summary());
    println!();

    println!(
        "{:>6} {:>6} {:>14} {:>14} {:>14} {:>16}",
        "Year", "Months", "Interest", "Principal", "Prepaid", "Closing"
    );
    println!("{}", "-".repeat(80));

    for year in schedule.yearly_breakdown() {
        println!(
            "{:>6} {:>6} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
            year.year, year.months, year.interest, year.principal, year.prepayment, year.closing_balance,
        );
    }
}

fn print_comparison(comparison: &LoanComparison) {
    print_summary("Without prepayments", &comparison.baseline);
    println!();
    print_summary("With prepayments", &comparison.with_prepayments);
    println!();
    println!("Interest saved: {:.2}", comparison.interest_saved);
    println!("Months saved:   {}", comparison.months_saved);
}

fn print_savings(savings: &[PrepaymentSaving]) {
    if savings.is_empty() {
        println!("No prepayments to attribute");
        return;
    }

    println!(
        "{:>10} {:>10} {:>14} {:>14} {:>16} {:>8}",
        "Date", "Kind", "Strategy", "Amount", "Interest Saved", "Months"
    );
    println!("{}", "-".repeat(78));

    for saving in savings {
        let p = &saving.prepayment;
        println!(
            "{:>10} {:>10} {:>14} {:>14.2} {:>16.2} {:>8}",
            p.effective_date,
            p.kind.as_str(),
            p.strategy.as_str(),
            p.amount,
            saving.interest_saved,
            saving.months_saved,
        );
    }

    let total_interest: f64 = savings.iter().map(|s| s.interest_saved).sum();
    let total_months: i64 = savings.iter().map(|s| s.months_saved).sum();
    println!("{}", "-".repeat(78));
    println!("{:>50} {:>16.2} {:>8}", "Total", total_interest, total_months);
}
