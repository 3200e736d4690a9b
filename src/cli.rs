use crate::request::LoanRequest;
use chrono::NaiveDate;
use clap::Parser;
use log::LevelFilter;

/// Works out the missing one of principal, periods, payment and the
/// overpayment of a loan.
#[derive(Parser, Debug)]
#[command(name = "loancalc", version)]
pub struct Args {
    /// Type of payment: 'annuity' or 'diff'
    #[arg(long = "type")]
    pub payment_type: Option<String>,

    /// The loan principal
    #[arg(long, allow_negative_numbers = true)]
    pub principal: Option<i64>,

    /// The number of monthly periods
    #[arg(long, allow_negative_numbers = true)]
    pub periods: Option<i64>,

    /// The annual interest rate in percent, i.e. 7.8
    #[arg(long, allow_negative_numbers = true)]
    pub interest: Option<f64>,

    /// The monthly payment amount
    #[arg(long, allow_negative_numbers = true)]
    pub payment: Option<i64>,

    /// Also print the month-by-month amortization table
    #[arg(long, action(clap::ArgAction::SetTrue))]
    pub schedule: bool,

    /// Date of the first payment in the amortization table (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn request(&self) -> LoanRequest {
        LoanRequest {
            payment_type: self.payment_type.clone(),
            principal: self.principal,
            periods: self.periods,
            interest: self.interest,
            payment: self.payment,
        }
    }
}
