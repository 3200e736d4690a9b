//! Text rendering of calculation results, one string per output line.

use crate::error::LoanError;
use crate::request::{Calculation, LoanOutcome, LoanRequest, LoanResult};
use crate::schedule::LoanPayment;
use chrono::NaiveDate;
use log::info;

pub const INCORRECT_PARAMETERS: &str = "Incorrect parameters";

/// Everything one run of the calculator writes, and whether it succeeded.
#[derive(PartialEq, Debug, Default)]
pub struct Response {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub success: bool,
}

/// Runs a request end to end. A rejected request prints only
/// [`INCORRECT_PARAMETERS`] and still succeeds; undefined math fails with a
/// message on stderr and nothing on stdout.
pub fn respond(
    request: &LoanRequest,
    with_schedule: bool,
    first_pmt_date: Option<NaiveDate>,
) -> Response {
    let outcome = Calculation::from_request(request)
        .and_then(|calculation| Ok((calculation, calculation.evaluate()?)));

    match outcome {
        Ok((calculation, result)) => {
            let mut stdout = render(&result);
            if with_schedule {
                stdout.extend(render_schedule(
                    &calculation.schedule(&result, first_pmt_date),
                ));
            }
            Response {
                stdout,
                stderr: Vec::new(),
                success: true,
            }
        }
        Err(LoanError::Parameter(reason)) => {
            info!("request rejected: {}", reason);
            Response {
                stdout: vec![INCORRECT_PARAMETERS.to_string()],
                stderr: Vec::new(),
                success: true,
            }
        }
        Err(err) => Response {
            stdout: Vec::new(),
            stderr: vec![format!("error: {}", err)],
            success: false,
        },
    }
}

pub fn render(result: &LoanResult) -> Vec<String> {
    let mut lines: Vec<String> = match &result.outcome {
        LoanOutcome::DifferentiatedPayments(payments) => payments
            .iter()
            .enumerate()
            .map(|(idx, payment)| format!("Month {}: payment is {}", idx + 1, payment))
            .collect(),
        LoanOutcome::AnnuityPayment(payment) => {
            vec![format!("Your annuity payment = {}!", payment)]
        }
        LoanOutcome::Principal(principal) => vec![format!("Your loan principal = {}!", principal)],
        LoanOutcome::Periods(periods) => vec![repayment_time(*periods)],
    };
    lines.push(format!("Overpayment = {}", result.overpayment));
    lines
}

/// "It will take 2 years and 3 months to repay this loan!", leaving out the
/// months when there are none and the years when there are none.
pub fn repayment_time(periods: i64) -> String {
    let years = periods / 12;
    let months = periods % 12;

    let mut sentence = String::from("It will take ");
    if years > 0 {
        sentence.push_str(&format!("{} years", years));
        if months > 0 {
            sentence.push_str(&format!(" and {} months", months));
        }
    } else {
        sentence.push_str(&format!("{} months", months));
    }
    sentence.push_str(" to repay this loan!");
    sentence
}

pub fn render_schedule(schedule: &[LoanPayment]) -> Vec<String> {
    schedule.iter().map(LoanPayment::to_string).collect()
}
