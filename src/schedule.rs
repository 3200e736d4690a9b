use crate::loan::monthly_rate;
use chrono::{Months, NaiveDate};
use log::{trace, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// decimal places kept in the amortization table
const DEC_PLACES: i32 = 2;

/// One row of an amortization table.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanPayment {
    pub pmt_number: usize,
    pub pmt_date: Option<NaiveDate>,
    pub pmt_amount: f64,
    pub pmt_interest_paid: f64,
    pub pmt_end_balance: f64,
}

impl LoanPayment {
    pub fn new(
        pmt_number: usize,
        pmt_date: Option<NaiveDate>,
        pmt_amount: f64,
        pmt_interest_paid: f64,
        pmt_end_balance: f64,
    ) -> Self {
        Self {
            pmt_number,
            pmt_date,
            pmt_amount,
            pmt_interest_paid,
            pmt_end_balance,
        }
    }
}

impl fmt::Display for LoanPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pmt number {}", self.pmt_number)?;
        if let Some(date) = self.pmt_date {
            write!(f, ", date {}", date)?;
        }
        write!(
            f,
            ", payment ${:.2}, interest paid ${:.2}, ending balance ${:.2}",
            self.pmt_amount, self.pmt_interest_paid, self.pmt_end_balance
        )
    }
}

fn round(amt: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(DEC_PLACES)).round() / 10_f64.powi(DEC_PLACES)
    }
}

// one calendar month later; chrono clamps to the end of shorter months
fn next_pmt_date(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// Applies `payments` in order to a loan of `principal` at an annual
/// `interest` percent, compounding monthly.
///
/// A payment larger than what is owed is cut down to the balance plus the
/// month's interest and the table ends there.
pub fn amortize(
    principal: f64,
    interest: f64,
    payments: &[i64],
    first_pmt_date: Option<NaiveDate>,
) -> Vec<LoanPayment> {
    let rate = monthly_rate(interest);
    let mut sched_pmt: Vec<LoanPayment> = Vec::with_capacity(payments.len());
    let mut begin_balance = principal;
    let mut pmt_date = first_pmt_date;

    for (idx, &scheduled) in payments.iter().enumerate() {
        let pmt_number = idx + 1;
        let interest_paid = begin_balance * rate;
        let owed = begin_balance + interest_paid;

        let (pmt_amt, end_balance) = if (scheduled as f64) < owed {
            (scheduled as f64, owed - scheduled as f64)
        } else {
            (owed, 0.)
        };
        trace!(
            "pmt # {}, interest {}, end bal {}",
            pmt_number,
            interest_paid,
            end_balance
        );

        sched_pmt.push(LoanPayment::new(
            pmt_number,
            pmt_date,
            round(pmt_amt),
            round(interest_paid),
            round(end_balance),
        ));

        if end_balance == 0. {
            break;
        }
        begin_balance = end_balance;
        pmt_date = pmt_date.and_then(|date| {
            let next = next_pmt_date(date);
            if next.is_none() {
                warn!("{} does not return a new payment date", date);
            }
            next
        });
    }
    sched_pmt
}
