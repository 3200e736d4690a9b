use crate::error::{CalcResult, LoanError};
use crate::loan::{
    compute_annuity_payment, compute_differentiated_payments, compute_overpayment,
    compute_periods, compute_principal,
};
use crate::schedule::{amortize, LoanPayment};
use chrono::NaiveDate;
use log::{debug, info};
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaymentType {
    Annuity,
    Differentiated,
}

impl FromStr for PaymentType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annuity" => Ok(PaymentType::Annuity),
            "diff" => Ok(PaymentType::Differentiated),
            other => Err(LoanError::parameter(format!(
                "unknown payment type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Annuity => write!(f, "annuity"),
            PaymentType::Differentiated => write!(f, "diff"),
        }
    }
}

/// One calculation request as it arrives from the command line. Nothing in
/// here has been checked yet.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanRequest {
    pub payment_type: Option<String>,
    pub principal: Option<i64>,
    pub periods: Option<i64>,
    pub interest: Option<f64>,
    pub payment: Option<i64>,
}

impl LoanRequest {
    // number of supplied inputs, payment type included
    fn supplied(&self) -> usize {
        [
            self.payment_type.is_some(),
            self.principal.is_some(),
            self.periods.is_some(),
            self.interest.is_some(),
            self.payment.is_some(),
        ]
        .iter()
        .filter(|&&present| present)
        .count()
    }
}

/// Checks the payment type, the diff/payment combination, the interest rate
/// and the signs of a request. Whether enough values are present to pick a
/// calculation is left to [`Calculation::from_request`].
pub fn validate_request(request: &LoanRequest) -> bool {
    check_request(request).is_ok()
}

fn check_request(request: &LoanRequest) -> CalcResult<PaymentType> {
    let payment_type: PaymentType = request
        .payment_type
        .as_deref()
        .ok_or_else(|| LoanError::parameter("payment type is missing"))?
        .parse()?;

    if payment_type == PaymentType::Differentiated && request.payment.is_some() {
        return Err(LoanError::parameter(
            "a payment cannot be given for differentiated payments",
        ));
    }

    // a zero rate counts as not supplied
    match request.interest {
        None => return Err(LoanError::parameter("interest is missing")),
        Some(interest) if interest == 0. => {
            return Err(LoanError::parameter("interest is missing"))
        }
        Some(interest) if interest < 0. => {
            return Err(LoanError::parameter(format!(
                "interest is negative ({})",
                interest
            )))
        }
        Some(_) => {}
    }

    for (name, value) in [
        ("principal", request.principal),
        ("periods", request.periods),
        ("payment", request.payment),
    ] {
        if let Some(value) = value.filter(|&v| v < 0) {
            return Err(LoanError::parameter(format!(
                "{} is negative ({})",
                name, value
            )));
        }
    }

    Ok(payment_type)
}

/// The four things the calculator can work out, each holding exactly the
/// inputs it needs.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Calculation {
    Differentiated {
        principal: i64,
        periods: i64,
        interest: f64,
    },
    AnnuityPayment {
        principal: i64,
        periods: i64,
        interest: f64,
    },
    Principal {
        payment: i64,
        periods: i64,
        interest: f64,
    },
    Periods {
        principal: i64,
        payment: i64,
        interest: f64,
    },
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoanOutcome {
    AnnuityPayment(i64),
    DifferentiatedPayments(Vec<i64>),
    Principal(i64),
    Periods(i64),
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanResult {
    pub outcome: LoanOutcome,
    pub overpayment: f64,
}

impl Calculation {
    pub fn from_request(request: &LoanRequest) -> CalcResult<Self> {
        let payment_type = check_request(request)?;

        if request.supplied() < 4 {
            return Err(LoanError::parameter(format!(
                "{} of 5 parameters given, at least 4 are needed",
                request.supplied()
            )));
        }

        // zero values cannot drive any of the formulas
        let usable = |value: Option<i64>| value.filter(|&v| v != 0);
        let principal = usable(request.principal);
        let periods = usable(request.periods);
        let payment = usable(request.payment);
        let interest = request
            .interest
            .ok_or_else(|| LoanError::parameter("interest is missing"))?;

        let calculation = match (payment_type, principal, periods, payment) {
            (PaymentType::Differentiated, Some(principal), Some(periods), _) => {
                Calculation::Differentiated {
                    principal,
                    periods,
                    interest,
                }
            }
            (PaymentType::Annuity, Some(principal), Some(periods), _) => {
                Calculation::AnnuityPayment {
                    principal,
                    periods,
                    interest,
                }
            }
            (PaymentType::Annuity, _, Some(periods), Some(payment)) => Calculation::Principal {
                payment,
                periods,
                interest,
            },
            (PaymentType::Annuity, Some(principal), _, Some(payment)) => Calculation::Periods {
                principal,
                payment,
                interest,
            },
            _ => {
                return Err(LoanError::parameter(format!(
                    "insufficient parameters for {} payments",
                    payment_type
                )))
            }
        };
        debug!("selected calculation {:?}", calculation);
        Ok(calculation)
    }

    pub fn interest(&self) -> f64 {
        match *self {
            Calculation::Differentiated { interest, .. }
            | Calculation::AnnuityPayment { interest, .. }
            | Calculation::Principal { interest, .. }
            | Calculation::Periods { interest, .. } => interest,
        }
    }

    pub fn evaluate(&self) -> CalcResult<LoanResult> {
        let result = match *self {
            Calculation::Differentiated {
                principal,
                periods,
                interest,
            } => {
                let payments = compute_differentiated_payments(principal as f64, periods, interest)?;
                let total = payments
                    .iter()
                    .try_fold(0_i64, |total, &payment| total.checked_add(payment))
                    .ok_or_else(|| {
                        LoanError::domain(
                            "differentiated payments",
                            "total of the monthly payments overflows",
                        )
                    })?;
                LoanResult {
                    overpayment: compute_overpayment(total as f64, principal as f64),
                    outcome: LoanOutcome::DifferentiatedPayments(payments),
                }
            }
            Calculation::AnnuityPayment {
                principal,
                periods,
                interest,
            } => {
                let payment = compute_annuity_payment(principal as f64, interest, periods)?;
                LoanResult {
                    overpayment: compute_overpayment(
                        payment as f64 * periods as f64,
                        principal as f64,
                    ),
                    outcome: LoanOutcome::AnnuityPayment(payment),
                }
            }
            Calculation::Principal {
                payment,
                periods,
                interest,
            } => {
                let principal = compute_principal(payment as f64, periods, interest)?;
                LoanResult {
                    overpayment: compute_overpayment(
                        payment as f64 * periods as f64,
                        principal as f64,
                    ),
                    outcome: LoanOutcome::Principal(principal),
                }
            }
            Calculation::Periods {
                principal,
                payment,
                interest,
            } => {
                let periods = compute_periods(principal as f64, payment as f64, interest)?;
                LoanResult {
                    overpayment: compute_overpayment(
                        payment as f64 * periods as f64,
                        principal as f64,
                    ),
                    outcome: LoanOutcome::Periods(periods),
                }
            }
        };
        info!("{:?} -> {:?}", self, result);
        Ok(result)
    }

    /// Month-by-month repayment table for this calculation and its result.
    pub fn schedule(
        &self,
        result: &LoanResult,
        first_pmt_date: Option<NaiveDate>,
    ) -> Vec<LoanPayment> {
        let (principal, payments) = match (*self, &result.outcome) {
            (
                Calculation::Differentiated { principal, .. },
                LoanOutcome::DifferentiatedPayments(payments),
            ) => (principal, payments.clone()),
            (
                Calculation::AnnuityPayment {
                    principal, periods, ..
                },
                &LoanOutcome::AnnuityPayment(payment),
            ) => (principal, vec![payment; periods as usize]),
            (
                Calculation::Principal {
                    payment, periods, ..
                },
                &LoanOutcome::Principal(principal),
            ) => (principal, vec![payment; periods as usize]),
            (
                Calculation::Periods {
                    principal, payment, ..
                },
                &LoanOutcome::Periods(periods),
            ) => (principal, vec![payment; periods.max(0) as usize]),
            (_, outcome) => {
                debug_assert!(false, "{:?} does not belong to {:?}", outcome, self);
                return Vec::new();
            }
        };
        amortize(principal as f64, self.interest(), &payments, first_pmt_date)
    }
}
