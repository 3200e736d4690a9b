use crate::error::{CalcResult, LoanError};
use log::trace;

/// Monthly interest rate as a decimal, from an annual rate given in percent
/// (i.e., 7.8 for 7.8%).
pub fn monthly_rate(interest: f64) -> f64 {
    interest / 12. / 100.
}

// (1 + i)^periods, the compound factor shared by the annuity formulas
fn compound_factor(rate: f64, periods: i64) -> f64 {
    (1. + rate).powf(periods as f64)
}

fn require_periods(operation: &'static str, periods: i64) -> CalcResult<()> {
    if periods <= 0 {
        return Err(LoanError::domain(
            operation,
            format!("period count must be positive, got {}", periods),
        ));
    }
    Ok(())
}

fn require_finite(operation: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoanError::domain(
            operation,
            format!("result is not a finite number ({})", value),
        ))
    }
}

// an already rounded value as a whole number of units; `i64::MAX as f64` is
// 2^63 and itself out of range
fn whole_units(operation: &'static str, rounded: f64) -> CalcResult<i64> {
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(LoanError::domain(
            operation,
            format!("{} is outside the supported range", rounded),
        ))
    }
}

/// Fixed monthly payment that repays `principal` over `periods` months at an
/// annual `interest` percent. Rounded up to the next whole unit.
pub fn compute_annuity_payment(principal: f64, interest: f64, periods: i64) -> CalcResult<i64> {
    const OP: &str = "annuity payment";
    require_periods(OP, periods)?;

    let rate = monthly_rate(interest);
    let factor = compound_factor(rate, periods);
    if factor == 1. {
        return Err(LoanError::domain(OP, "compound factor is exactly 1"));
    }

    let payment = principal * (rate * factor) / (factor - 1.);
    trace!(
        "annuity: principal {}, rate {}, periods {}, raw payment {}",
        principal,
        rate,
        periods,
        payment
    );

    whole_units(OP, require_finite(OP, payment)?.ceil())
}

/// Monthly payments of a differentiated loan, month 1 first.
///
/// The principal portion is constant and the interest is charged on the
/// balance still outstanding at the start of each month. Every payment is
/// rounded up on its own, so the sum is slightly above the exact total.
pub fn compute_differentiated_payments(
    principal: f64,
    periods: i64,
    interest: f64,
) -> CalcResult<Vec<i64>> {
    const OP: &str = "differentiated payments";
    require_periods(OP, periods)?;

    let rate = monthly_rate(interest);
    let count = periods as f64;

    (1..=periods)
        .map(|month| -> CalcResult<i64> {
            let paid_down = principal * (month - 1) as f64 / count;
            let payment = (principal / count) + rate * (principal - paid_down);
            trace!("diff: month {}, raw payment {}", month, payment);
            whole_units(OP, require_finite(OP, payment)?.ceil())
        })
        .collect()
}

/// Largest principal that a monthly `payment` repays over `periods` months.
/// Rounded down to a whole unit.
pub fn compute_principal(payment: f64, periods: i64, interest: f64) -> CalcResult<i64> {
    const OP: &str = "loan principal";
    require_periods(OP, periods)?;

    let rate = monthly_rate(interest);
    let factor = compound_factor(rate, periods);
    let annuity_ratio = (rate * factor) / (factor - 1.);
    if annuity_ratio == 0. || !annuity_ratio.is_finite() {
        return Err(LoanError::domain(
            OP,
            format!("annuity ratio is {} for rate {}", annuity_ratio, rate),
        ));
    }

    let principal = payment / annuity_ratio;
    trace!(
        "principal: payment {}, rate {}, periods {}, raw principal {}",
        payment,
        rate,
        periods,
        principal
    );

    whole_units(OP, require_finite(OP, principal)?.floor())
}

/// Number of monthly payments needed to repay `principal` with `payment`.
/// Rounded up, so the last month may be a partial one.
///
/// A zero rate is not handled: the logarithm base would be 1.
pub fn compute_periods(principal: f64, payment: f64, interest: f64) -> CalcResult<i64> {
    const OP: &str = "repayment period";

    let rate = monthly_rate(interest);
    if rate == 0. {
        return Err(LoanError::domain(OP, "a zero interest rate has no log base"));
    }

    let remaining = payment - rate * principal;
    if remaining <= 0. {
        return Err(LoanError::domain(
            OP,
            format!(
                "payment {} does not exceed the monthly interest {}",
                payment,
                rate * principal
            ),
        ));
    }

    let periods = (payment / remaining).ln() / (1. + rate).ln();
    trace!(
        "periods: principal {}, payment {}, rate {}, raw periods {}",
        principal,
        payment,
        rate,
        periods
    );

    whole_units(OP, require_finite(OP, periods)?.ceil())
}

/// Amount paid on top of the principal.
pub fn compute_overpayment(total_paid: f64, principal: f64) -> f64 {
    total_paid - principal
}

#[cfg(test)]
mod tests {
    use super::{
        compute_annuity_payment, compute_differentiated_payments, compute_overpayment,
        compute_periods, compute_principal, monthly_rate,
    };
    use crate::error::LoanError;
    use test_log::test;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(12.), 0.01);
        assert_eq!(monthly_rate(0.), 0.);
    }

    #[test]
    fn test_compute_annuity_payment() {
        assert_eq!(compute_annuity_payment(1000000., 10., 60), Ok(21248));
        assert_eq!(compute_annuity_payment(500000., 7.8, 8), Ok(64342));
        assert_eq!(compute_annuity_payment(300000., 5., 12), Ok(25683));
        // a single period repays principal plus one month of interest
        assert_eq!(compute_annuity_payment(1000., 5., 1), Ok(1005));
    }

    #[test]
    fn test_annuity_payment_domain_errors() {
        assert!(matches!(
            compute_annuity_payment(1000000., 10., 0),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_annuity_payment(1000000., 10., -12),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_annuity_payment(1000000., 0., 60),
            Err(LoanError::Domain { .. })
        ));
    }

    #[test]
    fn test_compute_differentiated_payments() {
        assert_eq!(
            compute_differentiated_payments(500000., 8, 7.8),
            Ok(vec![65750, 65344, 64938, 64532, 64125, 63719, 63313, 62907])
        );
        assert_eq!(
            compute_differentiated_payments(1000000., 10, 10.),
            Ok(vec![
                108334, 107500, 106667, 105834, 105000, 104167, 103334, 102500, 101667, 100834
            ])
        );
        assert_eq!(compute_differentiated_payments(1000., 1, 5.), Ok(vec![1005]));
    }

    #[test]
    fn test_differentiated_payments_shape() {
        for &(principal, periods, interest) in &[
            (50000., 6, 3.5),
            (300000., 120, 5.6),
            (2500000., 360, 19.9),
        ] {
            let payments = compute_differentiated_payments(principal, periods, interest).unwrap();
            assert_eq!(payments.len(), periods as usize);
            assert!(payments.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }

    #[test]
    fn test_differentiated_payments_need_periods() {
        assert!(matches!(
            compute_differentiated_payments(500000., 0, 7.8),
            Err(LoanError::Domain { .. })
        ));
    }

    #[test]
    fn test_compute_principal() {
        assert_eq!(compute_principal(8722., 120, 5.6), Ok(800018));
        assert_eq!(compute_principal(21248., 60, 10.), Ok(1000044));
        assert_eq!(compute_principal(25683., 12, 5.), Ok(300008));
    }

    #[test]
    fn test_principal_domain_errors() {
        assert!(matches!(
            compute_principal(8722., 0, 5.6),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_principal(8722., 120, 0.),
            Err(LoanError::Domain { .. })
        ));
    }

    #[test]
    fn test_principal_round_trip() {
        // paying the rounded-up annuity back through the inverse formula never
        // loses principal, and gains less than one unit per period
        for &principal in &[1000_i64, 50000, 300000, 1000000, 2500000] {
            for &periods in &[1_i64, 6, 12, 60, 120, 360] {
                for &interest in &[0.5, 3.5, 5.6, 10., 19.9] {
                    let payment =
                        compute_annuity_payment(principal as f64, interest, periods).unwrap();
                    let back = compute_principal(payment as f64, periods, interest).unwrap();
                    assert!(
                        back >= principal && back - principal <= periods,
                        "principal {} periods {} interest {}: got {}",
                        principal,
                        periods,
                        interest,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn test_compute_periods() {
        assert_eq!(compute_periods(500000., 23000., 7.8), Ok(24));
        assert_eq!(compute_periods(1000000., 15000., 10.), Ok(98));
        assert_eq!(compute_periods(100000., 10000., 12.), Ok(11));
        assert_eq!(compute_periods(1000., 1005., 6.), Ok(1));
    }

    #[test]
    fn test_periods_domain_errors() {
        // payment only covers the interest
        assert!(matches!(
            compute_periods(500000., 3250., 7.8),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_periods(500000., 1000., 7.8),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_periods(500000., 23000., 0.),
            Err(LoanError::Domain { .. })
        ));
    }

    #[test]
    fn test_results_beyond_i64_are_domain_errors() {
        // one period at 10% is principal plus 1/120th, past the largest i64
        assert!(matches!(
            compute_annuity_payment(i64::MAX as f64, 10., 1),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_differentiated_payments(i64::MAX as f64, 1, 10.),
            Err(LoanError::Domain { .. })
        ));
        assert!(matches!(
            compute_principal(i64::MAX as f64, 12, 10.),
            Err(LoanError::Domain { .. })
        ));
        // still representable
        assert_eq!(
            compute_annuity_payment(1e15, 12., 1),
            Ok(1_010_000_000_000_000)
        );
    }

    #[test]
    fn test_compute_overpayment() {
        assert_eq!(compute_overpayment(1274880., 1000000.), 274880.);
        assert_eq!(compute_overpayment(100., 250.), -150.);
        assert_eq!(compute_overpayment(0.5, 0.25), 0.25);
    }
}
