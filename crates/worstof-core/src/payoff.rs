//! Redemption profile of the certificate at maturity.
//!
//! Full notional is repaid while the worst-of performance stays above the
//! protection threshold (`barrier_level - 100`); at or below it, redemption
//! follows the worst-of underlying one-to-one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{BarrierConfig, PayoffDomain};
use crate::types::{Money, Percent};
use crate::WorstOfResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub performance_pct: Percent,
    pub redemption: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffCurve {
    pub barrier_level: Percent,
    pub notional: Money,
    /// Worst-of performance at which capital protection is lost.
    pub protection_threshold: Percent,
    pub points: Vec<PayoffPoint>,
}

/// Redemption for a single worst-of performance (in percent).
pub fn redemption_at(barrier: &BarrierConfig, performance_pct: Percent) -> Money {
    if performance_pct > barrier.protection_threshold() {
        barrier.notional
    } else {
        barrier.notional * (Decimal::ONE + performance_pct / dec!(100))
    }
}

/// Sample the redemption profile over `domain`.
pub fn payoff_curve(barrier: &BarrierConfig, domain: &PayoffDomain) -> WorstOfResult<PayoffCurve> {
    barrier.validate()?;
    domain.validate()?;

    let points = domain
        .grid()
        .into_iter()
        .map(|p| PayoffPoint {
            performance_pct: p,
            redemption: redemption_at(barrier, p),
        })
        .collect();

    Ok(PayoffCurve {
        barrier_level: barrier.barrier_level,
        notional: barrier.notional,
        protection_threshold: barrier.protection_threshold(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barrier60() -> BarrierConfig {
        BarrierConfig::new(dec!(60), dec!(1000)).unwrap()
    }

    #[test]
    fn test_redemption_below_threshold() {
        assert_eq!(redemption_at(&barrier60(), dec!(-50)), dec!(500));
    }

    #[test]
    fn test_redemption_above_threshold() {
        assert_eq!(redemption_at(&barrier60(), dec!(10)), dec!(1000));
        assert_eq!(redemption_at(&barrier60(), dec!(-39.99)), dec!(1000));
    }

    #[test]
    fn test_redemption_at_threshold_tracks_loss() {
        // Strictly-greater rule: exactly -40 is not protected.
        assert_eq!(redemption_at(&barrier60(), dec!(-40)), dec!(600));
    }

    #[test]
    fn test_total_loss() {
        assert_eq!(redemption_at(&barrier60(), dec!(-100)), Decimal::ZERO);
    }

    #[test]
    fn test_default_curve_shape() {
        let curve = payoff_curve(&barrier60(), &PayoffDomain::default()).unwrap();
        assert_eq!(curve.points.len(), 100);
        assert_eq!(curve.protection_threshold, dec!(-40));
        assert_eq!(curve.points[0].performance_pct, dec!(-100));
        assert_eq!(curve.points[0].redemption, Decimal::ZERO);
        assert_eq!(curve.points[99].redemption, dec!(1000));
        // Non-decreasing in performance below the threshold.
        let below: Vec<_> = curve
            .points
            .iter()
            .filter(|p| p.performance_pct <= dec!(-40))
            .collect();
        assert!(below.windows(2).all(|w| w[0].redemption <= w[1].redemption));
    }

    #[test]
    fn test_curve_is_deterministic() {
        let a = payoff_curve(&barrier60(), &PayoffDomain::default()).unwrap();
        let b = payoff_curve(&barrier60(), &PayoffDomain::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let domain = PayoffDomain {
            start: dec!(10),
            end: dec!(-10),
            points: 5,
        };
        assert!(payoff_curve(&barrier60(), &domain).is_err());
    }
}
