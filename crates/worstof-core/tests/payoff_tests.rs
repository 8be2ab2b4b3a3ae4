use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use worstof_core::config::{BarrierConfig, PayoffDomain};
use worstof_core::payoff::{payoff_curve, redemption_at};

// ===========================================================================
// Payoff profile at maturity
// ===========================================================================

#[test]
fn test_reference_points() {
    let b = BarrierConfig::new(dec!(60), dec!(1000)).unwrap();
    assert_eq!(redemption_at(&b, dec!(-50)), dec!(500));
    assert_eq!(redemption_at(&b, dec!(10)), dec!(1000));
}

#[test]
fn test_curve_matches_point_rule() {
    let b = BarrierConfig::new(dec!(70), dec!(2500)).unwrap();
    let curve = payoff_curve(&b, &PayoffDomain::default()).unwrap();
    for p in &curve.points {
        assert_eq!(p.redemption, redemption_at(&b, p.performance_pct));
        if p.performance_pct > dec!(-30) {
            assert_eq!(p.redemption, dec!(2500));
        } else {
            assert!(p.redemption <= dec!(1750));
        }
    }
}

#[test]
fn test_full_barrier_has_no_protection() {
    // 100% barrier: any loss is passed through.
    let b = BarrierConfig::new(dec!(100), dec!(1000)).unwrap();
    assert_eq!(redemption_at(&b, dec!(-1)), dec!(990));
    assert_eq!(redemption_at(&b, dec!(0)), dec!(1000));
    assert_eq!(redemption_at(&b, dec!(0.01)), dec!(1000));
}

#[test]
fn test_custom_domain() {
    let b = BarrierConfig::default();
    let domain = PayoffDomain {
        start: dec!(-60),
        end: dec!(0),
        points: 7,
    };
    let curve = payoff_curve(&b, &domain).unwrap();
    let perfs: Vec<Decimal> = curve.points.iter().map(|p| p.performance_pct).collect();
    assert_eq!(
        perfs,
        vec![dec!(-60), dec!(-50), dec!(-40), dec!(-30), dec!(-20), dec!(-10), dec!(0)]
    );
    assert_eq!(curve.points[0].redemption, dec!(400));
    assert_eq!(curve.points[2].redemption, dec!(600));
    assert_eq!(curve.points[3].redemption, dec!(1000));
}
