//! Runs in its own process: many threads race to fix the resolution.

use simtime::numeric::{MAX_SCALE_EXPONENT, MIN_SCALE_EXPONENT};
use simtime::prelude::*;
use std::sync::Barrier;

#[test]
fn test_exactly_one_configuration_wins() {
    let exponents: Vec<i32> = (MIN_SCALE_EXPONENT..=MAX_SCALE_EXPONENT).step_by(3).collect();
    let barrier = Barrier::new(exponents.len());

    let outcomes: Vec<(i32, TimeResult<Resolution>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = exponents
            .iter()
            .map(|&exponent| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    (exponent, set_resolution(exponent))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<i32> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.is_ok())
        .map(|(exponent, _)| *exponent)
        .collect();
    assert_eq!(winners.len(), 1);

    let fixed = scale_exponent().unwrap();
    assert_eq!(fixed, winners[0]);
    for (exponent, outcome) in &outcomes {
        if *exponent != fixed {
            assert_eq!(
                outcome,
                &Err(TimeError::ResolutionConflict {
                    current: fixed,
                    requested: *exponent
                })
            );
        }
    }

    // the same value is accepted again
    assert!(set_resolution(fixed).is_ok());
    assert_eq!(SimTimeConfig::new().with_legacy_scale(fixed).configure().unwrap(), fixed);
}
