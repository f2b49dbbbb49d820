//! # Inventory Accounting Properties
//!
//! Random sequences of checkouts and checkins across several agencies must
//! keep the license's counts, the key placement and the two mirrored views
//! in agreement after every step, whether the step succeeded or failed.

use blossom_core::Timestamp;
use blossom_state::{checkin, checkout, Agency, License, Users};
use proptest::prelude::*;

const AGENCIES: [&str; 3] = ["a1", "a2", "a3"];

#[derive(Debug, Clone)]
enum Step {
    /// Agency index, amount.
    Checkout(usize, usize),
    /// Agency index, how many of its keys to return, plus one bogus key.
    Checkin(usize, usize, bool),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..AGENCIES.len(), 0usize..6).prop_map(|(a, n)| Step::Checkout(a, n)),
        (0..AGENCIES.len(), 0usize..4, any::<bool>()).prop_map(|(a, n, bogus)| Step::Checkin(a, n, bogus)),
    ]
}

fn now() -> Timestamp {
    Timestamp::parse("2026-06-30T00:00:00Z").unwrap()
}

fn setup(pool: usize) -> (License, Vec<Agency>) {
    let keys = (0..pool).map(|i| format!("key-{i:02}")).collect();
    let license = License::onboard("l1", "CAD Suite", keys, now()).unwrap();
    let agencies = AGENCIES
        .iter()
        .map(|name| Agency::request(*name, "MSP", Users::new("so", "acq", "sa")))
        .collect();
    (license, agencies)
}

fn assert_mirrored(license: &License, agencies: &[Agency]) {
    for agency in agencies {
        assert_eq!(
            license.checked_out.get(&agency.name),
            agency.assets.get(&license.id),
            "views of {} disagree",
            agency.name
        );
    }
    for held in license.checked_out.values() {
        assert!(!held.is_empty(), "empty per-agency entry left behind");
    }
}

proptest! {
    #[test]
    fn accounting_holds_after_every_step(
        pool in 0usize..12,
        steps in prop::collection::vec(step(), 1..40),
    ) {
        let (mut license, mut agencies) = setup(pool);

        for s in steps {
            let before = (license.clone(), agencies.clone());
            match s {
                Step::Checkout(i, amount) => {
                    let available = license.available;
                    let result = checkout(&mut license, &mut agencies[i], amount, now());
                    if amount == 0 || amount > available {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(&license, &before.0);
                    } else {
                        prop_assert_eq!(result.unwrap().len(), amount);
                        prop_assert_eq!(license.available, available - amount);
                    }
                }
                Step::Checkin(i, n, bogus) => {
                    let mut keys: Vec<String> = agencies[i]
                        .assets
                        .get("l1")
                        .map(|held| held.keys().take(n).cloned().collect())
                        .unwrap_or_default();
                    if bogus {
                        keys.push("not-a-key".to_string());
                    }
                    let result = checkin(&mut license, &mut agencies[i], &keys);
                    if bogus {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(&license, &before.0);
                        prop_assert_eq!(&agencies, &before.1);
                    } else {
                        prop_assert!(result.is_ok());
                        let tail = &license.available_keys[license.available_keys.len() - keys.len()..];
                        prop_assert_eq!(tail, &keys[..]);
                    }
                }
            }
            prop_assert!(license.is_consistent());
            assert_mirrored(&license, &agencies);
        }
    }

    #[test]
    fn checkout_then_full_checkin_restores_pool_size(pool in 1usize..12, take in 1usize..12) {
        prop_assume!(take <= pool);
        let (mut license, mut agencies) = setup(pool);
        let taken = checkout(&mut license, &mut agencies[0], take, now()).unwrap();
        let keys: Vec<String> = taken.into_keys().collect();
        checkin(&mut license, &mut agencies[0], &keys).unwrap();

        prop_assert_eq!(license.available, pool);
        prop_assert!(license.checked_out.is_empty());
        prop_assert!(agencies[0].assets.is_empty());
        let mut sorted = license.available_keys.clone();
        sorted.sort();
        prop_assert_eq!(sorted, license.all_keys.clone());
    }
}

#[test]
fn fifo_example() {
    let keys = vec!["k1".to_string(), "k2".to_string(), "k3".to_string()];
    let mut license = License::onboard("l1", "Suite", keys, now()).unwrap();
    let mut agency = Agency::request("a1", "MSP", Users::default());
    let taken = checkout(&mut license, &mut agency, 2, now()).unwrap();
    assert_eq!(taken.keys().cloned().collect::<Vec<_>>(), vec!["k1", "k2"]);
    assert_eq!(license.available_keys, vec!["k3".to_string()]);
}
