// Property-based tests for reconciliation logic.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use astroreport_recon::assemble::{assemble, ReportCriteria};
use astroreport_recon::classify::classify;
use astroreport_recon::config::ToleranceConfig;
use astroreport_recon::identity::{ExactLabel, IdentityResolver};
use astroreport_recon::index::ObservationIndex;
use astroreport_recon::model::{Classification, DateRange, Observation, ReportSelection};
use astroreport_recon::ReconError;

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_label() -> impl Strategy<Value = String> {
    r"[A-Za-z0-9]{1,7}"
}

fn arb_mjd() -> impl Strategy<Value = f64> {
    (50000u32..60000, 0u32..100000).prop_map(|(day, frac)| day as f64 + frac as f64 / 100000.0)
}

/// Away from the poles so RA offsets stay well defined.
fn arb_position() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..360.0, -80.0f64..80.0)
}

fn arb_tolerance() -> impl Strategy<Value = f64> {
    0.05f64..5.0
}

/// Every pair of labels is the same object.
struct Everything;

impl IdentityResolver for Everything {
    fn is_same(&self, _: &str, _: &str) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// A new record within tolerance of an existing one at the same epoch is
    /// never reported, whatever the labels or the selection.
    #[test]
    fn dedup(
        mjd in arb_mjd(),
        (ra, dec) in arb_position(),
        tol in arb_tolerance(),
        frac in 0.0f64..0.9,
        old_label in arb_label(),
        new_label in arb_label(),
        others in prop::collection::vec((arb_label(), arb_position()), 0..4),
        want_replacement in any::<bool>(),
    ) {
        let offset_deg = tol * frac / 3600.0;
        let mut existing = vec![Observation::new(mjd, old_label.clone(), ra, dec)];
        for (label, (o_ra, o_dec)) in others {
            if label != old_label {
                existing.push(Observation::new(mjd, label, o_ra, o_dec));
            }
        }
        let mut index = ObservationIndex::new();
        for obs in existing {
            // Random extra members may collide on label; skip those.
            let _ = index.insert(obs);
        }

        let incoming = Observation::new(mjd, new_label, ra, dec + offset_deg);
        let criteria = ReportCriteria {
            date_range: DateRange::default(),
            tolerance: ToleranceConfig { arcsec: tol },
            selection: ReportSelection::from_want_replacement(want_replacement),
        };
        let report = assemble([&incoming], &index, &Everything, &criteria);
        prop_assert!(report.selected.is_empty());
        let report = assemble([&incoming], &index, &ExactLabel, &criteria);
        prop_assert!(report.selected.is_empty());
    }

    /// Same object, materially different position, single bucket member:
    /// always a replacement.
    #[test]
    fn replacement(
        mjd in arb_mjd(),
        (ra, dec) in arb_position(),
        tol in arb_tolerance(),
        extra_arcsec in 0.001f64..3600.0,
        label in arb_label(),
        new_label in arb_label(),
    ) {
        let offset_deg = (tol + extra_arcsec) / 3600.0;
        let index = ObservationIndex::from_observations(vec![
            Observation::new(mjd, label, ra, dec),
        ]).unwrap();
        let incoming = Observation::new(mjd, new_label, ra, dec + offset_deg);
        let out = classify(&incoming, &index, &Everything, &ToleranceConfig { arcsec: tol });
        prop_assert_eq!(out.classification, Classification::Replacement);
    }

    /// Two differing detections under one key always conflict.
    #[test]
    fn conflict_fatality(
        mjd in arb_mjd(),
        (ra, dec) in arb_position(),
        delta in 1e-6f64..1.0,
        label in arb_label(),
    ) {
        let result = ObservationIndex::from_observations(vec![
            Observation::new(mjd, label.clone(), ra, dec),
            Observation::new(mjd, label, ra, dec + delta),
        ]);
        let is_conflict = matches!(result, Err(ReconError::Conflict { .. }));
        prop_assert!(is_conflict);
    }

    /// A record exactly on either bound is excluded.
    #[test]
    fn date_range_exclusion(
        mjd in arb_mjd(),
        (ra, dec) in arb_position(),
        label in arb_label(),
        width in 0.001f64..100.0,
    ) {
        let index = ObservationIndex::new();
        let incoming = Observation::new(mjd, label, ra, dec);

        for range in [
            DateRange::new(Some(mjd), None),
            DateRange::new(None, Some(mjd)),
            DateRange::new(Some(mjd), Some(mjd + width)),
            DateRange::new(Some(mjd - width), Some(mjd)),
        ] {
            let criteria = ReportCriteria { date_range: range, ..ReportCriteria::default() };
            let report = assemble([&incoming], &index, &ExactLabel, &criteria);
            prop_assert!(report.selected.is_empty());
            prop_assert_eq!(report.summary.out_of_range, 1);
        }

        let inside = ReportCriteria {
            date_range: DateRange::new(Some(mjd - width), Some(mjd + width)),
            ..ReportCriteria::default()
        };
        let report = assemble([&incoming], &index, &ExactLabel, &inside);
        prop_assert_eq!(report.selected.len(), 1);
    }
}
