use crate::config::ToleranceConfig;
use crate::identity::IdentityResolver;
use crate::index::ObservationIndex;
use crate::model::{
    Classification, ClassifyOutcome, IdentityConflict, MatchedCandidate, Observation,
};

/// Classify one newly measured record against the previously reported index.
///
/// Scans the existing bucket at the same epoch in label order:
/// - first member within tolerance -> `Duplicate`, scan stops. If the alias
///   table disagrees on identity the outcome also carries a conflict.
/// - a same-object member outside tolerance -> `Replacement` candidate, scan
///   continues; a later positional match still wins.
/// - otherwise `New`.
pub fn classify<R>(
    new_observation: &Observation,
    existing: &ObservationIndex,
    resolver: &R,
    tolerance: &ToleranceConfig,
) -> ClassifyOutcome
where
    R: IdentityResolver + ?Sized,
{
    let bucket = existing.lookup_bucket(new_observation.mjd);
    let mut replacement: Option<MatchedCandidate> = None;

    for (label, old) in bucket.iter() {
        let separation_arcsec = new_observation
            .coordinate
            .separation_arcsec(&old.coordinate);
        let same_object = resolver.is_same(&new_observation.label, label);

        if separation_arcsec < tolerance.arcsec {
            let conflict = (!same_object).then(|| IdentityConflict {
                mjd: new_observation.mjd,
                new_label: new_observation.label.clone(),
                existing_label: label.to_string(),
                separation_arcsec,
                new_line: new_observation.raw_text.trim_end().to_string(),
                existing_line: old.raw_text.trim_end().to_string(),
            });
            return ClassifyOutcome {
                classification: Classification::Duplicate,
                matched: Some(MatchedCandidate {
                    label: label.to_string(),
                    separation_arcsec,
                }),
                conflict,
            };
        }

        if same_object && replacement.is_none() {
            replacement = Some(MatchedCandidate {
                label: label.to_string(),
                separation_arcsec,
            });
        }
    }

    match replacement {
        Some(candidate) => ClassifyOutcome {
            classification: Classification::Replacement,
            matched: Some(candidate),
            conflict: None,
        },
        None => ClassifyOutcome {
            classification: Classification::New,
            matched: None,
            conflict: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ExactLabel;

    fn tol(arcsec: f64) -> ToleranceConfig {
        ToleranceConfig { arcsec }
    }

    fn index(obs: Vec<Observation>) -> ObservationIndex {
        ObservationIndex::from_observations(obs).unwrap()
    }

    #[test]
    fn empty_bucket_is_new() {
        let existing = index(vec![Observation::new(56800.0, "a", 10.0, 10.0)]);
        let incoming = Observation::new(56800.5, "a", 10.0, 10.0);
        let out = classify(&incoming, &existing, &ExactLabel, &tol(0.2));
        assert_eq!(out.classification, Classification::New);
        assert!(out.matched.is_none());
    }

    #[test]
    fn far_unrelated_member_is_new() {
        let existing = index(vec![Observation::new(56800.0, "a", 10.0, 10.0)]);
        let incoming = Observation::new(56800.0, "b", 11.0, 10.0);
        let out = classify(&incoming, &existing, &ExactLabel, &tol(0.2));
        assert_eq!(out.classification, Classification::New);
    }

    #[test]
    fn tolerance_is_strict() {
        let existing = index(vec![Observation::new(56800.0, "a", 10.0, 0.0)]);
        // Exactly 0.36 arcsec north.
        let incoming = Observation::new(56800.0, "a", 10.0, 0.0001);
        let sep = incoming
            .coordinate
            .separation_arcsec(&existing.lookup_bucket(56800.0).get("a").unwrap().coordinate);
        let at_boundary = classify(&incoming, &existing, &ExactLabel, &tol(sep));
        assert_eq!(at_boundary.classification, Classification::Replacement);
        let inside = classify(&incoming, &existing, &ExactLabel, &tol(sep + 1e-9));
        assert_eq!(inside.classification, Classification::Duplicate);
    }

    #[test]
    fn duplicate_later_in_scan_overrides_replacement() {
        // "a" sorts first and is the same object but far away; "b" is a
        // different label sitting on top of the new position.
        let existing = index(vec![
            Observation::new(56800.0, "a", 10.0, 10.0),
            Observation::new(56800.0, "b", 20.0, 10.0),
        ]);
        let incoming = Observation::new(56800.0, "a", 20.0, 10.0);
        let out = classify(&incoming, &existing, &ExactLabel, &tol(0.2));
        assert_eq!(out.classification, Classification::Duplicate);
        assert_eq!(out.matched.unwrap().label, "b");
        let conflict = out.conflict.expect("labels disagree");
        assert_eq!(conflict.new_label, "a");
        assert_eq!(conflict.existing_label, "b");
    }

    #[test]
    fn first_match_in_label_order_wins() {
        let existing = index(vec![
            Observation::new(56800.0, "zeta", 10.0, 10.0),
            Observation::new(56800.0, "alpha", 10.0, 10.00001),
        ]);
        let incoming = Observation::new(56800.0, "zeta", 10.0, 10.0);
        let out = classify(&incoming, &existing, &ExactLabel, &tol(0.2));
        assert_eq!(out.classification, Classification::Duplicate);
        assert_eq!(out.matched.unwrap().label, "alpha");
        assert!(out.conflict.is_some());
    }

    #[test]
    fn same_label_same_place_has_no_conflict() {
        let existing = index(vec![Observation::new(56800.0, "a", 10.0, 10.0)]);
        let incoming = Observation::new(56800.0, "a", 10.0, 10.0);
        let out = classify(&incoming, &existing, &ExactLabel, &tol(0.2));
        assert_eq!(out.classification, Classification::Duplicate);
        assert!(out.conflict.is_none());
        assert_eq!(out.matched.unwrap().separation_arcsec, 0.0);
    }
}
