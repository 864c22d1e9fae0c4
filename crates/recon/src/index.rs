use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{MjdKey, Observation};

/// Outcome of a successful [`ObservationIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Identical content, or a null placeholder on an occupied key.
    Unchanged,
    /// A detection replaced a null placeholder.
    UpgradedPlaceholder,
}

/// Epoch -> label -> observation. At most one record per (epoch, label).
///
/// Both levels are ordered, so iteration (and therefore first-match-wins
/// scanning during classification) is deterministic: by epoch, then label.
#[derive(Debug, Default)]
pub struct ObservationIndex {
    buckets: BTreeMap<MjdKey, BTreeMap<String, Observation>>,
    len: usize,
}

impl ObservationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a flat record sequence. Fails on the first
    /// conflicting pair.
    pub fn from_observations<I>(observations: I) -> Result<Self, ReconError>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut index = Self::new();
        for obs in observations {
            index.insert(obs)?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, observation: Observation) -> Result<InsertOutcome, ReconError> {
        let bucket = self.buckets.entry(observation.key()).or_default();

        let mut slot = match bucket.entry(observation.label.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(observation);
                self.len += 1;
                return Ok(InsertOutcome::Inserted);
            }
            Entry::Occupied(slot) => slot,
        };
        let existing = slot.get_mut();

        if existing.same_content(&observation) || observation.is_null {
            return Ok(InsertOutcome::Unchanged);
        }

        if existing.is_null {
            tracing::debug!(
                record = %observation.describe(),
                "detection replaces null placeholder"
            );
            *existing = observation;
            return Ok(InsertOutcome::UpgradedPlaceholder);
        }

        Err(ReconError::Conflict {
            mjd: observation.mjd,
            label: observation.label.clone(),
            existing: source_line(existing),
            incoming: source_line(&observation),
        })
    }

    /// All records sharing an epoch, keyed by label. Empty when none.
    pub fn lookup_bucket(&self, mjd: f64) -> Bucket<'_> {
        Bucket(self.buckets.get(&MjdKey::from(mjd)))
    }

    /// Every record, ordered by epoch then label.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.buckets.values().flat_map(|b| b.values())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct epochs.
    pub fn epoch_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Read-only view of one epoch bucket.
#[derive(Debug, Clone, Copy)]
pub struct Bucket<'a>(Option<&'a BTreeMap<String, Observation>>);

impl<'a> Bucket<'a> {
    pub fn is_empty(&self) -> bool {
        self.0.map_or(true, |b| b.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.map_or(0, |b| b.len())
    }

    pub fn get(&self, label: &str) -> Option<&'a Observation> {
        self.0.and_then(|b| b.get(label))
    }

    /// Members in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Observation)> {
        self.0
            .into_iter()
            .flat_map(|b| b.iter().map(|(label, obs)| (label.as_str(), obs)))
    }
}

fn source_line(obs: &Observation) -> String {
    let text = if obs.raw_text.is_empty() {
        format!(
            "{} ra={:.6} dec={:.6}{}",
            obs.label,
            obs.coordinate.ra_deg,
            obs.coordinate.dec_deg,
            if obs.is_null { " (null)" } else { "" }
        )
    } else {
        obs.raw_text.trim_end().to_string()
    };
    match &obs.origin {
        Some(origin) => format!("{text}  [{origin}]"),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(mjd: f64, label: &str, ra: f64, dec: f64) -> Observation {
        Observation::new(mjd, label, ra, dec)
    }

    #[test]
    fn insert_and_lookup() {
        let mut index = ObservationIndex::new();
        assert_eq!(index.insert(obs(56800.5, "a", 1.0, 2.0)).unwrap(), InsertOutcome::Inserted);
        assert_eq!(index.insert(obs(56800.5, "b", 1.0, 2.0)).unwrap(), InsertOutcome::Inserted);
        assert_eq!(index.insert(obs(56801.5, "a", 1.0, 2.0)).unwrap(), InsertOutcome::Inserted);

        assert_eq!(index.len(), 3);
        assert_eq!(index.epoch_count(), 2);
        let bucket = index.lookup_bucket(56800.5);
        assert_eq!(bucket.len(), 2);
        assert!(bucket.get("a").is_some());
        assert!(index.lookup_bucket(56802.0).is_empty());
    }

    #[test]
    fn identical_reinsert_is_noop() {
        let mut index = ObservationIndex::new();
        index.insert(obs(56800.5, "a", 1.0, 2.0)).unwrap();
        let again = obs(56800.5, "a", 1.0, 2.0).with_origin("second.ast:1");
        assert_eq!(index.insert(again).unwrap(), InsertOutcome::Unchanged);
        assert_eq!(index.len(), 1);
        // First one wins.
        assert!(index.lookup_bucket(56800.5).get("a").unwrap().origin.is_none());
    }

    #[test]
    fn differing_detection_is_conflict() {
        let mut index = ObservationIndex::new();
        index.insert(obs(56800.5, "a", 1.0, 2.0)).unwrap();
        let err = index.insert(obs(56800.5, "a", 1.0, 2.5)).unwrap_err();
        match err {
            ReconError::Conflict { label, mjd, .. } => {
                assert_eq!(label, "a");
                assert_eq!(mjd, 56800.5);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn lines_differing_in_unparsed_columns_conflict() {
        let line = "     o3l79    C2014 05 23.12345008 00 00.000-10 00 00.00         23.40r      568";
        let flagged = format!("{}*{}", &line[..12], &line[13..]);
        let mut index = ObservationIndex::new();
        index
            .insert(obs(56800.12345, "o3l79", 120.0, -10.0).with_raw_text(line))
            .unwrap();
        let err = index
            .insert(obs(56800.12345, "o3l79", 120.0, -10.0).with_raw_text(flagged))
            .unwrap_err();
        assert!(matches!(err, ReconError::Conflict { .. }));
    }

    #[test]
    fn identical_line_from_another_file_is_noop() {
        let line = "     o3l79    C2014 05 23.12345008 00 00.000-10 00 00.00           nanr      568";
        let mut index = ObservationIndex::new();
        let mut first = obs(56800.12345, "o3l79", 120.0, -10.0).with_raw_text(line);
        first.magnitude = Some(f64::NAN);
        let second = first.clone().with_origin("b.ast:1");
        index.insert(first).unwrap();
        assert_eq!(index.insert(second).unwrap(), InsertOutcome::Unchanged);
    }

    #[test]
    fn null_on_occupied_key_is_noop() {
        let mut index = ObservationIndex::new();
        index.insert(obs(56800.5, "a", 1.0, 2.0)).unwrap();
        let placeholder = obs(56800.5, "a", 3.0, 4.0).null();
        assert_eq!(index.insert(placeholder.clone()).unwrap(), InsertOutcome::Unchanged);
        assert_eq!(index.insert(placeholder).unwrap(), InsertOutcome::Unchanged);
        assert!(!index.lookup_bucket(56800.5).get("a").unwrap().is_null);
    }

    #[test]
    fn detection_upgrades_placeholder() {
        let mut index = ObservationIndex::new();
        index.insert(obs(56800.5, "a", 3.0, 4.0).null()).unwrap();
        let outcome = index.insert(obs(56800.5, "a", 1.0, 2.0)).unwrap();
        assert_eq!(outcome, InsertOutcome::UpgradedPlaceholder);
        assert_eq!(index.len(), 1);
        let kept = index.lookup_bucket(56800.5).get("a").unwrap();
        assert!(!kept.is_null);
        assert_eq!(kept.coordinate.ra_deg, 1.0);
    }

    #[test]
    fn iteration_is_ordered_by_epoch_then_label() {
        let index = ObservationIndex::from_observations(vec![
            obs(56801.0, "b", 0.0, 0.0),
            obs(56800.0, "z", 0.0, 0.0),
            obs(56801.0, "a", 0.0, 0.0),
            obs(56800.0, "c", 0.0, 0.0),
        ])
        .unwrap();
        let order: Vec<(f64, &str)> = index.iter().map(|o| (o.mjd, o.label.as_str())).collect();
        assert_eq!(
            order,
            vec![(56800.0, "c"), (56800.0, "z"), (56801.0, "a"), (56801.0, "b")]
        );
    }

    #[test]
    fn from_observations_stops_on_conflict() {
        let result = ObservationIndex::from_observations(vec![
            obs(56800.0, "a", 0.0, 0.0).with_raw_text("first line"),
            obs(56800.0, "a", 0.0, 1.0).with_raw_text("second line"),
        ]);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("first line"), "{msg}");
        assert!(msg.contains("second line"), "{msg}");
    }
}
