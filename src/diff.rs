//! Classification of the live snapshot against the baseline.
//!
//! A pure set computation: every filename present in either the baseline or
//! the snapshot lands in exactly one bucket. Files that were present but
//! unreadable at scan time get their own bucket instead of being silently
//! dropped or guessed as modified.

use crate::baseline::Baseline;
use crate::scan::Snapshot;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// In baseline and on disk, digests match.
    pub verified: Vec<String>,
    /// In baseline and on disk, digests differ.
    pub modified: Vec<String>,
    /// In baseline only.
    pub deleted: Vec<String>,
    /// On disk only.
    pub unknown: Vec<String>,
    /// In baseline and on disk, but no live digest could be obtained.
    pub unreadable: Vec<String>,
}

impl Classification {
    /// Number of files that count as anomalies for reporting purposes.
    /// Unreadable files are surfaced through the log, not counted here.
    pub fn anomaly_count(&self) -> usize {
        self.modified.len() + self.deleted.len() + self.unknown.len()
    }
}

/// Computes the classification of `snapshot` against `baseline`.
///
/// Intersection of the filename sets splits into verified/modified on digest
/// equality (or unreadable when no live digest exists), baseline-minus-live
/// is deleted, live-minus-baseline is unknown. The vectors come out sorted
/// because both inputs are ordered maps, but nothing relies on that.
pub fn classify(baseline: &Baseline, snapshot: &Snapshot) -> Classification {
    let mut result = Classification::default();

    for (name, digest) in &snapshot.files {
        match (baseline.files.get(name), digest) {
            (Some(expected), Some(actual)) if expected == actual => {
                result.verified.push(name.clone())
            }
            (Some(_), Some(_)) => result.modified.push(name.clone()),
            (Some(_), None) => result.unreadable.push(name.clone()),
            (None, _) => result.unknown.push(name.clone()),
        }
    }

    for name in baseline.files.keys() {
        if !snapshot.files.contains_key(name) {
            result.deleted.push(name.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn baseline_of(entries: &[(&str, &str)]) -> Baseline {
        let files = entries
            .iter()
            .map(|(name, digest)| (name.to_string(), digest.to_string()))
            .collect::<BTreeMap<_, _>>();
        Baseline::new(files)
    }

    fn snapshot_of(entries: &[(&str, Option<&str>)]) -> Snapshot {
        let files = entries
            .iter()
            .map(|(name, digest)| (name.to_string(), digest.map(str::to_string)))
            .collect::<BTreeMap<_, _>>();
        Snapshot { files }
    }

    fn assert_partition(
        baseline: &Baseline,
        snapshot: &Snapshot,
        classification: &Classification,
    ) {
        let mut all_names: Vec<&String> = baseline.files.keys().collect();
        all_names.extend(snapshot.files.keys());
        all_names.sort();
        all_names.dedup();

        let mut classified: Vec<&String> = Vec::new();
        classified.extend(&classification.verified);
        classified.extend(&classification.modified);
        classified.extend(&classification.deleted);
        classified.extend(&classification.unknown);
        classified.extend(&classification.unreadable);
        classified.sort();

        let before_dedup = classified.len();
        classified.dedup();
        assert_eq!(before_dedup, classified.len(), "buckets overlap");
        assert_eq!(all_names, classified, "buckets do not cover all names");
    }

    #[test]
    fn test_all_verified() {
        let baseline = baseline_of(&[("a.txt", "h1"), ("b.txt", "h2")]);
        let snapshot = snapshot_of(&[("a.txt", Some("h1")), ("b.txt", Some("h2"))]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.verified, vec!["a.txt", "b.txt"]);
        assert!(result.modified.is_empty());
        assert!(result.deleted.is_empty());
        assert!(result.unknown.is_empty());
        assert!(result.unreadable.is_empty());
        assert_eq!(result.anomaly_count(), 0);
        assert_partition(&baseline, &snapshot, &result);
    }

    /// The canonical scenario: a.txt unchanged, b.txt content changed,
    /// c.txt newly appeared.
    #[test]
    fn test_modified_and_new() {
        let baseline = baseline_of(&[("a.txt", "h_a"), ("b.txt", "h_b")]);
        let snapshot = snapshot_of(&[
            ("a.txt", Some("h_a")),
            ("b.txt", Some("h_b_changed")),
            ("c.txt", Some("h_c")),
        ]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.verified, vec!["a.txt"]);
        assert_eq!(result.modified, vec!["b.txt"]);
        assert!(result.deleted.is_empty());
        assert_eq!(result.unknown, vec!["c.txt"]);
        assert_eq!(result.anomaly_count(), 2);
        assert_partition(&baseline, &snapshot, &result);
    }

    #[test]
    fn test_all_deleted() {
        let baseline = baseline_of(&[("a.txt", "h1"), ("b.txt", "h2"), ("c.txt", "h3")]);
        let snapshot = snapshot_of(&[]);

        let result = classify(&baseline, &snapshot);

        assert!(result.verified.is_empty());
        assert!(result.modified.is_empty());
        assert_eq!(result.deleted, vec!["a.txt", "b.txt", "c.txt"]);
        assert!(result.unknown.is_empty());
        assert_eq!(result.anomaly_count(), 3);
        assert_partition(&baseline, &snapshot, &result);
    }

    #[test]
    fn test_empty_baseline_all_unknown() {
        let baseline = baseline_of(&[]);
        let snapshot = snapshot_of(&[("a.txt", Some("h1")), ("b.txt", Some("h2"))]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.unknown, vec!["a.txt", "b.txt"]);
        assert_eq!(result.anomaly_count(), 2);
        assert_partition(&baseline, &snapshot, &result);
    }

    #[test]
    fn test_empty_both() {
        let baseline = baseline_of(&[]);
        let snapshot = snapshot_of(&[]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result, Classification::default());
    }

    /// A baselined file whose live digest could not be computed is neither
    /// verified nor modified.
    #[test]
    fn test_unreadable_baselined_file() {
        let baseline = baseline_of(&[("a.txt", "h1"), ("locked.txt", "h2")]);
        let snapshot = snapshot_of(&[("a.txt", Some("h1")), ("locked.txt", None)]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.verified, vec!["a.txt"]);
        assert!(result.modified.is_empty());
        assert_eq!(result.unreadable, vec!["locked.txt"]);
        assert_eq!(result.anomaly_count(), 0);
        assert_partition(&baseline, &snapshot, &result);
    }

    /// A new file counts as unknown whether or not it could be hashed;
    /// its presence alone is the anomaly.
    #[test]
    fn test_unreadable_new_file_is_unknown() {
        let baseline = baseline_of(&[]);
        let snapshot = snapshot_of(&[("dropped.bin", None)]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.unknown, vec!["dropped.bin"]);
        assert!(result.unreadable.is_empty());
        assert_partition(&baseline, &snapshot, &result);
    }

    #[test]
    fn test_mixed_everything() {
        let baseline = baseline_of(&[
            ("same.txt", "h1"),
            ("changed.txt", "h2"),
            ("gone.txt", "h3"),
            ("locked.txt", "h4"),
        ]);
        let snapshot = snapshot_of(&[
            ("same.txt", Some("h1")),
            ("changed.txt", Some("other")),
            ("locked.txt", None),
            ("fresh.txt", Some("h5")),
        ]);

        let result = classify(&baseline, &snapshot);

        assert_eq!(result.verified, vec!["same.txt"]);
        assert_eq!(result.modified, vec!["changed.txt"]);
        assert_eq!(result.deleted, vec!["gone.txt"]);
        assert_eq!(result.unknown, vec!["fresh.txt"]);
        assert_eq!(result.unreadable, vec!["locked.txt"]);
        assert_eq!(result.anomaly_count(), 3);
        assert_partition(&baseline, &snapshot, &result);
    }
}
