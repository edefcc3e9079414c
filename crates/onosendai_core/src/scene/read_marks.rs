//! Session read marks.
//!
//! # Responsibility
//! - Remember the fingerprint of every event the user selected.
//! - Answer "have I read something like this" by fingerprint distance.
//!
//! # Invariants
//! - Marks live for the controller lifetime and survive a cache clear.
//! - Fingerprints are stored exactly as received.

use std::collections::HashMap;

/// Event id to content fingerprint, recorded on selection.
#[derive(Debug, Default)]
pub struct ReadMarks {
    marks: HashMap<String, String>,
}

impl ReadMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event_id: impl Into<String>, fingerprint: impl Into<String>) {
        self.marks.insert(event_id.into(), fingerprint.into());
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.marks.contains_key(event_id)
    }

    pub fn fingerprint(&self, event_id: &str) -> Option<&str> {
        self.marks.get(event_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Closest read event within `max_distance` bits of `fingerprint`.
    ///
    /// Returns `(event_id, distance)`. Marks with an empty or non-hex
    /// fingerprint never match. Ties resolve to the smallest event id.
    pub fn seen_similar(&self, fingerprint: &str, max_distance: u32) -> Option<(&str, u32)> {
        self.marks
            .iter()
            .filter_map(|(event_id, mark)| {
                fingerprint_distance(fingerprint, mark).map(|distance| (event_id.as_str(), distance))
            })
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|left, right| left.1.cmp(&right.1).then_with(|| left.0.cmp(right.0)))
    }
}

/// Bitwise Hamming distance between two hex fingerprints.
///
/// The shorter input is left-padded with zeros. Returns `None` when either
/// side is empty or contains a non-hex digit.
pub fn fingerprint_distance(left: &str, right: &str) -> Option<u32> {
    let left = hex_digits(left)?;
    let right = hex_digits(right)?;
    let width = left.len().max(right.len());

    let padded = |digits: &[u32]| -> Vec<u32> {
        let mut out = vec![0; width - digits.len()];
        out.extend_from_slice(digits);
        out
    };
    let (left, right) = (padded(&left), padded(&right));

    Some(
        left.iter()
            .zip(right.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum(),
    )
}

fn hex_digits(value: &str) -> Option<Vec<u32>> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    digits.chars().map(|ch| ch.to_digit(16)).collect()
}

#[cfg(test)]
mod tests {
    use super::{fingerprint_distance, ReadMarks};

    #[test]
    fn distance_counts_differing_bits() {
        assert_eq!(fingerprint_distance("ff", "ff"), Some(0));
        assert_eq!(fingerprint_distance("f0", "ff"), Some(4));
        assert_eq!(fingerprint_distance("0x1", "0003"), Some(1));
        assert_eq!(fingerprint_distance("", "ff"), None);
        assert_eq!(fingerprint_distance("fg", "ff"), None);
    }

    #[test]
    fn seen_similar_returns_closest_mark_within_limit() {
        let mut marks = ReadMarks::new();
        marks.record("far", "00");
        marks.record("near", "fe");
        marks.record("blank", "");

        assert_eq!(marks.seen_similar("ff", 2), Some(("near", 1)));
        assert_eq!(marks.seen_similar("ff", 0), None);
        assert_eq!(marks.len(), 3);
    }

    #[test]
    fn record_overwrites_previous_fingerprint() {
        let mut marks = ReadMarks::new();
        marks.record("e1", "aa");
        marks.record("e1", "bb");
        assert_eq!(marks.fingerprint("e1"), Some("bb"));
        assert!(marks.contains("e1"));
        assert!(!marks.contains("e2"));
    }
}
