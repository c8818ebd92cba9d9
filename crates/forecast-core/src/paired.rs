//! Named, equal-length sequences that can only be reordered together
//!
//! A forecast ensemble is usually carried around as parallel arrays: the
//! member values and the member numbers they came from. Sorting one of them
//! for export must carry the other along. [`SynchronizedSequences`] owns the
//! whole set and only accepts permutations of a member's current values; the
//! permutation is derived by value matching and replayed on every member.

use std::collections::{BTreeMap, VecDeque};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// One member of a synchronized set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Sequence {
    /// Real-valued data such as forecast values
    Real(Vec<f64>),
    /// Integer data such as ensemble member numbers or years
    Integer(Vec<i64>),
    /// Text labels
    Label(Vec<String>),
}

impl Sequence {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Label(v) => v.len(),
        }
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Real(_) => "real",
            Self::Integer(_) => "integer",
            Self::Label(_) => "label",
        }
    }

    /// Copy of the sequence in ascending (or descending) order
    pub fn sorted(&self, descending: bool) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::Real(v) => v.sort_by(f64::total_cmp),
            Self::Integer(v) => v.sort_unstable(),
            Self::Label(v) => v.sort(),
        }
        if descending {
            out.reverse();
        }
        out
    }

    fn reverse(&mut self) {
        match self {
            Self::Real(v) => v.reverse(),
            Self::Integer(v) => v.reverse(),
            Self::Label(v) => v.reverse(),
        }
    }

    /// Position mapping such that `requested[j] == self[mapping[j]]`
    ///
    /// Returns `InvalidPermutation` unless `requested` holds exactly the same
    /// multiset of values. Duplicates are matched to the earliest unused
    /// position, which keeps their relative order.
    pub fn permutation_to(&self, requested: &Sequence) -> Result<Vec<usize>> {
        let mapping = match (self, requested) {
            (Self::Real(current), Self::Real(new)) => {
                if current.iter().chain(new).any(|v| v.is_nan()) {
                    return Err(Error::InvalidPermutation(
                        "NaN cannot be matched to a position".to_string(),
                    ));
                }
                let current: Vec<OrderedFloat<f64>> = current.iter().copied().map(OrderedFloat).collect();
                let new: Vec<OrderedFloat<f64>> = new.iter().copied().map(OrderedFloat).collect();
                stable_mapping(&current, &new)
            }
            (Self::Integer(current), Self::Integer(new)) => stable_mapping(current, new),
            (Self::Label(current), Self::Label(new)) => stable_mapping(current, new),
            _ => {
                return Err(Error::InvalidPermutation(format!(
                    "cannot reorder {} values with {} values",
                    self.kind(),
                    requested.kind()
                )))
            }
        };

        mapping.ok_or_else(|| {
            Error::InvalidPermutation(
                "values can only be rearranged, not changed".to_string(),
            )
        })
    }

    /// Apply a position mapping produced by [`Sequence::permutation_to`]
    fn permuted(&self, mapping: &[usize]) -> Self {
        match self {
            Self::Real(v) => Self::Real(mapping.iter().map(|&i| v[i]).collect()),
            Self::Integer(v) => Self::Integer(mapping.iter().map(|&i| v[i]).collect()),
            Self::Label(v) => Self::Label(mapping.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

impl From<Vec<f64>> for Sequence {
    fn from(values: Vec<f64>) -> Self {
        Self::Real(values)
    }
}

impl From<Vec<i64>> for Sequence {
    fn from(values: Vec<i64>) -> Self {
        Self::Integer(values)
    }
}

impl From<Vec<String>> for Sequence {
    fn from(values: Vec<String>) -> Self {
        Self::Label(values)
    }
}

/// Greedy stable matching of `requested` values onto `current` positions
fn stable_mapping<K: Ord>(current: &[K], requested: &[K]) -> Option<Vec<usize>> {
    if current.len() != requested.len() {
        return None;
    }

    let mut positions: BTreeMap<&K, VecDeque<usize>> = BTreeMap::new();
    for (index, value) in current.iter().enumerate() {
        positions.entry(value).or_default().push_back(index);
    }

    requested
        .iter()
        .map(|value| positions.get_mut(value).and_then(VecDeque::pop_front))
        .collect()
}

/// A set of named sequences whose positional pairing survives reordering
///
/// # Examples
///
/// ```rust
/// use forecast_core::{Sequence, SynchronizedSequences};
///
/// let mut ensemble = SynchronizedSequences::new([
///     ("values", Sequence::Real(vec![1.5, 0.2, 3.1])),
///     ("members", Sequence::Integer(vec![7, 2, 4])),
/// ])
/// .unwrap();
///
/// ensemble.sort_by("members", false).unwrap();
/// assert_eq!(ensemble.integers("members").unwrap(), &[2, 4, 7]);
/// assert_eq!(ensemble.reals("values").unwrap(), &[0.2, 3.1, 1.5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Sequence>",
    into = "BTreeMap<String, Sequence>"
)]
pub struct SynchronizedSequences {
    members: BTreeMap<String, Sequence>,
    len: usize,
}

impl SynchronizedSequences {
    /// Create a synchronized set; every member must have the same length
    pub fn new<I, S>(members: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Sequence)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        let mut len = None;

        for (name, sequence) in members {
            let name = name.into();
            if let Sequence::Real(values) = &sequence {
                if values.iter().any(|v| v.is_nan()) {
                    return Err(Error::InvalidInput(format!(
                        "sequence \"{name}\" contains NaN"
                    )));
                }
            }
            match len {
                None => len = Some(sequence.len()),
                Some(expected) if expected != sequence.len() => {
                    return Err(Error::LengthMismatch {
                        expected,
                        actual: sequence.len(),
                    });
                }
                Some(_) => {}
            }
            if map.contains_key(&name) {
                return Err(Error::InvalidInput(format!(
                    "sequence \"{name}\" given more than once"
                )));
            }
            map.insert(name, sequence);
        }

        Ok(Self {
            members: map,
            len: len.unwrap_or(0),
        })
    }

    /// Length shared by every member
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the members are empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Member names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Look up a member
    pub fn get(&self, name: &str) -> Option<&Sequence> {
        self.members.get(name)
    }

    /// Look up a real-valued member
    pub fn reals(&self, name: &str) -> Option<&[f64]> {
        match self.members.get(name)? {
            Sequence::Real(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Look up an integer member
    pub fn integers(&self, name: &str) -> Option<&[i64]> {
        match self.members.get(name)? {
            Sequence::Integer(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Look up a label member
    pub fn labels(&self, name: &str) -> Option<&[String]> {
        match self.members.get(name)? {
            Sequence::Label(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Replace member `name` with a rearrangement of its own values
    ///
    /// The same rearrangement is applied to every other member. Either all
    /// members are updated or, on error, none are.
    pub fn reorder(&mut self, name: &str, new_order: impl Into<Sequence>) -> Result<()> {
        let new_order = new_order.into();
        let current = self.members.get(name).ok_or_else(|| {
            Error::InvalidArgument(format!("no sequence named \"{name}\""))
        })?;

        let mapping = current.permutation_to(&new_order)?;
        debug!(member = name, ?mapping, "reordering synchronized sequences");

        let reordered: BTreeMap<String, Sequence> = self
            .members
            .iter()
            .map(|(key, sequence)| (key.clone(), sequence.permuted(&mapping)))
            .collect();
        self.members = reordered;
        Ok(())
    }

    /// Sort every member by the values of member `name`
    pub fn sort_by(&mut self, name: &str, descending: bool) -> Result<()> {
        let order = self
            .members
            .get(name)
            .ok_or_else(|| Error::InvalidArgument(format!("no sequence named \"{name}\"")))?
            .sorted(descending);
        self.reorder(name, order)
    }

    /// Consume the set, returning the members
    pub fn into_inner(self) -> BTreeMap<String, Sequence> {
        self.members
    }
}

impl TryFrom<BTreeMap<String, Sequence>> for SynchronizedSequences {
    type Error = Error;

    fn try_from(members: BTreeMap<String, Sequence>) -> Result<Self> {
        Self::new(members)
    }
}

impl From<SynchronizedSequences> for BTreeMap<String, Sequence> {
    fn from(set: SynchronizedSequences) -> Self {
        set.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensemble() -> SynchronizedSequences {
        SynchronizedSequences::new([
            ("values", Sequence::Real(vec![2.5, 1.0, 2.5, 0.5])),
            ("members", Sequence::Integer(vec![11, 12, 13, 14])),
            (
                "labels",
                Sequence::Label(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let err = SynchronizedSequences::new([
            ("values", Sequence::Real(vec![1.0, 2.0])),
            ("members", Sequence::Integer(vec![1, 2, 3])),
        ])
        .unwrap_err();
        assert_eq!(err, Error::LengthMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = SynchronizedSequences::new([
            ("values", Sequence::Real(vec![1.0])),
            ("values", Sequence::Real(vec![2.0])),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_reorder_propagates_to_siblings() {
        let mut set = ensemble();
        set.reorder("members", vec![14i64, 11, 13, 12]).unwrap();

        assert_eq!(set.integers("members").unwrap(), &[14, 11, 13, 12]);
        assert_eq!(set.reals("values").unwrap(), &[0.5, 2.5, 2.5, 1.0]);
        assert_eq!(set.labels("labels").unwrap(), &["d", "a", "c", "b"]);
    }

    #[test]
    fn test_duplicates_keep_relative_order() {
        let mut set = ensemble();
        set.reorder("values", vec![0.5, 1.0, 2.5, 2.5]).unwrap();
        // The first 2.5 (member 11) stays ahead of the second (member 13)
        assert_eq!(set.integers("members").unwrap(), &[14, 12, 11, 13]);
    }

    #[test]
    fn test_changed_values_rejected_atomically() {
        let mut set = ensemble();
        let before = set.clone();

        let err = set.reorder("values", vec![0.5, 1.0, 2.5, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidPermutation(_)));
        assert_eq!(set, before);

        let err = set.reorder("values", vec![0.5, 1.0, 2.5]).unwrap_err();
        assert!(matches!(err, Error::InvalidPermutation(_)));

        let err = set.reorder("values", vec![1i64, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidPermutation(_)));
        assert_eq!(set, before);
    }

    #[test]
    fn test_unknown_member() {
        let mut set = ensemble();
        assert!(matches!(
            set.reorder("missing", vec![1.0]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sort_descending() {
        let mut set = ensemble();
        set.sort_by("values", true).unwrap();
        assert_eq!(set.reals("values").unwrap(), &[2.5, 2.5, 1.0, 0.5]);
        assert_eq!(set.integers("members").unwrap(), &[11, 13, 12, 14]);
    }

    #[test]
    fn test_nan_rejected() {
        let err = SynchronizedSequences::new([
            ("values", Sequence::Real(vec![1.0, f64::NAN])),
            ("members", Sequence::Integer(vec![1, 2])),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let mut set = ensemble();
        let before = set.clone();
        let err = set
            .reorder("values", vec![0.5, 1.0, 2.5, f64::NAN])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPermutation(_)));
        assert_eq!(set, before);

        let nan = Sequence::Real(vec![f64::NAN, 1.0]);
        assert!(matches!(
            nan.permutation_to(&Sequence::Real(vec![1.0, f64::NAN])),
            Err(Error::InvalidPermutation(_))
        ));
    }

    #[test]
    fn test_deserialize_checks_lengths() {
        let json = r#"{
            "a": {"kind": "real", "values": [3.0, 1.0, 2.0]},
            "b": {"kind": "integer", "values": [7]}
        }"#;
        let err = serde_json::from_str::<SynchronizedSequences>(json).unwrap_err();
        assert!(err.to_string().contains("Length mismatch"), "{err}");

        let json = r#"{
            "a": {"kind": "real", "values": [3.0, 1.0, 2.0]},
            "b": {"kind": "integer", "values": [7, 8, 9]}
        }"#;
        let mut set: SynchronizedSequences = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 3);
        set.sort_by("a", false).unwrap();
        assert_eq!(set.integers("b").unwrap(), &[8, 9, 7]);

        let text = serde_json::to_string(&set).unwrap();
        let back: SynchronizedSequences = serde_json::from_str(&text).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_empty_set() {
        let set = SynchronizedSequences::new(Vec::<(String, Sequence)>::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.names().count(), 0);
    }
}
