use crate::errors::{Error, Result};
use crate::timestamps::Timestamp;
use itertools::Itertools;
use std::cmp::Ordering;

/// One step of a step function: from the timestamp on (and until the next
/// pair), the function has the given value.  A None value means the
/// function is undefined there.
pub type TVPair<T, V> = (Timestamp<T>, Option<V>);

/// The normalized (timestamp, value) representation of a step function.
///
/// We have the invariants:
///    * the list is never empty, and its first timestamp is the sentinel
///      `Timestamp::NegInfinity`
///    * the following timestamps are strictly ascending
///    * two consecutive pairs never have the same value
///
/// Once built, a list is never modified: all operations create new lists.
/// Two lists describe the same function if and only if they are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TVList<T, V> {
    pairs: Vec<TVPair<T, V>>,
}

impl<T: PartialOrd, V: PartialEq> TVList<T, V> {
    /// Validate the pairs and normalize them.
    pub fn new(pairs: impl IntoIterator<Item = TVPair<T, V>>) -> Result<Self> {
        let pairs: Vec<TVPair<T, V>> = pairs.into_iter().collect();
        check_ascending(&pairs)?;
        Ok(Self::from_ascending(pairs))
    }

    /// Build from pairs that are already known to start with the sentinel
    /// and to be strictly ascending.  Only the values are normalized.
    pub(crate) fn from_ascending(
        pairs: impl IntoIterator<Item = TVPair<T, V>>,
    ) -> Self {
        let pairs = normalize(pairs);
        debug_assert!(check_ascending(&pairs).is_ok());
        TVList { pairs }
    }
}

impl<T, V> TVList<T, V> {
    /// The function that has the same value everywhere
    #[must_use]
    pub fn constant(value: Option<V>) -> Self {
        TVList {
            pairs: vec![(Timestamp::NegInfinity, value)],
        }
    }

    /// Number of steps, including the one at -infinity
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Never true, a timeline always has its sentinel entry.  Provided for
    /// consistency with `len()`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TVPair<T, V>> {
        self.pairs.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TVPair<T, V>] {
        &self.pairs
    }

    /// The value on (-infinity, first breakpoint)
    #[must_use]
    pub fn first_value(&self) -> Option<&V> {
        self.pairs.first().and_then(|(_, v)| v.as_ref())
    }

    #[must_use]
    pub fn timestamps(&self) -> impl Iterator<Item = &Timestamp<T>> {
        self.pairs.iter().map(|(t, _)| t)
    }

    #[must_use]
    pub fn values(&self) -> impl Iterator<Item = Option<&V>> {
        self.pairs.iter().map(|(_, v)| v.as_ref())
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<TVPair<T, V>> {
        self.pairs
    }
}

impl<T, V> IntoIterator for TVList<T, V> {
    type Item = TVPair<T, V>;
    type IntoIter = std::vec::IntoIter<TVPair<T, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, T, V> IntoIterator for &'a TVList<T, V> {
    type Item = &'a TVPair<T, V>;
    type IntoIter = std::slice::Iter<'a, TVPair<T, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Check that the list starts with the sentinel, and that timestamps are
/// strictly ascending afterwards.  Equal timestamps are an error, we never
/// try to guess which of the two values the caller meant.
fn check_ascending<T: PartialOrd, V>(pairs: &[TVPair<T, V>]) -> Result<()> {
    match pairs.first() {
        None => return Err(Error::EmptyTimeline),
        Some((Timestamp::At(_), _)) => {
            return Err(Error::MalformedTimeline(
                "the first timestamp must be -oo".into(),
            ))
        }
        Some((Timestamp::NegInfinity, _)) => {}
    }

    for (idx, ((prev, _), (next, _))) in
        pairs.iter().tuple_windows().enumerate()
    {
        if next.is_neg_infinity() {
            return Err(Error::MalformedTimeline(format!(
                "-oo can only be the first timestamp (found at index {})",
                idx + 1
            )));
        }
        if !matches!(prev.partial_cmp(next), Some(Ordering::Less)) {
            return Err(Error::MalformedTimeline(format!(
                "timestamps are not strictly ascending at index {}",
                idx + 1
            )));
        }
    }
    Ok(())
}

/// Remove every pair whose value is the same as the previous retained
/// value.  The first pair is always kept.  Timestamps are not checked.
#[must_use]
pub fn normalize<T, V: PartialEq>(
    pairs: impl IntoIterator<Item = TVPair<T, V>>,
) -> Vec<TVPair<T, V>> {
    let mut result: Vec<TVPair<T, V>> = Vec::new();
    for (t, v) in pairs {
        match result.last() {
            Some((_, last)) if *last == v => {}
            Some(_) | None => result.push((t, v)),
        }
    }
    result
}
