use crate::stepfuns::Stepfun;
use crate::timestamps::Timestamp;
use crate::tv_lists::{TVList, TVPair};
use num_traits::Zero;
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

/// A left-closed, right-open interval of keys
///    [lower, upper)
/// where a None bound means the interval is unbounded on that side.
/// An interval whose bounds are not ordered (lower >= upper) is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    pub lower: Option<T>,
    pub upper: Option<T>,
}

impl<T> Interval<T> {
    #[must_use]
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Interval { lower, upper }
    }

    /// Left-closed, Right-open interval
    ///    [lower, upper)
    #[must_use]
    pub fn lcro(lower: T, upper: T) -> Self {
        Interval {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// The interval that contains all keys
    ///    (-infinity, +infinity)
    #[must_use]
    pub fn unbounded() -> Self {
        Interval {
            lower: None,
            upper: None,
        }
    }

    /// All keys greater or equal to lower
    ///    [lower, +infinity)
    #[must_use]
    pub fn from_lower(lower: T) -> Self {
        Interval {
            lower: Some(lower),
            upper: None,
        }
    }

    /// All keys strictly less than upper
    ///    (-infinity, upper)
    #[must_use]
    pub fn until(upper: T) -> Self {
        Interval {
            lower: None,
            upper: Some(upper),
        }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// True if the interval contains no key.  Bounds that cannot be
    /// compared (NaN) also give an empty interval.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => {
                lower.partial_cmp(upper) != Some(Ordering::Less)
            }
            (None, _) | (_, None) => false,
        }
    }

    /// Whether the key is contained in the interval
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.lower.as_ref().map_or(true, |lower| lower <= x)
            && self.upper.as_ref().map_or(true, |upper| x < upper)
    }
}

/// A set of keys, as the union of disjoint intervals.
///
/// This is stored as a boolean step function, which is true for the keys
/// in the set.  The function is defined everywhere, so it doubles as the
/// characteristic function of the set, and all set operations are merges
/// of the boolean functions.  As a result, the intervals are always sorted,
/// disjoint and never touch each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntervalSet<T> {
    fun: Stepfun<T, bool>,
}

impl<T> IntervalSet<T> {
    /// The set with no keys
    #[must_use]
    pub fn empty() -> Self {
        IntervalSet {
            fun: Stepfun::constant(false),
        }
    }

    /// The set of all keys
    #[must_use]
    pub fn everything() -> Self {
        IntervalSet {
            fun: Stepfun::constant(true),
        }
    }

    /// The characteristic function of the set
    #[must_use]
    pub fn as_stepfun(&self) -> &Stepfun<T, bool> {
        &self.fun
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fun.len() == 1 && self.fun.tv_list().first_value() == Some(&false)
    }

    #[must_use]
    pub fn is_everything(&self) -> bool {
        self.fun.len() == 1 && self.fun.tv_list().first_value() == Some(&true)
    }
}

impl<T: PartialOrd> IntervalSet<T> {
    /// Whether the key belongs to one of the intervals
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.fun.value_at(x) == Some(&true)
    }
}

impl<T: PartialOrd + Clone> IntervalSet<T> {
    /// The union of the intervals.  Empty intervals are ignored, and the
    /// others can overlap or be given in any order.
    #[must_use]
    pub fn new(intervals: impl IntoIterator<Item = Interval<T>>) -> Self {
        let fragments: Vec<Stepfun<T, bool>> = intervals
            .into_iter()
            .filter(|intv| !intv.is_empty())
            .map(|intv| {
                let mut pairs: Vec<TVPair<T, bool>> =
                    vec![(Timestamp::NegInfinity, Some(intv.lower.is_none()))];
                if let Some(lower) = intv.lower {
                    pairs.push((Timestamp::At(lower), Some(true)));
                }
                if let Some(upper) = intv.upper {
                    pairs.push((Timestamp::At(upper), Some(false)));
                }
                Stepfun::from(TVList::from_ascending(pairs))
            })
            .collect();
        log::trace!("building interval set from {} intervals", fragments.len());
        Self::from_stepfun(&Stepfun::merge_all(|a, b| a | b, &fragments))
    }

    /// The set of keys where f is true.  Keys where f is undefined are not
    /// part of the set.
    #[must_use]
    pub fn from_stepfun(f: &Stepfun<T, bool>) -> Self {
        IntervalSet {
            fun: f.replace_undefined_with_constant(false),
        }
    }

    /// The sorted list of disjoint intervals in the set
    #[must_use]
    pub fn to_intervals(&self) -> Vec<Interval<T>> {
        let mut result = Vec::new();
        let mut inside: Option<Option<T>> = None;
        for (t, v) in self.fun.iter() {
            if *v == Some(true) {
                inside = Some(t.value().cloned());
            } else if let Some(lower) = inside.take() {
                result.push(Interval::new(lower, t.value().cloned()));
            }
        }
        if let Some(lower) = inside {
            result.push(Interval::new(lower, None));
        }
        result
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        IntervalSet {
            fun: &self.fun | &other.fun,
        }
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        IntervalSet {
            fun: &self.fun & &other.fun,
        }
    }

    /// All keys not in self
    #[must_use]
    pub fn complement(&self) -> Self {
        IntervalSet { fun: !&self.fun }
    }

    /// Keys in self but not in other
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.intersection(&other.complement())
    }

    /// Keys in exactly one of the two sets
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        IntervalSet {
            fun: self.fun.merge(|a, b| a ^ b, &[&other.fun]),
        }
    }

    /// Whether all keys of self are also in other
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.difference(other).is_empty()
    }

    #[must_use]
    pub fn is_strict_subset(&self, other: &Self) -> bool {
        self != other && self.is_subset(other)
    }

    /// Whether all keys of the interval are in self.  This is always true
    /// for an empty interval.
    #[must_use]
    pub fn contains_interval(&self, interval: &Interval<T>) -> bool {
        interval.is_empty()
            || IntervalSet::from(interval.clone()).is_subset(self)
    }

    /// Total length of the intervals, or None if the set is unbounded
    #[must_use]
    pub fn measure<L>(&self) -> Option<L>
    where
        T: Sub<Output = L>,
        L: Zero,
    {
        self.to_intervals()
            .into_iter()
            .try_fold(L::zero(), |total, intv| match (intv.lower, intv.upper) {
                (Some(lower), Some(upper)) => Some(total + (upper - lower)),
                (None, _) | (_, None) => None,
            })
    }
}

impl<T: PartialOrd + Clone> From<Interval<T>> for IntervalSet<T> {
    fn from(value: Interval<T>) -> Self {
        IntervalSet::new([value])
    }
}

impl<T: PartialOrd + Clone> FromIterator<Interval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        IntervalSet::new(iter)
    }
}

impl<'a, T: PartialOrd + Clone> BitOr<&'a IntervalSet<T>> for &'a IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn bitor(self, rhs: &'a IntervalSet<T>) -> Self::Output {
        self.union(rhs)
    }
}

impl<T: PartialOrd + Clone> BitOr for IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn bitor(self, rhs: IntervalSet<T>) -> Self::Output {
        self.union(&rhs)
    }
}

impl<'a, T: PartialOrd + Clone> BitAnd<&'a IntervalSet<T>>
    for &'a IntervalSet<T>
{
    type Output = IntervalSet<T>;

    fn bitand(self, rhs: &'a IntervalSet<T>) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<T: PartialOrd + Clone> BitAnd for IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn bitand(self, rhs: IntervalSet<T>) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl<'a, T: PartialOrd + Clone> Sub<&'a IntervalSet<T>> for &'a IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn sub(self, rhs: &'a IntervalSet<T>) -> Self::Output {
        self.difference(rhs)
    }
}

impl<T: PartialOrd + Clone> Sub for IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn sub(self, rhs: IntervalSet<T>) -> Self::Output {
        self.difference(&rhs)
    }
}

impl<'a, T: PartialOrd + Clone> BitXor<&'a IntervalSet<T>>
    for &'a IntervalSet<T>
{
    type Output = IntervalSet<T>;

    fn bitxor(self, rhs: &'a IntervalSet<T>) -> Self::Output {
        self.symmetric_difference(rhs)
    }
}

impl<T: PartialOrd + Clone> BitXor for IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn bitxor(self, rhs: IntervalSet<T>) -> Self::Output {
        self.symmetric_difference(&rhs)
    }
}

impl<T: PartialOrd + Clone> Not for &IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl<T: PartialOrd + Clone> Not for IntervalSet<T> {
    type Output = IntervalSet<T>;

    fn not(self) -> Self::Output {
        self.complement()
    }
}
