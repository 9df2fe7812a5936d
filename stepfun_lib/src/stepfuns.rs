//! Step functions are stepwise constant.
//!
//! A step function f is given by a list of (time, value) pairs, where the
//! first time is -infinity and the following ones are strictly ascending.
//! Step functions are right-continuous, that is
//!     f(x) = value[i] with time[i] <= x < time[i+1]
//! and they are constant from the last timestamp until +infinity.
//! Intervals where the function is undefined have a None value.
//!
//! For instance
//!     [(-oo, undef), (0, 100), (10, 200), (20, undef)]
//! is undefined on (-oo, 0), 100 on [0, 10), 200 on [10, 20) and undefined
//! again on [20, +oo).
//!
//! Arithmetic and boolean operators are weak: undefined operands are
//! ignored, so `undef + 7 == 7 + undef == 7` while `undef + undef == undef`.
//! It always holds that `(f + g)(x) == f(x) + g(x)` (weakly).
//!
//! Comparisons are strict: `f.le(&g)` is false as soon as the difference is
//! undefined somewhere.

use crate::errors::{Error, Result};
use crate::merge::merge_op;
use crate::timestamps::Timestamp;
use crate::tv_lists::{TVList, TVPair};
use crate::weak_ops::{prefer_left, weak_map};
use bisection::bisect_right_by;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Sub};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stepfun<T, V> {
    tv: TVList<T, V>,
}

impl<T, V> Stepfun<T, V> {
    /// The function with the same value everywhere
    #[must_use]
    pub fn constant(value: V) -> Self {
        Stepfun {
            tv: TVList::constant(Some(value)),
        }
    }

    /// The function that is nowhere defined
    #[must_use]
    pub fn undefined() -> Self {
        Stepfun {
            tv: TVList::constant(None),
        }
    }

    #[must_use]
    pub fn tv_list(&self) -> &TVList<T, V> {
        &self.tv
    }

    #[must_use]
    pub fn into_tv_list(self) -> TVList<T, V> {
        self.tv
    }

    /// Number of steps, including the one starting at -infinity
    #[must_use]
    pub fn len(&self) -> usize {
        self.tv.len()
    }

    /// Always false, see [`TVList::is_empty`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tv.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TVPair<T, V>> {
        self.tv.iter()
    }

    /// The timestamps at which the value changes
    #[must_use]
    pub fn breakpoints(&self) -> impl Iterator<Item = &T> {
        self.tv.timestamps().filter_map(Timestamp::value)
    }

    /// True if the function is undefined everywhere
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.tv.values().all(|v| v.is_none())
    }
}

impl<T: PartialOrd, V: PartialEq> Stepfun<T, V> {
    /// Create a step function from (timestamp, value) pairs.  The first
    /// timestamp must be -infinity and the others strictly ascending.
    pub fn new(pairs: impl IntoIterator<Item = TVPair<T, V>>) -> Result<Self> {
        Ok(Stepfun {
            tv: TVList::new(pairs)?,
        })
    }
}

impl<T, V> From<TVList<T, V>> for Stepfun<T, V> {
    fn from(tv: TVList<T, V>) -> Self {
        Stepfun { tv }
    }
}

//--------------------------------------------------------------
// Evaluation
//--------------------------------------------------------------

impl<T: PartialOrd, V> Stepfun<T, V> {
    /// Index of the step that contains x.  The sentinel is never greater
    /// than x, so this is at least 1.
    /// `bisect_right_by` moves left when the closure returns `Less`, so we
    /// compare x to the breakpoint (not the other way around).
    fn position(&self, x: Timestamp<&T>) -> usize {
        bisect_right_by(self.tv.as_slice(), |(t, _)| {
            x.partial_cmp(&t.as_ref()).unwrap_or(Ordering::Less)
        })
    }

    /// The value of the function at x.  Evaluating at -infinity returns
    /// the leftmost value.
    #[must_use]
    pub fn evaluate(&self, x: &Timestamp<T>) -> Option<&V> {
        self.value_at_position(self.position(x.as_ref()))
    }

    /// The value of the function at x
    #[must_use]
    pub fn value_at(&self, x: &T) -> Option<&V> {
        self.value_at_position(self.position(Timestamp::At(x)))
    }

    fn value_at_position(&self, pos: usize) -> Option<&V> {
        self.tv
            .as_slice()
            .get(pos.saturating_sub(1))
            .and_then(|(_, v)| v.as_ref())
    }
}

//--------------------------------------------------------------
// Merging
//--------------------------------------------------------------

impl<T: PartialOrd + Clone, V: PartialEq + Clone> Stepfun<T, V> {
    /// Merge others into self with the weak version of op.
    /// The result's timestamps are the union of all timestamps, and its
    /// value is the stepwise reduction by op (e.g. sum, max,...)
    #[must_use]
    pub fn merge<F>(&self, op: F, others: &[&Self]) -> Self
    where
        F: Fn(V, V) -> V,
    {
        let lists: Vec<&TVList<T, V>> = std::iter::once(&self.tv)
            .chain(others.iter().map(|f| &f.tv))
            .collect();
        Stepfun {
            tv: merge_op(op, &lists),
        }
    }

    /// Merge any number of functions.  Without functions, this is the
    /// function that is nowhere defined.
    #[must_use]
    pub fn merge_all<'a, F>(op: F, funs: impl IntoIterator<Item = &'a Self>) -> Self
    where
        F: Fn(V, V) -> V,
        T: 'a,
        V: 'a,
    {
        let lists: Vec<&TVList<T, V>> =
            funs.into_iter().map(|f| &f.tv).collect();
        Stepfun {
            tv: merge_op(op, &lists),
        }
    }

    /// Apply f to every defined value.  Undefined stays undefined.
    #[must_use]
    pub fn map_values<W, F>(&self, f: F) -> Stepfun<T, W>
    where
        W: PartialEq,
        F: Fn(V) -> W,
    {
        let weak_f = weak_map(f);
        Stepfun {
            tv: TVList::from_ascending(
                self.tv.iter().map(|(t, v)| (t.clone(), weak_f(v.clone()))),
            ),
        }
    }

    /// Replace all undefined parts of self with the value of other.
    #[must_use]
    pub fn replace_undefined_with(&self, other: &Self) -> Self {
        self.merge(prefer_left, &[other])
    }

    /// Replace all undefined parts of self with a constant
    #[must_use]
    pub fn replace_undefined_with_constant(&self, value: V) -> Self {
        self.replace_undefined_with(&Stepfun::constant(value))
    }

    /// A copy of self (the unary `+`)
    #[must_use]
    pub fn pos(&self) -> Self {
        self.clone()
    }

    /// Sample self at the given, strictly ascending, timestamps.  The value
    /// on (-infinity, first timestamp) is the leftmost value of self.
    /// The result is equal to self when ts contains all breakpoints of self,
    /// otherwise it only has steps on the grid given by ts.
    pub fn relocate(&self, ts: impl IntoIterator<Item = T>) -> Result<Self> {
        let pairs = std::iter::once((
            Timestamp::NegInfinity,
            self.tv.first_value().cloned(),
        ))
        .chain(ts.into_iter().map(|t| {
            let v = self.value_at(&t).cloned();
            (Timestamp::At(t), v)
        }));
        Stepfun::new(pairs)
    }

    /// Build a step function by sampling f at start, start + step,... and
    /// finally at stop.  Each sample holds until the next one, and the value
    /// at stop holds on [stop, +infinity).  The result is undefined before
    /// start, and nowhere defined when stop < start.
    pub fn scan<F, S>(f: F, start: T, stop: T, step: S) -> Result<Self>
    where
        F: Fn(&T) -> V,
        S: Clone,
        T: Add<S, Output = T>,
    {
        if start.clone() + step.clone() <= start {
            return Err(Error::MalformedTimeline(
                "the scan step must be positive".into(),
            ));
        }

        let mut pairs: Vec<TVPair<T, V>> = vec![(Timestamp::NegInfinity, None)];
        if stop >= start {
            let mut current = start;
            while current < stop {
                let value = f(&current);
                let next = current.clone() + step.clone();
                pairs.push((Timestamp::At(current), Some(value)));
                current = next;
            }
            let value = f(&stop);
            pairs.push((Timestamp::At(stop), Some(value)));
        }
        Stepfun::new(pairs)
    }
}

impl<T, V> Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialOrd + Clone,
{
    /// Pointwise minimum, ignoring undefined values
    #[must_use]
    pub fn min(&self, other: &Self) -> Self {
        self.merge(|a, b| if b < a { b } else { a }, &[other])
    }

    /// Pointwise maximum, ignoring undefined values
    #[must_use]
    pub fn max(&self, other: &Self) -> Self {
        self.merge(|a, b| if b > a { b } else { a }, &[other])
    }
}

//--------------------------------------------------------------
// Predicates and comparisons
//--------------------------------------------------------------

impl<T, V: PartialOrd + Zero> Stepfun<T, V> {
    fn all_values(&self, pred: impl Fn(Option<&V>) -> bool) -> bool {
        self.tv.values().all(pred)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.all_values(|v| v.is_some_and(|v| *v > V::zero()))
    }

    #[must_use]
    pub fn is_undefined_or_positive(&self) -> bool {
        self.all_values(|v| v.map_or(true, |v| *v > V::zero()))
    }

    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.all_values(|v| v.is_some_and(|v| *v >= V::zero()))
    }

    #[must_use]
    pub fn is_undefined_or_non_negative(&self) -> bool {
        self.all_values(|v| v.map_or(true, |v| *v >= V::zero()))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.all_values(|v| v.is_some_and(Zero::is_zero))
    }

    #[must_use]
    pub fn is_undefined_or_zero(&self) -> bool {
        self.all_values(|v| v.map_or(true, Zero::is_zero))
    }
}

impl<T, V> Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialOrd + Clone + Zero + Neg<Output = V>,
{
    /// True if self <= other everywhere.  False as soon as the difference
    /// is undefined somewhere.
    #[must_use]
    pub fn le(&self, other: &Self) -> bool {
        (other - self).is_non_negative()
    }

    /// True if self < other everywhere
    #[must_use]
    pub fn lt(&self, other: &Self) -> bool {
        (other - self).is_positive()
    }

    #[must_use]
    pub fn ge(&self, other: &Self) -> bool {
        other.le(self)
    }

    #[must_use]
    pub fn gt(&self, other: &Self) -> bool {
        other.lt(self)
    }
}

//--------------------------------------------------------------
// Arithmetic
//--------------------------------------------------------------

impl<T, V> Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Signed,
{
    #[must_use]
    pub fn abs(&self) -> Self {
        self.map_values(|v| v.abs())
    }
}

impl<T, V> Stepfun<T, V>
where
    T: PartialOrd + Clone + Display,
    V: PartialEq + Clone + Zero + Div<Output = V>,
{
    /// Pointwise division.  The result is undefined where self is.  Where
    /// self is defined, the divisor must be defined and not zero.
    pub fn checked_div(&self, divisor: &Self) -> Result<Self> {
        let numerator: Stepfun<T, (Option<V>, Option<V>)> =
            self.map_values(|v| (Some(v), None));
        let denominator: Stepfun<T, (Option<V>, Option<V>)> =
            divisor.map_values(|v| (None, Some(v)));
        let both = numerator.merge(
            |(n1, d1), (n2, d2)| (n1.or(n2), d1.or(d2)),
            &[&denominator],
        );

        let pairs = both
            .tv
            .into_iter()
            .map(|(t, v)| match v {
                None | Some((None, _)) => Ok((t, None)),
                Some((Some(n), Some(d))) if !d.is_zero() => {
                    Ok((t, Some(n / d)))
                }
                Some((Some(_), Some(_) | None)) => {
                    log::debug!("division by zero or undefined at {}", t);
                    Err(Error::DivisionByZero(t.to_string()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Stepfun {
            tv: TVList::from_ascending(pairs),
        })
    }
}

impl<T, V> Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: Clone + Zero,
{
    /// Integral of self from start to stop.  Undefined parts count as zero.
    /// Returns zero when stop <= start.
    #[must_use]
    pub fn integral<L>(&self, start: &T, stop: &T) -> V
    where
        T: Sub<Output = L>,
        V: Mul<L, Output = V>,
    {
        let mut total = V::zero();
        if start >= stop {
            return total;
        }

        let pairs = self.tv.as_slice();
        let nexts = pairs
            .iter()
            .skip(1)
            .map(|(t, _)| t.value())
            .chain(std::iter::once(None));

        for ((t, v), next) in pairs.iter().zip(nexts) {
            let lower = match t.value() {
                Some(t) if t > start => t,
                Some(_) | None => start,
            };
            if lower >= stop {
                break;
            }
            let upper = match next {
                Some(n) if n < stop => n,
                Some(_) | None => stop,
            };
            if let Some(v) = v {
                if lower < upper {
                    total = total + v.clone() * (upper.clone() - lower.clone());
                }
            }
        }
        total
    }
}

impl<'a, T, V> Add<&'a Stepfun<T, V>> for &'a Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Add<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn add(self, rhs: &'a Stepfun<T, V>) -> Self::Output {
        self.merge(|a, b| a + b, &[rhs])
    }
}

impl<T, V> Add for Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Add<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn add(self, rhs: Stepfun<T, V>) -> Self::Output {
        &self + &rhs
    }
}

impl<'a, T, V> Sub<&'a Stepfun<T, V>> for &'a Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Add<Output = V> + Neg<Output = V>,
{
    type Output = Stepfun<T, V>;

    /// Adds the opposite of rhs, so undefined parts of rhs leave self
    /// unchanged, and undefined parts of self give -rhs.
    fn sub(self, rhs: &'a Stepfun<T, V>) -> Self::Output {
        self + &(-rhs)
    }
}

impl<T, V> Sub for Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Add<Output = V> + Neg<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn sub(self, rhs: Stepfun<T, V>) -> Self::Output {
        &self - &rhs
    }
}

impl<'a, T, V> Mul<&'a Stepfun<T, V>> for &'a Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Mul<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn mul(self, rhs: &'a Stepfun<T, V>) -> Self::Output {
        self.merge(|a, b| a * b, &[rhs])
    }
}

impl<T, V> Mul for Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Mul<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn mul(self, rhs: Stepfun<T, V>) -> Self::Output {
        &self * &rhs
    }
}

impl<T, V> Neg for &Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Neg<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn neg(self) -> Self::Output {
        self.map_values(|v| -v)
    }
}

impl<T, V> Neg for Stepfun<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone + Neg<Output = V>,
{
    type Output = Stepfun<T, V>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

//--------------------------------------------------------------
// Boolean operators, only for boolean functions
//--------------------------------------------------------------

impl<'a, T: PartialOrd + Clone> BitAnd<&'a Stepfun<T, bool>>
    for &'a Stepfun<T, bool>
{
    type Output = Stepfun<T, bool>;

    fn bitand(self, rhs: &'a Stepfun<T, bool>) -> Self::Output {
        self.merge(|a, b| a & b, &[rhs])
    }
}

impl<T: PartialOrd + Clone> BitAnd for Stepfun<T, bool> {
    type Output = Stepfun<T, bool>;

    fn bitand(self, rhs: Stepfun<T, bool>) -> Self::Output {
        &self & &rhs
    }
}

impl<'a, T: PartialOrd + Clone> BitOr<&'a Stepfun<T, bool>>
    for &'a Stepfun<T, bool>
{
    type Output = Stepfun<T, bool>;

    fn bitor(self, rhs: &'a Stepfun<T, bool>) -> Self::Output {
        self.merge(|a, b| a | b, &[rhs])
    }
}

impl<T: PartialOrd + Clone> BitOr for Stepfun<T, bool> {
    type Output = Stepfun<T, bool>;

    fn bitor(self, rhs: Stepfun<T, bool>) -> Self::Output {
        &self | &rhs
    }
}

impl<T: PartialOrd + Clone> Not for &Stepfun<T, bool> {
    type Output = Stepfun<T, bool>;

    fn not(self) -> Self::Output {
        self.map_values(|v| !v)
    }
}

impl<T: PartialOrd + Clone> Not for Stepfun<T, bool> {
    type Output = Stepfun<T, bool>;

    fn not(self) -> Self::Output {
        !&self
    }
}
