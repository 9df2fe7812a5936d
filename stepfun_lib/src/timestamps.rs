/// A point on the time axis of a step function.
///
/// Any type can be used for the keys, as long as it can be (partially)
/// ordered: integers, floats, decimals, dates,...
/// The extra `NegInfinity` variant is the sentinel that starts every
/// timeline.  It sorts before every other timestamp, which is what the
/// derived ordering gives us since it is declared first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timestamp<T> {
    NegInfinity,
    At(T),
}

impl<T> Timestamp<T> {
    /// The key, or None for the sentinel
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Timestamp::NegInfinity => None,
            Timestamp::At(t) => Some(t),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Timestamp::NegInfinity => None,
            Timestamp::At(t) => Some(t),
        }
    }

    /// None is read as -infinity, as for the lower bound of an interval
    #[must_use]
    pub fn from_lower(value: Option<T>) -> Self {
        match value {
            None => Timestamp::NegInfinity,
            Some(t) => Timestamp::At(t),
        }
    }

    #[must_use]
    pub fn is_neg_infinity(&self) -> bool {
        matches!(self, Timestamp::NegInfinity)
    }

    /// Converts from `&Timestamp<T>` to `Timestamp<&T>`
    #[must_use]
    pub fn as_ref(&self) -> Timestamp<&T> {
        match self {
            Timestamp::NegInfinity => Timestamp::NegInfinity,
            Timestamp::At(t) => Timestamp::At(t),
        }
    }
}

impl<T> From<T> for Timestamp<T> {
    fn from(value: T) -> Self {
        Timestamp::At(value)
    }
}
