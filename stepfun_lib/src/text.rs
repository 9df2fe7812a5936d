//! Textual representation of timelines and interval sets.
//!
//! The format is the one used for the command line:
//!    timestamp     -oo  or  12
//!    step function [(-oo, undef), (0, 100), (10, 200), (20, undef)]
//!    interval      [0, 10)   [-oo, 10)   [0, +oo)
//!    interval set  {}  or  {[-oo, 0), [1, 2)}
//! Keys and values are written with their own `Display` implementation,
//! and parsed back with `FromStr`, so they should not contain any of the
//! separators above.

use crate::errors::{Error, Result};
use crate::interval_sets::{Interval, IntervalSet};
use crate::stepfuns::Stepfun;
use crate::timestamps::Timestamp;
use crate::tv_lists::{TVList, TVPair};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const NEG_INFINITY: &str = "-oo";
const POS_INFINITY: &str = "+oo";
const UNDEFINED: &str = "undef";

impl<T: Display> Display for Timestamp<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::NegInfinity => write!(f, "{NEG_INFINITY}"),
            Timestamp::At(t) => write!(f, "{t}"),
        }
    }
}

impl<T: FromStr> FromStr for Timestamp<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == NEG_INFINITY {
            Ok(Timestamp::NegInfinity)
        } else {
            Ok(Timestamp::At(parse_item(s, "timestamp")?))
        }
    }
}

impl<T: Display, V: Display> Display for TVList<T, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (idx, (t, v)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({t}, ")?;
            match v {
                None => write!(f, "{UNDEFINED}")?,
                Some(v) => write!(f, "{v}")?,
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}

impl<T, V> FromStr for TVList<T, V>
where
    T: FromStr + PartialOrd,
    V: FromStr + PartialEq,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rest = strip_delimiters(s, '[', ']')?;
        let mut pairs: Vec<TVPair<T, V>> = Vec::new();
        while !rest.is_empty() {
            let (body, tail) = next_group(rest, '(', ')')?;
            let (t, v) = body.split_once(',').ok_or_else(|| {
                Error::Parse(format!("expected (timestamp, value), got ({body})"))
            })?;
            let v = v.trim();
            pairs.push((
                t.parse()?,
                if v == UNDEFINED {
                    None
                } else {
                    Some(parse_item(v, "value")?)
                },
            ));
            rest = tail;
        }
        TVList::new(pairs)
    }
}

impl<T: Display, V: Display> Display for Stepfun<T, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.tv_list(), f)
    }
}

impl<T, V> FromStr for Stepfun<T, V>
where
    T: FromStr + PartialOrd,
    V: FromStr + PartialEq,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Stepfun::from(s.parse::<TVList<T, V>>()?))
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.lower {
            None => write!(f, "[{NEG_INFINITY}, ")?,
            Some(lower) => write!(f, "[{lower}, ")?,
        }
        match &self.upper {
            None => write!(f, "{POS_INFINITY})"),
            Some(upper) => write!(f, "{upper})"),
        }
    }
}

impl<T: FromStr> FromStr for Interval<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let body = strip_delimiters(s, '[', ')')?;
        parse_interval_body(body)
    }
}

impl<T: Display + PartialOrd + Clone> Display for IntervalSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (idx, intv) in self.to_intervals().iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{intv}")?;
        }
        write!(f, "}}")
    }
}

impl<T: FromStr + PartialOrd + Clone> FromStr for IntervalSet<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rest = strip_delimiters(s, '{', '}')?;
        let mut intervals = Vec::new();
        while !rest.is_empty() {
            let (body, tail) = next_group(rest, '[', ')')?;
            intervals.push(parse_interval_body(body)?);
            rest = tail;
        }
        Ok(IntervalSet::new(intervals))
    }
}

fn parse_item<T: FromStr>(s: &str, what: &str) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| Error::Parse(format!("invalid {what} '{}'", s.trim())))
}

/// The text between open and close, which must start and end s
fn strip_delimiters(s: &str, open: char, close: char) -> Result<&str> {
    s.trim()
        .strip_prefix(open)
        .and_then(|s| s.strip_suffix(close))
        .map(str::trim)
        .ok_or_else(|| {
            Error::Parse(format!("expected {open}...{close}, got '{}'", s.trim()))
        })
}

/// Split "(body), tail" into body and tail.  The separator after the
/// group is optional for the last one.
fn next_group(s: &str, open: char, close: char) -> Result<(&str, &str)> {
    let (body, tail) = s
        .strip_prefix(open)
        .and_then(|s| s.split_once(close))
        .ok_or_else(|| {
            Error::Parse(format!("expected {open}...{close}, got '{s}'"))
        })?;
    let tail = tail.trim_start();
    let tail = match tail.strip_prefix(',') {
        Some(t) => t.trim_start(),
        None if tail.is_empty() => tail,
        None => {
            return Err(Error::Parse(format!("expected ',' before '{tail}'")))
        }
    };
    Ok((body, tail))
}

fn parse_interval_body<T: FromStr>(body: &str) -> Result<Interval<T>> {
    let (lower, upper) = body.split_once(',').ok_or_else(|| {
        Error::Parse(format!("expected [lower, upper), got [{body})"))
    })?;
    let lower = lower.trim();
    let upper = upper.trim();
    Ok(Interval::new(
        if lower == NEG_INFINITY {
            None
        } else {
            Some(parse_item(lower, "lower bound")?)
        },
        if upper == POS_INFINITY {
            None
        } else {
            Some(parse_item(upper, "upper bound")?)
        },
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::timestamps::Timestamp::{At, NegInfinity};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_timestamp() {
        assert_eq!(Timestamp::<i32>::NegInfinity.to_string(), "-oo");
        assert_eq!(At(-3).to_string(), "-3");
        assert_eq!("-oo".parse::<Timestamp<i32>>(), Ok(NegInfinity));
        assert_eq!(" 12 ".parse::<Timestamp<i32>>(), Ok(At(12)));
        assert!(matches!(
            "twelve".parse::<Timestamp<i32>>(),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_stepfun() {
        let f: Stepfun<i64, i64> = Stepfun::new(vec![
            (NegInfinity, None),
            (At(0), Some(100)),
            (At(10), Some(200)),
            (At(20), None),
        ])
        .unwrap();
        let text = "[(-oo, undef), (0, 100), (10, 200), (20, undef)]";
        assert_eq!(f.to_string(), text);
        assert_eq!(text.parse::<Stepfun<i64, i64>>(), Ok(f.clone()));
        assert_eq!("[(-oo,undef),(0,100),(10,200),(20,undef)]".parse(), Ok(f));

        assert_eq!(
            Stepfun::<i64, bool>::constant(true).to_string(),
            "[(-oo, true)]"
        );

        // Values are normalized while parsing
        assert_eq!(
            "[(-oo, 1), (5, 1)]".parse::<Stepfun<i64, i64>>(),
            Ok(Stepfun::constant(1))
        );
    }

    #[test]
    fn test_round_trip() {
        let f: Stepfun<Decimal, Decimal> = Stepfun::new(vec![
            (NegInfinity, Some(dec!(-1.5))),
            (At(dec!(0.25)), None),
            (At(dec!(3)), Some(dec!(12.000))),
        ])
        .unwrap();
        assert_eq!(f.to_string().parse(), Ok(f));

        let d = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        let g: Stepfun<NaiveDate, f64> = Stepfun::new(vec![
            (NegInfinity, None),
            (At(d(1)), Some(0.1)),
            (At(d(6)), Some(-2.5)),
        ])
        .unwrap();
        assert_eq!(
            g.to_string(),
            "[(-oo, undef), (2024-01-01, 0.1), (2024-06-01, -2.5)]"
        );
        assert_eq!(g.to_string().parse(), Ok(g));

        let s = IntervalSet::new([
            Interval::until(0),
            Interval::lcro(1, 2),
            Interval::from_lower(3),
        ]);
        assert_eq!(s.to_string(), "{[-oo, 0), [1, 2), [3, +oo)}");
        assert_eq!(s.to_string().parse(), Ok(s));

        for s in [IntervalSet::<i32>::empty(), IntervalSet::everything()] {
            assert_eq!(s.to_string().parse(), Ok(s));
        }
    }

    #[test]
    fn test_interval() {
        assert_eq!(Interval::lcro(1, 2).to_string(), "[1, 2)");
        assert_eq!(Interval::<i32>::unbounded().to_string(), "[-oo, +oo)");
        assert_eq!("[-oo, 4)".parse(), Ok(Interval::until(4)));
        assert_eq!("[4,+oo)".parse(), Ok(Interval::from_lower(4)));
        assert_eq!(IntervalSet::<i32>::empty().to_string(), "{}");
        assert_eq!(IntervalSet::<i32>::everything().to_string(), "{[-oo, +oo)}");

        // Overlapping intervals are merged
        assert_eq!(
            "{[0, 5), [3, 8), [10, 10)}".parse::<IntervalSet<i32>>(),
            Ok(IntervalSet::from(Interval::lcro(0, 8)))
        );
    }

    #[test]
    fn test_errors() {
        for text in [
            "",
            "(-oo, 1)",
            "[(-oo 1)]",
            "[(-oo, 1) (2, 3)]",
            "[(-oo, 1), (2, x)]",
            "[(-oo, 1), (y, 3)]",
        ] {
            assert!(
                matches!(text.parse::<Stepfun<i32, i32>>(), Err(Error::Parse(_))),
                "{text}"
            );
        }
        assert_eq!("[]".parse::<Stepfun<i32, i32>>(), Err(Error::EmptyTimeline));
        assert!(matches!(
            "[(-oo, 1), (3, 2), (1, 3)]".parse::<Stepfun<i32, i32>>(),
            Err(Error::MalformedTimeline(_))
        ));

        for text in ["[0, 1]", "0, 1)", "[0 1)", "[a, 1)"] {
            assert!(
                matches!(text.parse::<Interval<i32>>(), Err(Error::Parse(_))),
                "{text}"
            );
        }
        assert!(matches!(
            "{[0, 1) [2, 3)}".parse::<IntervalSet<i32>>(),
            Err(Error::Parse(_))
        ));
    }
}
