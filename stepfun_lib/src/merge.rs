use crate::timestamps::Timestamp;
use crate::tv_lists::{TVList, TVPair};
use crate::weak_ops::weak_reduce;
use itertools::Itertools;

/// Merge any number of timelines into one, combining their values with the
/// weak version of `op`.
///
/// The result has a step wherever one of the inputs has a step and the
/// combined value changes.  Its value at x is the weak reduction by op of
/// the values of all inputs at x, so for instance merging with `+` gives
/// the pointwise sum in which undefined values are ignored.
///
/// We walk all timelines in parallel, always consuming the smallest pending
/// timestamp.  The pending timestamps are kept in a binary heap (through
/// `kmerge_by`), so the merge is O(n log k) for k timelines with n steps in
/// total.  When several timelines step at the same timestamp, they are all
/// consumed before the new value is computed.
///
/// Merging an empty list of timelines gives the function that is nowhere
/// defined.
#[must_use]
pub fn merge_op<T, V, F>(op: F, lists: &[&TVList<T, V>]) -> TVList<T, V>
where
    T: PartialOrd + Clone,
    V: PartialEq + Clone,
    F: Fn(V, V) -> V,
{
    // Current value of each timeline
    let mut active: Vec<Option<V>> =
        lists.iter().map(|l| l.first_value().cloned()).collect();

    let mut last = weak_reduce(&op, active.iter().cloned());
    let mut result: Vec<TVPair<T, V>> =
        vec![(Timestamp::NegInfinity, last.clone())];

    let steps = lists
        .iter()
        .enumerate()
        .map(|(idx, list)| {
            list.as_slice().iter().skip(1).map(move |(t, v)| (idx, t, v))
        })
        .kmerge_by(|a, b| a.1 < b.1);

    for (t, group) in &steps.chunk_by(|(_, t, _)| *t) {
        for (idx, _, v) in group {
            if let Some(slot) = active.get_mut(idx) {
                slot.clone_from(v);
            }
        }

        let value = weak_reduce(&op, active.iter().cloned());
        if value != last {
            result.push((t.clone(), value.clone()));
            last = value;
        }
    }

    log::trace!(
        "merged {} timelines into {} steps",
        lists.len(),
        result.len()
    );
    TVList::from_ascending(result)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::timestamps::Timestamp::{At, NegInfinity};
    use crate::weak_ops::prefer_left;

    type Pairs = Vec<TVPair<i64, i64>>;

    fn tv(pairs: &[(Option<i64>, Option<i64>)]) -> TVList<i64, i64> {
        TVList::new(
            pairs.iter().map(|(t, v)| (Timestamp::from_lower(*t), *v)),
        )
        .unwrap()
    }

    /// The straightforward O(n*k) version: at each step, look at the next
    /// pending timestamp of every timeline.
    fn naive_merge<F: Fn(i64, i64) -> i64>(
        op: F,
        lists: &[&TVList<i64, i64>],
    ) -> TVList<i64, i64> {
        let mut cursors = vec![1_usize; lists.len()];
        let mut active: Vec<Option<i64>> =
            lists.iter().map(|l| l.first_value().cloned()).collect();
        let mut result: Pairs =
            vec![(NegInfinity, weak_reduce(&op, active.clone()))];

        loop {
            let next = lists
                .iter()
                .zip(&cursors)
                .filter_map(|(l, c)| l.as_slice().get(*c).map(|p| p.0))
                .min();
            let Some(t) = next else { break };

            for ((list, cursor), slot) in lists
                .iter()
                .zip(cursors.iter_mut())
                .zip(active.iter_mut())
            {
                if let Some((lt, lv)) = list.as_slice().get(*cursor) {
                    if *lt == t {
                        *slot = *lv;
                        *cursor += 1;
                    }
                }
            }

            let value = weak_reduce(&op, active.clone());
            if result.last().map(|p| p.1) != Some(value) {
                result.push((t, value));
            }
        }
        TVList::new(result).unwrap()
    }

    fn inputs() -> Vec<TVList<i64, i64>> {
        vec![
            tv(&[(None, None)]),
            tv(&[(None, Some(100))]),
            tv(&[(None, Some(100)), (Some(0), None)]),
            tv(&[(None, Some(100)), (Some(0), Some(200))]),
            tv(&[
                (None, None),
                (Some(0), Some(31)),
                (Some(10), Some(41)),
                (Some(20), None),
            ]),
            tv(&[
                (None, None),
                (Some(0), Some(63)),
                (Some(5), Some(23)),
                (Some(15), Some(53)),
                (Some(20), None),
            ]),
            tv(&[
                (None, None),
                (Some(0), Some(100)),
                (Some(10), Some(200)),
                (Some(20), Some(100)),
                (Some(30), None),
            ]),
            tv(&[
                (None, None),
                (Some(-10), Some(200)),
                (Some(10), Some(100)),
                (Some(20), Some(200)),
                (Some(30), None),
            ]),
            tv(&[
                (None, None),
                (Some(-20), Some(200)),
                (Some(10), None),
                (Some(20), Some(200)),
                (Some(30), None),
            ]),
            tv(&[
                (None, None),
                (Some(-20), Some(200)),
                (Some(10), None),
                (Some(20), Some(200)),
                (Some(30), Some(300)),
            ]),
        ]
    }

    #[test]
    fn test_merge_pairs() {
        let inp = inputs();
        let add = |a: i64, b: i64| a + b;
        let m = |x: usize, y: usize| {
            merge_op(add, &[inp.get(x).unwrap(), inp.get(y).unwrap()])
        };

        assert_eq!(m(0, 0), tv(&[(None, None)]));
        assert_eq!(m(0, 1), tv(&[(None, Some(100))]));
        assert_eq!(m(1, 1), tv(&[(None, Some(200))]));
        assert_eq!(m(2, 3), tv(&[(None, Some(200))]));
        assert_eq!(
            m(4, 5),
            tv(&[
                (None, None),
                (Some(0), Some(94)),
                (Some(5), Some(54)),
                (Some(10), Some(64)),
                (Some(15), Some(94)),
                (Some(20), None),
            ])
        );
    }

    #[test]
    fn test_merge_many() {
        let inp = inputs();
        let all: Vec<&TVList<i64, i64>> = inp.iter().collect();

        assert_eq!(
            merge_op(|a, b| a + b, &all),
            tv(&[
                (None, Some(300)),
                (Some(-20), Some(700)),
                (Some(-10), Some(900)),
                (Some(0), Some(1094)),
                (Some(5), Some(1054)),
                (Some(10), Some(664)),
                (Some(15), Some(694)),
                (Some(20), Some(1000)),
                (Some(30), Some(600)),
            ])
        );
        assert_eq!(
            merge_op(|a, b| a * b, &all),
            tv(&[
                (None, Some(1_000_000)),
                (Some(-20), Some(40_000_000_000)),
                (Some(-10), Some(8_000_000_000_000)),
                (Some(0), Some(31_248_000_000_000_000)),
                (Some(5), Some(11_408_000_000_000_000)),
                (Some(10), Some(377_200_000_000)),
                (Some(15), Some(869_200_000_000)),
                (Some(20), Some(16_000_000_000_000)),
                (Some(30), Some(6_000_000)),
            ])
        );
        assert_eq!(
            merge_op(std::cmp::max, &all),
            tv(&[
                (None, Some(100)),
                (Some(-20), Some(200)),
                (Some(30), Some(300)),
            ])
        );
        assert_eq!(
            merge_op(std::cmp::min, &all),
            tv(&[
                (None, Some(100)),
                (Some(0), Some(31)),
                (Some(5), Some(23)),
                (Some(15), Some(41)),
                (Some(20), Some(100)),
            ])
        );
    }

    #[test]
    fn test_identity() {
        for f in inputs() {
            assert_eq!(merge_op(prefer_left, &[&f]), f);
            assert_eq!(merge_op(|a, b| a + b, &[&f]), f);
        }
        assert_eq!(
            merge_op::<i64, i64, _>(|a, b| a + b, &[]),
            TVList::constant(None)
        );
    }

    #[test]
    fn test_same_as_naive() {
        let inp = inputs();
        let ops: [fn(i64, i64) -> i64; 4] =
            [|a, b| a + b, |a, b| a * b, std::cmp::max, std::cmp::min];

        for op in ops {
            for left in &inp {
                for right in &inp {
                    assert_eq!(
                        merge_op(op, &[left, right]),
                        naive_merge(op, &[left, right])
                    );
                }
            }
            let all: Vec<&TVList<i64, i64>> = inp.iter().collect();
            assert_eq!(merge_op(op, &all), naive_merge(op, &all));
        }
    }

    #[test]
    fn test_alternating() {
        // Two functions that alternate between 0 and 1, in opposite phase:
        // their sum is the constant 1.
        let n = 1000;
        let f = TVList::new(
            std::iter::once((NegInfinity, Some(1)))
                .chain((0..n).map(|k| (At(k), Some((k + 1) % 2)))),
        )
        .unwrap();
        let g = TVList::new(
            std::iter::once((NegInfinity, Some(0)))
                .chain((0..n).map(|k| (At(k), Some(k % 2)))),
        )
        .unwrap();
        assert_eq!(f.len(), n as usize);
        assert_eq!(g.len(), n as usize);
        assert_eq!(
            merge_op(|a, b| a + b, &[&f, &g]),
            TVList::constant(Some(1))
        );
    }
}
