//! Weak operators ignore their undefined operands.
//!
//! Combining anything with an undefined value gives the other operand back,
//! and combining only undefined values gives undefined:
//! ```
//!     use stepfun_lib::weak_ops::weak_op;
//!     let add = weak_op(|a: i32, b| a + b);
//!     assert_eq!(add(&[Some(1), None, Some(2)]), Some(3));
//!     assert_eq!(add(&[None, None]), None);
//!     assert_eq!(add(&[]), None);
//! ```

/// Left-fold of the defined values with `op`, or None if there are none.
#[must_use]
pub fn weak_reduce<V, F>(
    op: F,
    values: impl IntoIterator<Item = Option<V>>,
) -> Option<V>
where
    F: Fn(V, V) -> V,
{
    values.into_iter().flatten().reduce(op)
}

/// Lift a binary operator into one that reduces a slice of possibly
/// undefined operands.
#[must_use]
pub fn weak_op<V, F>(op: F) -> impl Fn(&[Option<V>]) -> Option<V>
where
    V: Clone,
    F: Fn(V, V) -> V,
{
    move |values| weak_reduce(&op, values.iter().cloned())
}

/// Lift a unary function: undefined stays undefined.
#[must_use]
pub fn weak_map<V, W, F>(f: F) -> impl Fn(Option<V>) -> Option<W>
where
    F: Fn(V) -> W,
{
    move |value| value.map(&f)
}

/// The operator used to fill the undefined parts of a function: the left
/// operand always wins, so once lifted the right operand is only used
/// where the left one is undefined.
#[must_use]
pub fn prefer_left<V>(left: V, _right: V) -> V {
    left
}
