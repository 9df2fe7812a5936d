//! Step functions over an ordered key type, and sets of intervals built on
//! top of them.
//!
//! ```
//!     use stepfun_lib::{Stepfun, Timestamp};
//!     let f: Stepfun<i32, i32> = "[(-oo, undef), (2, 20), (4, 40), (5, undef)]"
//!         .parse()
//!         .unwrap();
//!     let g: Stepfun<i32, i32> = "[(-oo, undef), (1, 10), (3, 30)]".parse().unwrap();
//!     let sum = &f + &g;
//!     assert_eq!(
//!         sum.to_string(),
//!         "[(-oo, undef), (1, 10), (2, 30), (3, 50), (4, 70), (5, 30)]"
//!     );
//!     assert_eq!(sum.evaluate(&Timestamp::At(3)), Some(&50));
//! ```

pub mod errors;
pub mod interval_sets;
pub mod merge;
pub mod stepfuns;
pub mod text;
pub mod timestamps;
pub mod tv_lists;
pub mod weak_ops;

pub use errors::{Error, Result};
pub use interval_sets::{Interval, IntervalSet};
pub use stepfuns::Stepfun;
pub use timestamps::Timestamp;
pub use tv_lists::{TVList, TVPair};
