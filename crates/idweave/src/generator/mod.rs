mod comb;
mod interface;
mod object_id;
mod snowflake;
mod string;

pub use comb::*;
pub use interface::*;
pub use object_id::*;
pub use snowflake::*;
pub use string::*;

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard, PoisonError};
