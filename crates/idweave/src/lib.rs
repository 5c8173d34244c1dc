#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod numeral;
mod rand;
mod registry;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub mod serde;
#[cfg(test)]
mod test_support;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::numeral::*;
pub use crate::rand::*;
pub use crate::registry::*;
pub use crate::time::*;

pub use tokio_util::sync::CancellationToken;
pub use uuid::Uuid;
