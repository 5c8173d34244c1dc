mod comb;
mod object_id;
mod snowflake;

pub use comb::*;
pub use object_id::*;
pub use snowflake::*;
