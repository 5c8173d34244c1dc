mod object_id;
mod snowflake;

pub use snowflake::*;
