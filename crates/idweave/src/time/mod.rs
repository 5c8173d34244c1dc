mod interface;
mod mono_clock;
mod system;

pub use interface::*;
pub use mono_clock::*;
pub use system::*;

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Renders `instant` in UTC or in the local zone.
pub(crate) fn in_zone(instant: DateTime<Utc>, use_utc: bool) -> DateTime<FixedOffset> {
    if use_utc {
        instant.fixed_offset()
    } else {
        instant.with_timezone(&Local).fixed_offset()
    }
}
