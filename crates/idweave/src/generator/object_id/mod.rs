mod identity;
mod mongo;

pub use identity::*;
pub use mongo::*;
