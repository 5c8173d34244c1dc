use rand::{Rng, rng};

use crate::rand::RandSource;

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free. This type does **not** store the RNG itself; it simply
/// accesses the thread-local generator on each call, which makes it `Send` and
/// `Sync` even though the underlying `ThreadRng` is neither.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl<const N: usize> RandSource<[u8; N]> for ThreadRandom {
    fn rand(&self) -> [u8; N] {
        let mut bytes = [0_u8; N];
        rng().fill(&mut bytes[..]);
        bytes
    }
}

impl RandSource<i32> for ThreadRandom {
    fn rand(&self) -> i32 {
        rng().random()
    }
}
