/// A trait for random sources that return random values.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. COMB ids only need unpredictability good enough to
/// break ties within a millisecond; nothing here has to be cryptographically
/// secure.
///
/// # Example
/// ```
/// use idweave::RandSource;
///
/// struct FixedRand;
/// impl RandSource<[u8; 10]> for FixedRand {
///     fn rand(&self) -> [u8; 10] {
///         [7; 10]
///     }
/// }
///
/// assert_eq!(FixedRand.rand(), [7; 10]);
/// ```
pub trait RandSource<T>: Send + Sync {
    /// Returns a random value.
    fn rand(&self) -> T;
}
