/// The strategy a [`RecyclePool`][crate::RecyclePool] uses to construct new items and to
/// decide whether a previously used item may be handed out again.
///
/// Pooled resource types differ in how they are built and what makes them unusable, so both
/// behaviors are supplied by a companion manager value injected into the pool at construction
/// time. The manager is consulted from multiple threads concurrently and borrows items
/// immutably, so implementations typically hold only configuration (plus any shared counters
/// behind interior mutability).
///
/// # Contract
///
/// * [`create`][Self::create] may fail; the error is returned to the caller unchanged and the
///   pool is left untouched.
/// * [`is_valid`][Self::is_valid] must be total: it always returns and must not panic. It runs
///   inside the release and sweep paths, which have no way to surface a failure. The default
///   implementation accepts every item.
///
/// # Example
///
/// ```rust
/// use recycle_pool::ManageItem;
///
/// struct ManageBuffers {
///     capacity: usize,
/// }
///
/// impl ManageItem for ManageBuffers {
///     type Item = Vec<u8>;
///     type Error = std::convert::Infallible;
///
///     fn create(&self) -> Result<Self::Item, Self::Error> {
///         Ok(Vec::with_capacity(self.capacity))
///     }
///
///     fn is_valid(&self, buffer: &Self::Item) -> bool {
///         // A buffer that was shrunk while checked out is not worth reusing.
///         buffer.capacity() >= self.capacity
///     }
/// }
/// ```
pub trait ManageItem {
    /// The pooled resource type.
    type Item;

    /// The error returned when [`create`][Self::create] fails.
    type Error;

    /// Constructs one new, uniquely-owned item.
    ///
    /// Called by [`RecyclePool::create`][crate::RecyclePool::create], and by
    /// [`RecyclePool::get`][crate::RecyclePool::get] once no idle item survives validation.
    fn create(&self) -> Result<Self::Item, Self::Error>;

    /// Decides whether an item may be reused or must be destroyed.
    ///
    /// Consulted when an item is pulled from storage for reuse, when a released item is
    /// offered back to the pool, and during [`erase_invalid`][crate::RecyclePool::erase_invalid]
    /// sweeps. Items that fail the check are destroyed in all three cases.
    fn is_valid(&self, _item: &Self::Item) -> bool {
        true
    }
}
