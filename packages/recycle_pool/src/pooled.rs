use std::fmt;
use std::mem;
use std::ops::Deref;
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

use crate::constants::ERR_POISONED_LOCK;
use crate::pool::PoolInner;
use crate::{ManageItem, RecyclePool};

/// A shared-ownership handle to one item produced by a [`RecyclePool`].
///
/// Cloning the handle shares the same item; when the last clone is dropped, the release
/// protocol runs exactly once: the item is offered back to the pool it is bound to, or
/// destroyed if the handle is unbound, the pool is gone, or the item fails validation.
///
/// The pool association is weak and rebindable: it never keeps the pool alive, and
/// [`attach`][Self::attach] and [`detach`][Self::detach] change where (or whether) the
/// item is returned, for every clone of the handle at once.
///
/// Access the item through dereferencing. There is no mutable access through a handle,
/// because clones may be held concurrently; item types that need in-place mutation use
/// interior mutability.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{ManageItem, RecyclePool};
///
/// struct ManageBuffers;
///
/// impl ManageItem for ManageBuffers {
///     type Item = Vec<u8>;
///     type Error = std::convert::Infallible;
///
///     fn create(&self) -> Result<Self::Item, Self::Error> {
///         Ok(vec![0; 16])
///     }
/// }
///
/// let pool = RecyclePool::new(ManageBuffers);
/// let buffer = pool.get()?;
///
/// // The handle dereferences to the item.
/// assert_eq!(buffer.len(), 16);
///
/// // Clones share the same item; it is released once, when the last clone drops.
/// let second = buffer.clone();
/// drop(buffer);
/// assert_eq!(pool.len(), 0);
/// drop(second);
/// assert_eq!(pool.len(), 1);
/// # Ok::<(), std::convert::Infallible>(())
/// ```
pub struct Pooled<M: ManageItem> {
    inner: Arc<PooledInner<M>>,
}

/// The shared state behind every clone of one handle: the item itself and the rebindable
/// pool association. Dropping this (i.e. dropping the last clone) runs the release protocol.
struct PooledInner<M: ManageItem> {
    /// `Some` for the entire life of the handle; taken exactly once, on release.
    item: Option<M::Item>,

    /// Where release returns the item. Weak, so items never extend the pool's lifetime,
    /// and shared by all clones so rebinding affects the handle as a whole.
    binding: Mutex<Weak<PoolInner<M>>>,
}

impl<M: ManageItem> Pooled<M> {
    /// Wraps a freshly served item in a handle bound to the given pool.
    pub(crate) fn bound(item: M::Item, pool: &Arc<PoolInner<M>>) -> Self {
        Self::with_binding(item, Arc::downgrade(pool))
    }

    /// Wraps an externally-created item in a handle with no pool association.
    ///
    /// Releasing an unbound handle destroys the item. Use [`attach`][Self::attach] to place
    /// the item under pool management so that release returns it instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{ManageItem, Pooled, RecyclePool};
    ///
    /// struct ManageBuffers;
    ///
    /// impl ManageItem for ManageBuffers {
    ///     type Item = Vec<u8>;
    ///     type Error = std::convert::Infallible;
    ///
    ///     fn create(&self) -> Result<Self::Item, Self::Error> {
    ///         Ok(Vec::new())
    ///     }
    /// }
    ///
    /// let pool = RecyclePool::new(ManageBuffers);
    ///
    /// // This buffer was not built by the pool's factory.
    /// let buffer: Pooled<ManageBuffers> = Pooled::unbound(vec![1, 2, 3]);
    /// buffer.attach(&pool);
    ///
    /// drop(buffer);
    /// assert_eq!(pool.len(), 1);
    /// ```
    #[must_use]
    pub fn unbound(item: M::Item) -> Self {
        Self::with_binding(item, Weak::new())
    }

    fn with_binding(item: M::Item, binding: Weak<PoolInner<M>>) -> Self {
        Self {
            inner: Arc::new(PooledInner {
                item: Some(item),
                binding: Mutex::new(binding),
            }),
        }
    }

    /// Rebinds this handle, and every clone of it, to the given pool.
    ///
    /// The association is weak: it does not keep the pool alive. The item does not need to
    /// have been constructed by this pool, or by any pool.
    pub fn attach(&self, pool: &RecyclePool<M>) {
        *self.inner.binding.lock().expect(ERR_POISONED_LOCK) = pool.downgrade();
    }

    /// Clears the pool association for this handle and every clone of it.
    ///
    /// A detached handle never returns its item anywhere: release destroys the item, even
    /// if the pool that produced it is still alive.
    pub fn detach(&self) {
        *self.inner.binding.lock().expect(ERR_POISONED_LOCK) = Weak::new();
    }

    /// Returns whether the handle currently resolves to a live pool.
    ///
    /// A handle is unbound after [`detach`][Self::detach], and becomes effectively unbound
    /// when the pool it was attached to is dropped.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner
            .binding
            .lock()
            .expect(ERR_POISONED_LOCK)
            .strong_count()
            > 0
    }
}

impl<M: ManageItem> Clone for Pooled<M> {
    /// Returns another handle to the same item.
    ///
    /// The item is released only once, after every clone has been dropped.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ManageItem> Deref for Pooled<M> {
    type Target = M::Item;

    fn deref(&self) -> &Self::Target {
        self.inner
            .item
            .as_ref()
            .expect("item is present until the last handle is dropped")
    }
}

impl<M: ManageItem> Drop for PooledInner<M> {
    /// The release protocol. `Arc` guarantees this runs exactly once, with no other party
    /// able to observe the item, so the decision window is single-owner by construction.
    fn drop(&mut self) {
        let Some(item) = self.item.take() else {
            return;
        };

        // No clone of the handle exists anymore, so the binding cannot be contended;
        // `get_mut` borrows it without locking. The slot holds a single `Weak` and cannot
        // be left torn, so it remains usable even if the lock was poisoned. Release must
        // not fail.
        let binding = match self.binding.get_mut() {
            Ok(weak) => mem::take(weak),
            Err(poisoned) => mem::take(poisoned.into_inner()),
        };

        if let Some(pool) = binding.upgrade() {
            pool.reclaim(item);
        } else {
            trace!("released item has no live pool, destroying");
            drop(item);
        }
    }
}

impl<M: ManageItem> fmt::Debug for Pooled<M>
where
    M::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("item", &**self)
            .field("is_bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    struct ManageNumbers;

    impl ManageItem for ManageNumbers {
        type Item = u64;
        type Error = Infallible;

        fn create(&self) -> Result<u64, Self::Error> {
            Ok(7)
        }
    }

    #[test]
    fn deref_reaches_the_item() {
        let pool = RecyclePool::new(ManageNumbers);
        let number = pool.get().unwrap();

        assert_eq!(*number, 7);
    }

    #[test]
    fn unbound_handle_destroys_item_on_release() {
        let handle: Pooled<ManageNumbers> = Pooled::unbound(3);

        assert!(!handle.is_bound());
        drop(handle);
        // Nothing to observe: the item simply ceased to exist without a pool involved.
    }

    #[test]
    fn attach_routes_release_into_pool() {
        let pool = RecyclePool::new(ManageNumbers);
        let handle: Pooled<ManageNumbers> = Pooled::unbound(3);

        handle.attach(&pool);
        assert!(handle.is_bound());

        drop(handle);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn detach_prevents_return() {
        let pool = RecyclePool::new(ManageNumbers);
        let handle = pool.get().unwrap();

        handle.detach();
        assert!(!handle.is_bound());

        drop(handle);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn detach_affects_every_clone() {
        let pool = RecyclePool::new(ManageNumbers);
        let handle = pool.get().unwrap();
        let clone = handle.clone();

        handle.detach();
        drop(handle);
        drop(clone);

        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn binding_does_not_keep_pool_alive() {
        let pool = RecyclePool::new(ManageNumbers);
        let handle = pool.get().unwrap();

        assert!(handle.is_bound());
        drop(pool);
        assert!(!handle.is_bound());

        // Releasing after the pool is gone destroys the item without incident.
        drop(handle);
    }

    #[test]
    fn reattach_moves_binding_between_pools() {
        let first = RecyclePool::new(ManageNumbers);
        let second = RecyclePool::new(ManageNumbers);

        let handle = first.get().unwrap();
        handle.attach(&second);

        drop(handle);
        assert_eq!(first.len(), 0);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn debug_output_includes_item() {
        let pool = RecyclePool::new(ManageNumbers);
        let handle = pool.get().unwrap();

        let rendered = format!("{handle:?}");
        assert!(rendered.contains("item: 7"));
        assert!(rendered.contains("is_bound: true"));
    }
}
