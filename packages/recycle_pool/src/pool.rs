use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, trace};

use crate::constants::ERR_POISONED_LOCK;
use crate::{ManageItem, Pooled};

/// A thread-safe pool of reusable items that are reclaimed automatically when the last
/// handle to them is dropped.
///
/// The pool is constructed with a [`ManageItem`] strategy that knows how to build a new item
/// and how to tell whether a used item is still fit for reuse. Callers obtain items via
/// [`get`][Self::get] (reuse an idle item if possible) or [`create`][Self::create] (always
/// construct), and return them by simply dropping the [`Pooled`] handle. Returned items that
/// pass validation are served again to later callers, most recently returned first.
///
/// This type acts as a cloneable handle to a shared pool instance. Items keep only a weak
/// association back to that instance, so dropping every pool handle is always possible even
/// while items are checked out; such items are destroyed instead of returned when their
/// handles are eventually dropped.
///
/// There is no capacity bound and no waiting: [`get`][Self::get] always completes, falling
/// back to construction when nothing idle is fit for reuse.
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
///         Ok(Vec::with_capacity(4096))
///     }
/// }
///
/// let pool = RecyclePool::new(ManageBuffers);
///
/// let buffer = pool.get()?; // pool is empty: constructs
/// assert_eq!(pool.len(), 0);
///
/// drop(buffer); // reclaimed into the pool
/// assert_eq!(pool.len(), 1);
///
/// let reused = pool.get()?; // served from storage, no construction
/// assert_eq!(pool.len(), 0);
/// # Ok::<(), std::convert::Infallible>(())
/// ```
pub struct RecyclePool<M: ManageItem> {
    inner: Arc<PoolInner<M>>,
}

/// The shared pool state. Item handles hold a `Weak` reference to this, which is what allows
/// the pool to be dropped while items are still checked out.
pub(crate) struct PoolInner<M: ManageItem> {
    manager: M,

    /// Idle items awaiting reuse. Insertion order is return order; the most recently
    /// returned item is served first.
    storage: Mutex<Vec<M::Item>>,
}

impl<M: ManageItem> RecyclePool<M> {
    /// Creates a new, empty pool driven by the given manager.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{ManageItem, RecyclePool};
    ///
    /// struct ManageStrings;
    ///
    /// impl ManageItem for ManageStrings {
    ///     type Item = String;
    ///     type Error = std::convert::Infallible;
    ///
    ///     fn create(&self) -> Result<String, Self::Error> {
    ///         Ok(String::new())
    ///     }
    /// }
    ///
    /// let pool = RecyclePool::new(ManageStrings);
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn new(manager: M) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                manager,
                storage: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Constructs a new item via the manager and returns it wrapped in a handle bound to
    /// this pool.
    ///
    /// Idle items are never consulted; this always invokes the factory. If construction
    /// fails, the error is returned unchanged and the pool is not modified.
    ///
    /// # Errors
    ///
    /// Returns the manager's error when item construction fails.
    pub fn create(&self) -> Result<Pooled<M>, M::Error> {
        let item = self.inner.manager.create()?;
        trace!("constructed new item");
        Ok(Pooled::bound(item, &self.inner))
    }

    /// Returns a reused idle item if one passes validation, falling back to
    /// [`create`][Self::create] otherwise.
    ///
    /// Idle items are tried most recently returned first. Each candidate is popped under the
    /// lock (one pop per acquisition) and validated outside it; candidates that fail
    /// validation are destroyed immediately and never reinserted. The scan has no iteration
    /// cap: when every idle item is stale, one call performs a full linear pass before
    /// constructing.
    ///
    /// # Errors
    ///
    /// Returns the manager's error when no idle item was fit for reuse and the fallback
    /// construction fails.
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
    ///         Ok(Vec::new())
    ///     }
    /// }
    ///
    /// let pool = RecyclePool::new(ManageBuffers);
    ///
    /// let first = pool.get()?;
    /// drop(first);
    ///
    /// // The released buffer is reused rather than constructed anew.
    /// let second = pool.get()?;
    /// assert!(pool.is_empty());
    /// # Ok::<(), std::convert::Infallible>(())
    /// ```
    pub fn get(&self) -> Result<Pooled<M>, M::Error> {
        while let Some(item) = self.pop_idle() {
            if self.inner.manager.is_valid(&item) {
                trace!("reusing idle item");
                return Ok(Pooled::bound(item, &self.inner));
            }

            // Stale candidates are destroyed, never reinserted or reordered.
            trace!("discarding invalid idle item");
            drop(item);
        }

        self.create()
    }

    /// Removes every idle item that fails validation.
    ///
    /// Storage is partitioned under the lock; surviving items keep their order. The removed
    /// items are destroyed only after the lock has been released, so slow item destructors,
    /// or destructors that re-enter pool operations, cannot stall or deadlock other threads.
    ///
    /// Calling this again without intervening mutation removes nothing further.
    pub fn erase_invalid(&self) {
        let doomed = {
            let mut storage = self.inner.storage.lock().expect(ERR_POISONED_LOCK);

            let (kept, doomed): (Vec<_>, Vec<_>) = mem::take(&mut *storage)
                .into_iter()
                .partition(|item| self.inner.manager.is_valid(item));

            *storage = kept;
            doomed
        };

        if !doomed.is_empty() {
            debug!(removed = doomed.len(), "sweep removed invalid idle items");
        }

        drop(doomed);
    }

    /// Returns the number of idle items currently held for reuse.
    ///
    /// Checked-out items are not counted; they are owned by their handles, not the pool.
    ///
    /// This operation may block briefly if another thread is currently mutating storage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.storage.lock().expect(ERR_POISONED_LOCK).len()
    }

    /// Returns whether the pool currently holds no idle items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.storage.lock().expect(ERR_POISONED_LOCK).is_empty()
    }

    fn pop_idle(&self) -> Option<M::Item> {
        self.inner.storage.lock().expect(ERR_POISONED_LOCK).pop()
    }

    pub(crate) fn downgrade(&self) -> Weak<PoolInner<M>> {
        Arc::downgrade(&self.inner)
    }
}

impl<M: ManageItem> PoolInner<M> {
    /// Accepts a released item back into storage if it still passes validation.
    ///
    /// This is the release path, called from the handle's drop, so it must not fail: an
    /// invalid item is silently destroyed (outside the lock), and a poisoned lock panics
    /// with [`ERR_POISONED_LOCK`], which during unwind terminates the process. Callers rely
    /// on release never producing a recoverable error.
    pub(crate) fn reclaim(&self, item: M::Item) {
        if !self.manager.is_valid(&item) {
            trace!("discarding invalid item on release");
            return;
        }

        self.storage.lock().expect(ERR_POISONED_LOCK).push(item);
        trace!("recycled item into storage");
    }
}

impl<M: ManageItem> Clone for RecyclePool<M> {
    /// Returns another handle to the same shared pool.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ManageItem> fmt::Debug for RecyclePool<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclePool")
            .field("idle", &self.len())
            .finish_non_exhaustive()
    }
}
