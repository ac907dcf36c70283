//! This package provides [`RecyclePool`], a thread-safe pool of reusable,
//! expensive-to-construct items that are reclaimed automatically when the last handle to
//! them is dropped.
//!
//! Callers obtain an item, use it, and release it by simply letting their [`Pooled`] handle
//! expire. A released item that still passes validation is recycled to future callers
//! instead of being destroyed and reconstructed.
//!
//! # Features
//!
//! - **Drop-driven reclamation**: no explicit return call; releasing the last handle runs
//!   the release protocol, which never fails.
//! - **Validation before reuse**: a per-resource-type validity hook screens items when they
//!   are pulled for reuse, when they are returned, and during explicit
//!   [`erase_invalid`][RecyclePool::erase_invalid] sweeps.
//! - **Decoupled lifetimes**: items hold only a weak association to their pool, so the pool
//!   can be dropped while items are checked out; such items are destroyed on release
//!   instead of returned.
//! - **LIFO reuse**: the most recently returned item is served first.
//! - **No capacity bound, no waiting**: [`get`][RecyclePool::get] always completes, falling
//!   back to construction when nothing idle is reusable.
//! - **Lock scoped to bookkeeping**: item construction and destruction never run under the
//!   pool's lock.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::{ManageItem, RecyclePool};
//!
//! struct Connection {
//!     healthy: bool,
//! }
//!
//! struct ManageConnections;
//!
//! impl ManageItem for ManageConnections {
//!     type Item = Connection;
//!     type Error = std::io::Error;
//!
//!     fn create(&self) -> Result<Connection, Self::Error> {
//!         Ok(Connection { healthy: true })
//!     }
//!
//!     fn is_valid(&self, connection: &Connection) -> bool {
//!         connection.healthy
//!     }
//! }
//!
//! let pool = RecyclePool::new(ManageConnections);
//!
//! let connection = pool.get()?; // pool starts empty: constructs
//! assert!(connection.healthy);
//!
//! drop(connection); // passes validation: recycled
//! assert_eq!(pool.len(), 1);
//!
//! let reused = pool.get()?; // served from the pool, no construction
//! assert_eq!(pool.len(), 0);
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! Items created outside the pool's factory can be placed under pool management, and
//! pool-created items can be withdrawn from it:
//!
//! ```rust
//! use recycle_pool::{ManageItem, Pooled, RecyclePool};
//!
//! struct ManageBuffers;
//!
//! impl ManageItem for ManageBuffers {
//!     type Item = Vec<u8>;
//!     type Error = std::convert::Infallible;
//!
//!     fn create(&self) -> Result<Self::Item, Self::Error> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let pool = RecyclePool::new(ManageBuffers);
//!
//! // Adopt a foreign buffer: it is returned to the pool on release.
//! let adopted: Pooled<ManageBuffers> = Pooled::unbound(vec![1, 2, 3]);
//! adopted.attach(&pool);
//! drop(adopted);
//! assert_eq!(pool.len(), 1);
//!
//! // Withdraw an item: release destroys it even though the pool is alive.
//! let withdrawn = pool.get()?;
//! withdrawn.detach();
//! drop(withdrawn);
//! assert_eq!(pool.len(), 0);
//! # Ok::<(), std::convert::Infallible>(())
//! ```

mod constants;
mod manage;
mod pool;
mod pooled;

pub use manage::*;
pub use pool::*;
pub use pooled::*;
