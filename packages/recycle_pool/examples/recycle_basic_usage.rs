//! Example demonstrating basic usage of `RecyclePool` with drop-driven reclamation.
//!
//! Expensive-to-construct connections are built once and recycled across uses; a
//! connection that goes unhealthy is screened out instead of reused.

use recycle_pool::{ManageItem, RecyclePool};

struct Connection {
    id: u32,
    healthy: bool,
}

struct ManageConnections;

impl ManageItem for ManageConnections {
    type Item = Connection;
    type Error = std::io::Error;

    fn create(&self) -> Result<Connection, Self::Error> {
        static NEXT_ID: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(1);

        let id = NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        println!("(constructing connection {id})");

        Ok(Connection { id, healthy: true })
    }

    fn is_valid(&self, connection: &Connection) -> bool {
        connection.healthy
    }
}

fn main() -> Result<(), std::io::Error> {
    println!("=== RecyclePool: Drop-driven Reuse ===");

    let pool = RecyclePool::new(ManageConnections);

    // The pool starts empty, so the first get constructs.
    let connection = pool.get()?;
    println!("using connection {}", connection.id);

    // Dropping the handle returns the connection to the pool.
    drop(connection);
    println!("idle connections: {}", pool.len());

    // The next get reuses it; no construction happens here.
    let reused = pool.get()?;
    println!("reusing connection {}", reused.id);
    drop(reused);

    // Share the pool across threads by cloning the handle.
    let pool_clone = pool.clone();
    std::thread::spawn(move || {
        let from_thread = pool_clone.get().expect("connections are constructible");
        println!("from thread: connection {}", from_thread.id);
    })
    .join()
    .unwrap();

    // Periodic housekeeping: drop idle connections that have gone bad.
    pool.erase_invalid();
    println!("idle connections after sweep: {}", pool.len());

    Ok(())
}
