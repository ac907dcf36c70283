//! Example demonstrating `attach` and `detach`: placing externally-created items under
//! pool management and withdrawing pool items from it.

use recycle_pool::{ManageItem, Pooled, RecyclePool};

struct ManageBuffers;

impl ManageItem for ManageBuffers {
    type Item = Vec<u8>;
    type Error = std::convert::Infallible;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        Ok(Vec::with_capacity(4096))
    }
}

fn main() {
    println!("=== RecyclePool: External Items ===");

    let pool = RecyclePool::new(ManageBuffers);

    // This buffer was not built by the pool's factory, but it can still be pooled.
    let adopted: Pooled<ManageBuffers> = Pooled::unbound(vec![0_u8; 1024]);
    println!("adopted buffer is bound: {}", adopted.is_bound());

    adopted.attach(&pool);
    println!("adopted buffer is bound: {}", adopted.is_bound());

    // On release it lands in the pool like any factory-built item.
    drop(adopted);
    println!("idle buffers: {}", pool.len());

    // The reverse: withdraw an item so its release destroys it instead.
    let withdrawn = pool.get().expect("buffer construction is infallible");
    withdrawn.detach();
    drop(withdrawn);
    println!("idle buffers after withdrawing: {}", pool.len());
}
