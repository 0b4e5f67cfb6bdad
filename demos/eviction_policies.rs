//! Runs the same access pattern against each built-in policy and prints which
//! keys survive.
//!
//! ```sh
//! RUST_LOG=policy_cache=debug cargo run --example eviction_policies
//! ```

use policy_cache::{Cache, CacheError, CacheMetrics, Policy};
use std::num::NonZeroUsize;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn run(policy: Policy<u32>) -> Result<(), CacheError> {
    let cache = Cache::with_policy(NonZeroUsize::new(3).unwrap(), policy);

    cache.add("alpha", 1)?;
    cache.add("beta", 2)?;
    cache.add("gamma", 3)?;

    // alpha is popular, beta is read once, gamma is never read again
    for _ in 0..3 {
        cache.get("alpha")?;
    }
    cache.get("beta")?;

    cache.add("delta", 4)?;
    cache.add("epsilon", 5)?;

    info!(
        policy = cache.policy_name(),
        survivors = ?cache.keys(),
        "workload finished"
    );
    println!("{:>5}: {:?}", cache.policy_name(), cache.keys());
    for (name, value) in cache.metrics() {
        println!("         {name:<14} {value}");
    }
    Ok(())
}

fn main() -> Result<(), CacheError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    for policy in [Policy::Lru, Policy::Fifo, Policy::Lfu] {
        run(policy)?;
    }
    Ok(())
}
