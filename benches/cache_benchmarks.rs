// Mixed-workload benchmarks for each eviction policy
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use policy_cache::{Cache, Policy};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

// Benchmark configuration
const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;
const THREADS: usize = 4;

fn make_cache(cap: usize, policy: Policy<usize>) -> Cache<usize> {
    Cache::with_policy(NonZeroUsize::new(cap).unwrap(), policy)
}

// Simple linear congruential generator for reproducible benchmarks
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fffffff;
        self.state
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (0x7fffffff as f64)
    }
}

// Zipf-like key popularity, so the cache has a hot set worth protecting
fn zipf_sample(n: usize, skew: f64) -> Vec<usize> {
    let mut rng = SimpleRng::new(42);

    let mut norm: f64 = 0.0;
    for i in 1..=n {
        norm += 1.0 / (i as f64).powf(skew);
    }

    let mut samples = Vec::with_capacity(NUM_OPERATIONS);
    for _ in 0..NUM_OPERATIONS {
        let u: f64 = rng.next_f64();
        let mut sum: f64 = 0.0;
        let mut sample: usize = 1;

        while sample <= n {
            sum += 1.0 / (sample as f64).powf(skew) / norm;
            if sum >= u {
                break;
            }
            sample += 1;
        }

        samples.push(sample.saturating_sub(1) % n);
    }

    samples
}

fn policies() -> [(&'static str, Policy<usize>); 3] {
    [("LRU", Policy::Lru), ("FIFO", Policy::Fifo), ("LFU", Policy::Lfu)]
}

fn run_mixed(cache: &Cache<usize>, samples: &[usize], keys: &[String]) {
    for &idx in samples {
        let key = &keys[idx];
        if idx % 4 == 0 {
            // 25% adds, falling back to update for cached keys
            if cache.add(key.as_str(), idx).is_err() {
                black_box(cache.update(key, idx).is_ok());
            }
        } else {
            // 75% gets
            black_box(cache.get(key).ok());
        }
    }
}

fn benchmark_policies(c: &mut Criterion) {
    let samples = zipf_sample(CACHE_SIZE * 2, 0.8);
    let keys: Vec<String> = (0..CACHE_SIZE * 2).map(|i| format!("key-{i}")).collect();

    let mut group = c.benchmark_group("Cache Mixed Access");
    group.throughput(Throughput::Elements(NUM_OPERATIONS as u64));

    for (name, policy) in policies() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let cache = make_cache(CACHE_SIZE, policy.clone());
                run_mixed(&cache, &samples, &keys);
            });
        });
    }

    group.finish();
}

fn benchmark_contended(c: &mut Criterion) {
    let samples = Arc::new(zipf_sample(CACHE_SIZE * 2, 0.8));
    let keys: Arc<Vec<String>> =
        Arc::new((0..CACHE_SIZE * 2).map(|i| format!("key-{i}")).collect());

    let mut group = c.benchmark_group("Cache Contended Access");
    group.throughput(Throughput::Elements((NUM_OPERATIONS * THREADS) as u64));
    group.sample_size(20);

    for (name, policy) in policies() {
        group.bench_with_input(BenchmarkId::new(name, THREADS), &THREADS, |b, &threads| {
            b.iter(|| {
                let cache = Arc::new(make_cache(CACHE_SIZE, policy.clone()));
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let cache = Arc::clone(&cache);
                        let samples = Arc::clone(&samples);
                        let keys = Arc::clone(&keys);
                        thread::spawn(move || run_mixed(&cache, &samples, &keys))
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_policies, benchmark_contended);
criterion_main!(benches);
