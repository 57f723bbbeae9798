use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use probe_hash::BitMix;
use probe_hash::HashMap as ProbeHashMap;
use probe_hash::KeyHasher;
use probe_hash::Nullable;
use probe_hash::OrderMode;
use probe_hash::OrderedMap;
use probe_hash::SlotRepr;
use probe_hash::ZeroSentinel;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

#[derive(Clone, Copy)]
struct SipHashBuilder {
    k1: u64,
    k2: u64,
}

impl BuildHasher for SipHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

impl Default for SipHashBuilder {
    fn default() -> Self {
        let mut rng = OsRng;
        Self {
            k1: rng.try_next_u64().unwrap_or(0),
            k2: rng.try_next_u64().unwrap_or(0),
        }
    }
}

/// A key type together with the slot representation and hashing strategy a
/// probe-hash map would use for it.
trait BenchKey: Clone + Hash + Eq {
    type Repr: SlotRepr<Self, Slot: Clone>;
    type Strategy: KeyHasher<Self> + Default + Clone;

    fn new(seed: u64) -> Self;
}

impl BenchKey for u64 {
    type Repr = ZeroSentinel;
    type Strategy = BitMix;

    fn new(seed: u64) -> Self {
        black_box(seed)
    }
}

impl BenchKey for String {
    type Repr = Nullable;
    type Strategy = SipHashBuilder;

    fn new(seed: u64) -> Self {
        black_box(format!("key_{seed:016X}"))
    }
}

type ProbeMap<K> = ProbeHashMap<K, u64, <K as BenchKey>::Repr, <K as BenchKey>::Strategy>;
type ProbeOrderedMap<K> = OrderedMap<K, u64, <K as BenchKey>::Repr, <K as BenchKey>::Strategy>;
type BrownMap<K> = hashbrown::HashMap<K, u64, SipHashBuilder>;

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap_or(0)))
        .collect()
}

fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    items.shuffle(&mut SmallRng::from_os_rng());
    items
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = ProbeMap::<K>::with_capacity(0);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = BrownMap::<K>::with_capacity_and_hasher(0, SipHashBuilder::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let misses = random_keys::<K>(size);
        let lookups: Vec<K> = keys.iter().chain(misses.iter()).cloned().collect();

        let mut probe = ProbeMap::<K>::with_capacity(0);
        let mut brown = BrownMap::<K>::with_capacity_and_hasher(0, SipHashBuilder::default());
        for (i, key) in keys.iter().enumerate() {
            probe.insert(key.clone(), i as u64);
            brown.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(lookups.len() as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || shuffled(&lookups),
                |lookups| {
                    for key in &lookups {
                        black_box(probe.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&lookups),
                |lookups| {
                    for key in &lookups {
                        black_box(brown.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let probe: ProbeMap<K> = keys
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, k)| (k, i as u64))
            .collect();
        let mut brown = BrownMap::<K>::with_capacity_and_hasher(size, SipHashBuilder::default());
        for (i, key) in keys.iter().enumerate() {
            brown.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || (probe.clone(), shuffled(&keys)),
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || (brown.clone(), shuffled(&keys)),
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let probe: ProbeMap<K> = keys
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, k)| (k, i as u64))
            .collect();
        let ordered: ProbeOrderedMap<K> = keys
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, k)| (k, i as u64))
            .collect();
        let mut brown = BrownMap::<K>::with_capacity_and_hasher(size, SipHashBuilder::default());
        for (i, key) in keys.iter().enumerate() {
            brown.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| black_box(probe.values().sum::<u64>()))
        });
        group.bench_function(format!("probe_hash_ordered/{size}"), |b| {
            b.iter(|| black_box(ordered.values().sum::<u64>()))
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(brown.values().sum::<u64>()))
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn bench_mixed_probabilistic_zipf<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_zipf_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let operations = (0..size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                if op_choice < 0.5 {
                    Operation::Find
                } else if op_choice < 0.75 {
                    Operation::Insert
                } else {
                    Operation::Remove
                }
            })
            .collect::<Vec<Operation>>();

        let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
        let find_remove_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();
        let insert_keys: Vec<K> = (0..operations.len())
            .map(|_| K::new(rng.sample(insert_distr) as u64))
            .collect();
        let other_keys: Vec<K> = (0..operations.len())
            .map(|_| K::new(rng.sample(find_remove_distr) as u64))
            .collect();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                let mut map = ProbeMap::<K>::with_capacity(0);
                for (i, operation) in operations.iter().enumerate() {
                    match operation {
                        Operation::Insert => {
                            black_box(map.insert(insert_keys[i].clone(), i as u64));
                        }
                        Operation::Remove => {
                            black_box(map.remove(&other_keys[i]));
                        }
                        Operation::Find => {
                            black_box(map.get(&other_keys[i]));
                        }
                    }
                }
                black_box(map)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut map = BrownMap::<K>::with_capacity_and_hasher(0, SipHashBuilder::default());
                for (i, operation) in operations.iter().enumerate() {
                    match operation {
                        Operation::Insert => {
                            black_box(map.insert(insert_keys[i].clone(), i as u64));
                        }
                        Operation::Remove => {
                            black_box(map.remove(&other_keys[i]));
                        }
                        Operation::Find => {
                            black_box(map.get(&other_keys[i]));
                        }
                    }
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn bench_ordered_churn<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("ordered_churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64 * 2));

        for (name, mode) in [("list", OrderMode::List), ("bag", OrderMode::Bag)] {
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter_batched(
                    || shuffled(&keys),
                    |removals| {
                        let mut map = ProbeOrderedMap::<K>::with_mode(mode);
                        for (i, key) in keys.iter().enumerate() {
                            map.insert(key.clone(), i as u64);
                        }
                        for key in &removals {
                            black_box(map.remove(key));
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 4>,
    bench_insert_random::<String, 3>,
    bench_find_hit_miss::<u64, 4>,
    bench_find_hit_miss::<String, 3>,
    bench_remove::<u64, 4>,
    bench_remove::<String, 3>,
    bench_iteration::<u64, 4>,
    bench_iteration::<String, 3>,
    bench_mixed_probabilistic_zipf::<u64, 4>,
    bench_mixed_probabilistic_zipf::<String, 3>,
    bench_ordered_churn::<u64, 1>,
    bench_ordered_churn::<String, 1>,
);

criterion_main!(benches);
