use std::collections::hash_map::RandomState;

use clap::Parser;
use clap::ValueEnum;
use probe_hash::BitMix;
use probe_hash::HashTable;
use probe_hash::Nullable;
use probe_hash::ZeroSentinel;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Keys {
    /// Consecutive integers hashed by their bits.
    Sequential,
    /// Integers spaced a power of two apart, hashed by their bits.
    Strided,
    /// Formatted strings hashed with std's SipHash.
    Strings,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = probe_hash::DEFAULT_LOAD_FACTOR)]
    load_factor: f32,

    #[arg(short = 'k', long = "keys", value_enum, default_value_t = Keys::Sequential)]
    keys: Keys,

    /// Remove every other key after filling, to show backward-shift deletion.
    #[arg(long = "churn")]
    churn: bool,
}

fn report<K, V, R, S>(table: &HashTable<K, V, R, S>)
where
    R: probe_hash::SlotRepr<K>,
    S: probe_hash::KeyHasher<K>,
{
    println!("Inserted {} values into table", table.len());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );
    table.probe_histogram().print();
    table.debug_stats().print();
}

fn fill_integers(args: &Args, stride: u64) {
    let mut table: HashTable<u64, u64, ZeroSentinel, BitMix> =
        HashTable::with_capacity_and_hasher(args.target_capacity, args.load_factor, BitMix);
    println!("Actual capacity: {}", table.capacity());

    let count = table.threshold() as u64;
    println!("Filling table with {count} u64 keys (stride {stride})...");
    for i in 0..count {
        table.insert(i * stride, i);
    }

    if args.churn {
        table.retain(|&k, _| (k / stride) % 2 == 0);
    }
    report(&table);
}

fn fill_strings(args: &Args) {
    let mut table: HashTable<String, usize, Nullable, RandomState> =
        HashTable::with_capacity_and_hasher(
            args.target_capacity,
            args.load_factor,
            RandomState::new(),
        );
    println!("Actual capacity: {}", table.capacity());

    let count = table.threshold();
    println!("Filling table with {count} string keys...");
    for i in 0..count {
        table.insert(format!("key_{i:08}"), i);
    }

    if args.churn {
        table.retain(|_, &mut i| i % 2 == 0);
    }
    report(&table);
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {} and load factor {}",
        args.target_capacity, args.load_factor
    );

    match args.keys {
        Keys::Sequential => fill_integers(&args, 1),
        Keys::Strided => fill_integers(&args, 1 << 16),
        Keys::Strings => fill_strings(&args),
    }
}
