// Merkle engine benchmarks.
//
// Covers leaf hashing, tree construction, proof generation, and proof
// verification at allowlist sizes from a handful of investors up to a
// large airdrop.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigUint;

use vesting_merkle::crypto::{hash_pair, keccak256};
use vesting_merkle::merkle::{verify, MerkleTree};
use vesting_merkle::{Address, Entry};

/// `n` entries with distinct addresses derived from their index.
fn entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| {
            let digest = keccak256(&(i as u64).to_be_bytes());
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&digest[..20]);
            Entry::new(Address::from_bytes(bytes), BigUint::from(i as u64 + 1) * 1_000u32)
                .unwrap()
        })
        .collect()
}

fn leaves(n: usize) -> Vec<[u8; 32]> {
    entries(n).iter().map(Entry::leaf_hash).collect()
}

fn bench_leaf_hash(c: &mut Criterion) {
    let entry = entries(1).remove(0);
    c.bench_function("keccak/leaf_hash", |b| {
        b.iter(|| entry.leaf_hash());
    });
}

fn bench_hash_pair(c: &mut Criterion) {
    let left = keccak256(b"left");
    let right = keccak256(b"right");
    c.bench_function("keccak/hash_pair", |b| {
        b.iter(|| hash_pair(&left, &right));
    });
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle/build");

    for size in [16, 256, 4_096, 65_536] {
        let input = leaves(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| MerkleTree::build(input.clone()).unwrap());
        });
    }

    group.finish();
}

fn bench_proof(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle/proof");

    for size in [256, 65_536] {
        let tree = MerkleTree::build(leaves(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| tree.proof(size / 3).unwrap());
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle/verify");

    for size in [256, 65_536] {
        let input = leaves(size);
        let index = size / 3;
        let tree = MerkleTree::build(input.clone()).unwrap();
        let proof = tree.proof(index).unwrap();
        let root = tree.root();

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| verify(&root, &input[index], &proof));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_leaf_hash,
    bench_hash_pair,
    bench_build,
    bench_proof,
    bench_verify,
);
criterion_main!(benches);
