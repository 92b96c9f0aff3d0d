use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use crossbeam_utils::thread;
use memkv::{KvsEngine, LockedKvStore, ShardedKvStore};
use rand::prelude::*;

const KEYS: usize = 1000;
const WRITERS: usize = 8;

fn filled<E: KvsEngine>(store: E) -> E {
    for i in 0..KEYS {
        store.put(format!("key{}", i), "value".to_string()).unwrap();
    }
    store
}

fn write_all<E: KvsEngine>(store: &E) {
    for i in 0..KEYS {
        store.put(format!("key{}", i), "value".to_string()).unwrap();
    }
}

fn read_random<E: KvsEngine>(store: &E) {
    let mut rng = thread_rng();
    for _ in 0..KEYS {
        let key = format!("key{}", rng.gen_range(0..KEYS));
        store.get(&key).unwrap();
    }
}

fn write_parallel<E: KvsEngine>(store: &E) {
    thread::scope(|s| {
        for w in 0..WRITERS {
            let store = store.clone();
            s.spawn(move |_| {
                for i in 0..KEYS / WRITERS {
                    store
                        .put(format!("w{}-key{}", w, i), "value".to_string())
                        .unwrap();
                }
            });
        }
    })
    .unwrap();
}

fn write_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    group.bench_function("sharded", |b| {
        b.iter_batched(ShardedKvStore::new, |store| write_all(&store), BatchSize::SmallInput);
    });

    group.bench_function("locked", |b| {
        b.iter_batched(LockedKvStore::new, |store| write_all(&store), BatchSize::SmallInput);
    });

    group.finish();
}

fn read_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    let sharded = filled(ShardedKvStore::new());
    group.bench_function("sharded", |b| b.iter(|| read_random(&sharded)));

    let locked = filled(LockedKvStore::new());
    group.bench_function("locked", |b| b.iter(|| read_random(&locked)));

    group.finish();
}

fn parallel_write_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_write");

    group.bench_function("sharded", |b| {
        b.iter_batched(
            ShardedKvStore::new,
            |store| write_parallel(&store),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("locked", |b| {
        b.iter_batched(
            LockedKvStore::new,
            |store| write_parallel(&store),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, write_bench, read_bench, parallel_write_bench);
criterion_main!(benches);
