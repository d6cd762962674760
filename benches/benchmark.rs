use collab_recommender::{MemoryVoteStore, Recommender, RecommenderConfig};
use criterion::{criterion_group, criterion_main, Criterion};

/// tiny deterministic PRNG (xorshift32)
struct Rng(u32);

impl Rng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

fn build_store(users: u32, items: u32, votes_per_user: u32) -> MemoryVoteStore<u32, u32, f32> {
    let store = MemoryVoteStore::new();
    let mut rng = Rng(0x1234_5678);
    for u in 0..users {
        store.register_subject(u);
        for _ in 0..votes_per_user {
            let item = rng.next_u32() % items;
            let score = (rng.next_u32() % 5 + 1) as f32;
            store.record_vote(&u, &item, score);
        }
    }
    for i in 0..items {
        store.register_object(i);
    }
    store
}

fn recommend_benchmark(c: &mut Criterion) {
    let users: Vec<u32> = (0..500).collect();
    let items: Vec<u32> = (0..200).collect();
    let store = build_store(500, 200, 40);

    let seq = Recommender::new(&store, &store);
    let par = Recommender::with_config(&store, &store, RecommenderConfig::default().with_parallel(true));

    c.bench_function("preference_matrix", |b| {
        b.iter(|| seq.preference_matrix(&users, &items))
    });

    c.bench_function("best_items_for_user", |b| {
        b.iter(|| seq.best_items_for_user(&users[0], &users, &items))
    });

    c.bench_function("best_items_for_user_par", |b| {
        b.iter(|| par.best_items_for_user(&users[0], &users, &items))
    });

    c.bench_function("similar_items", |b| {
        b.iter(|| seq.similar_items(&items[0], &users, &items))
    });
}

criterion_group!(benches, recommend_benchmark);
criterion_main!(benches);
