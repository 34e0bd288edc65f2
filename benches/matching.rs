use criterion::{Criterion, criterion_group, criterion_main};
use faq_bot::intents::{IntentTable, clean_text};
use faq_bot::retrieval::FlatL2Index;
use std::hint::black_box;

const MESSAGES: &[&str] = &[
    "Hi!! What are the &quot;fees&quot; for B.Tech? See https://college.edu.in/fees",
    "When do the semester exams start &amp; end?",
    "விடுதி பற்றி சொல்லுங்கள்",
    "Is there any bus from the railway station???",
    "hello there, how are you",
];

/// Deterministic pseudo-embeddings so runs are comparable
fn vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|i| {
            (0..dimension)
                .map(|d| ((i * 31 + d * 17) % 97) as f32 / 97.0)
                .collect()
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("clean_text", |b| {
        b.iter(|| {
            for message in MESSAGES {
                black_box(clean_text(black_box(message)));
            }
        })
    });

    let intents = IntentTable::builtin().expect("builtin intents load");
    let cleaned: Vec<String> = MESSAGES.iter().map(|m| clean_text(m)).collect();
    c.bench_function("match_intent", |b| {
        b.iter(|| {
            for message in &cleaned {
                black_box(intents.match_intent(black_box(message)));
            }
        })
    });

    let index = FlatL2Index::from_vectors(vectors(1000, 384)).expect("index builds");
    let query = vectors(1, 384).remove(0);
    c.bench_function("flat_l2_nearest_1000x384", |b| {
        b.iter(|| index.nearest(black_box(&query)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
