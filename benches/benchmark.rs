use category_dictionary::{Classifier, CorrelationMatrix, DictionaryClassifier, FastWordCorrelationMatrix, Instance, WordCorrelationMatrix};
use criterion::{criterion_group, criterion_main, Criterion};

const CATEGORIES: [&str; 4] = ["sports", "politics", "music", "science"];

/// Deterministic corpus: every category draws most of its terms from its own
/// vocabulary block and some from a shared one.
fn synthetic_instances(documents: usize, terms_per_document: usize) -> Vec<Instance> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..documents)
        .map(|i| {
            let category = CATEGORIES[i % CATEGORIES.len()];
            let terms: Vec<String> = (0..terms_per_document)
                .map(|_| {
                    let r = next();
                    if r % 4 == 0 {
                        format!("shared{}", r % 500)
                    } else {
                        format!("{category}{}", r % 2000)
                    }
                })
                .collect();
            Instance::new(terms, category)
        })
        .collect()
}

fn train_and_classify_benchmark(c: &mut Criterion) {
    let instances = synthetic_instances(2000, 50);
    let classifier = DictionaryClassifier::default();

    c.bench_function("train", |b| {
        b.iter(|| classifier.train(&instances));
    });

    let Ok(model) = classifier.train(&instances) else {
        return;
    };
    let queries: Vec<Vec<String>> = instances.iter().take(500).map(|i| i.terms.clone()).collect();

    c.bench_function("classify", |b| {
        b.iter(|| {
            queries
                .iter()
                .map(|q| classifier.classify(q, &model))
                .count()
        });
    });

    c.bench_function("classify_batch", |b| {
        b.iter(|| classifier.classify_batch(&queries, &model));
    });
}

fn correlation_benchmark(c: &mut Criterion) {
    let instances = synthetic_instances(500, 20);

    c.bench_function("wcm_flat", |b| {
        b.iter(|| {
            let mut matrix = WordCorrelationMatrix::new();
            for instance in &instances {
                matrix.update_group(&instance.terms);
            }
            matrix.make_relative_scores();
            matrix.top_correlations("shared1", 10).len()
        });
    });

    c.bench_function("wcm_fast", |b| {
        b.iter(|| {
            let mut matrix = FastWordCorrelationMatrix::new();
            for instance in &instances {
                matrix.update_group(&instance.terms);
            }
            matrix.make_relative_scores();
            matrix.top_correlations("shared1", 10).len()
        });
    });
}

criterion_group!(benches, train_and_classify_benchmark, correlation_benchmark);
criterion_main!(benches);
