use criterion::{criterion_group, criterion_main, Criterion};
use moodknn::{Catalog, MovieRecord, UserQuery};

fn recommend_benchmark(c: &mut Criterion) {
    let movies = (0..2000)
        .map(|i| {
            MovieRecord::new(i.to_string(), format!("movie {i}"))
                .with_hue((i % 360) as f64)
                .with_tempo((i % 100) as f64 / 100.0)
                .with_edge((i % 7) as f64 / 7.0)
                .with_tags(if i % 3 == 0 { vec!["cozy", "romantic"] } else { vec!["gritty"] })
        })
        .collect();
    let catalog = Catalog::new(movies);
    let euclidean = UserQuery { k: Some(10), ..UserQuery::default() };
    let cosine = UserQuery {
        k: Some(10),
        distance_metric: Some("cosine".into()),
        ..UserQuery::default()
    };
    c.bench_function("recommend 10 euclidean", |b| {
        b.iter(|| catalog.recommend(&euclidean).unwrap())
    });
    c.bench_function("recommend 10 cosine", |b| {
        b.iter(|| catalog.recommend(&cosine).unwrap())
    });
}

criterion_group!(benches, recommend_benchmark);
criterion_main!(benches);
