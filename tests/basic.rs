use anyhow::Result;
use moodknn::{rank, vectorize, Catalog, Metric, MoodVector, MovieRecord, UserQuery};

fn sample_movies() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new("la-la-land", "La La Land")
            .with_tags(["romantic", "upbeat"])
            .with_hue(50.0)
            .with_tempo(0.7)
            .with_edge(0.4),
        MovieRecord::new("blade-runner-2049", "Blade Runner 2049")
            .with_tags(["gritty", "mysterious", "surreal"])
            .with_hue(220.0)
            .with_tempo(0.35)
            .with_edge(0.75),
        MovieRecord::new("grand-budapest-hotel", "The Grand Budapest Hotel")
            .with_tags(["cozy", "surreal", "dark comedy"])
            .with_hue(310.0)
            .with_tempo(0.6)
            .with_edge(0.3),
        MovieRecord::new("lost-in-translation", "Lost in Translation")
            .with_tags(["melancholic", "romantic"])
            .with_hue(260.0)
            .with_tempo(0.3)
            .with_edge(0.25),
        MovieRecord::new("baby-driver", "Baby Driver")
            .with_tags(["upbeat", "gritty"])
            .with_hue(350.0)
            .with_tempo(0.95)
            .with_edge(0.7),
    ]
}

#[test]
fn vector_layout() {
    let movie = MovieRecord::new("m", "M")
        .with_tags(["romantic", "upbeat"])
        .with_hue(180.0)
        .with_tempo(0.7)
        .with_edge(0.4);
    assert_eq!(
        vectorize(&movie).0,
        [0.5, 0.4, 0.7, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
}

#[test]
fn every_vector_has_binary_descriptors() {
    for movie in sample_movies() {
        let v = vectorize(&movie);
        assert_eq!(v.as_slice().len(), 11);
        assert!(v.descriptors().iter().all(|&d| d == 0.0 || d == 1.0));
    }
}

#[test]
fn nearest_single_match() {
    let near = MovieRecord::new("near", "Near").with_hue(170.0).with_tempo(0.5).with_edge(0.55);
    let far = MovieRecord::new("far", "Far")
        .with_hue(10.0)
        .with_tempo(0.9)
        .with_edge(0.1)
        .with_tags(["gritty"]);
    let query = MoodVector::new(0.5, 0.5, 0.5, [0.0; 8]);
    let results = rank(&query, &[far, near], 1, Metric::Euclidean);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].movie.id, "near");
}

#[test]
fn recommend_envelope() -> Result<()> {
    let catalog = Catalog::new(sample_movies());
    let query = UserQuery {
        color_hue: 0.14,
        intensity: 0.4,
        pacing: 0.7,
        descriptors: vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        k: Some(2),
        distance_metric: Some("cosine".into()),
    };
    let response = catalog.recommend(&query)?;
    assert!(response.success);
    assert_eq!(response.k, 2);
    assert_eq!(response.distance_metric, Metric::Cosine);
    assert_eq!(response.recommendations[0].movie.id, "la-la-land");

    let body = serde_json::to_value(&response)?;
    assert_eq!(body["distance_metric"], "cosine");
    assert_eq!(body["recommendations"][0]["title"], "La La Land");
    assert_eq!(body["recommendations"][0]["tempo"], 0.7);
    assert!(body["recommendations"][0]["score"].is_number());
    Ok(())
}

#[test]
fn count_is_capped_by_pool_size() -> Result<()> {
    let catalog = Catalog::new(sample_movies());
    let query = UserQuery { k: Some(50), ..UserQuery::default() };
    assert_eq!(catalog.recommend(&query)?.k, 5);
    Ok(())
}

#[test]
fn invalid_query_is_rejected() {
    let catalog = Catalog::new(sample_movies());
    let query = UserQuery { intensity: -0.1, ..UserQuery::default() };
    let err = catalog.recommend(&query).unwrap_err();
    assert!(err.to_string().contains("intensity"));
}

#[test]
fn batch_preserves_order() -> Result<()> {
    let catalog = Catalog::new(sample_movies());
    let queries = vec![
        UserQuery { k: Some(1), ..UserQuery::default() },
        UserQuery { k: Some(3), distance_metric: Some("cosine".into()), ..UserQuery::default() },
    ];
    let responses = catalog.recommend_batch(&queries)?;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].k, 1);
    assert_eq!(responses[1].k, 3);
    assert_eq!(responses[1].distance_metric, Metric::Cosine);

    let bad = vec![UserQuery::default(), UserQuery { descriptors: vec![], ..UserQuery::default() }];
    assert!(catalog.recommend_batch(&bad).is_err());
    Ok(())
}

#[test]
fn mood_board_heuristic() {
    let catalog = Catalog::new(sample_movies());
    let board = moodknn::MoodBoard {
        colors: ["#0000ff".to_string()].into(),
        descriptors: ["mysterious".to_string()].into(),
        intensity: 0.5,
        pacing: 0.5,
    };
    let ranked = catalog.rank_by_mood(&board);
    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0].movie.id, "blade-runner-2049");
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}
