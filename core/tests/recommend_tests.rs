use cinematch_core::combine::combine;
use cinematch_core::similarity::rank;
use cinematch_core::vectorize::vectorize;
use cinematch_core::{Catalog, CombinerConfig, MovieRecord, RecommendError, Recommender, RecommenderConfig};
use cinematch_core::{Field, Weights};
use std::sync::Arc;

fn sample_catalog() -> Catalog {
    Catalog::from_records(vec![
        MovieRecord::new("Alpha", "Action,Drama", "Jane Doe", "Tom Lee,Amy Fox"),
        MovieRecord::new("Beta", "Action", "John Roe", "Tom Lee,Amy Fox"),
        MovieRecord::new("Gamma", "Comedy", "Sue Kim", "Ed Park"),
    ])
    .unwrap()
}

fn larger_catalog() -> Catalog {
    let genres = ["Action", "Drama", "Comedy", "Horror", "Sci-Fi"];
    let people = ["Tom Lee", "Amy Fox", "Ed Park", "Sue Kim", "Ray Cho", "Ann Bell", "Max Roy"];
    let mut records = Vec::new();
    for i in 0..30 {
        let genre = format!("{}, {}", genres[i % 5], genres[(i / 5) % 5]);
        let cast = format!("{}, {}, {}", people[i % 7], people[(i + 2) % 7], people[(i + 5) % 7]);
        let director = format!("Director {}", ["One", "Two", "Three"][i % 3]);
        records.push(MovieRecord::new(format!("Movie {i}"), genre, director, cast));
    }
    records.push(MovieRecord::new("Blank", "", "", ""));
    Catalog::from_records(records).unwrap()
}

fn recommender(catalog: Catalog) -> Recommender {
    Recommender::new(Arc::new(catalog), RecommenderConfig::default()).unwrap()
}

#[test]
fn shared_cast_and_genre_ranks_higher() {
    let r = recommender(sample_catalog());
    let recs = r.run_query("Alpha", Weights::new(5, 1, 1).unwrap()).unwrap();
    let titles: Vec<&str> = recs.results.iter().map(|x| x.title.as_str()).collect();
    assert_eq!(titles, vec!["Beta", "Gamma"]);
    assert!(recs.results[0].score > recs.results[1].score);
    assert_eq!(recs.results[1].score, 0.0);
}

#[test]
fn every_title_validates_and_excludes_itself() {
    let catalog = larger_catalog();
    let titles: Vec<String> = catalog.records().iter().map(|r| r.title.clone()).collect();
    let r = recommender(catalog);
    let w = Weights::new(2, 3, 1).unwrap();
    for (i, t) in titles.iter().enumerate() {
        assert!(r.validate_title(t));
        assert!(r.validate_title(&t.to_uppercase()));
        let recs = r.run_query(t, w).unwrap();
        assert!(!recs.results.is_empty());
        assert!(recs.results.len() <= 10);
        assert!(recs.results.iter().all(|x| x.index != i));
        assert!(recs.results.windows(2).all(|p| p[0].score >= p[1].score));
    }
}

#[test]
fn unknown_titles_are_rejected() {
    let r = recommender(sample_catalog());
    for t in ["Delta", "alph", "ALPHA BETA", "Gam ma"] {
        assert!(!r.validate_title(t));
        assert!(matches!(r.run_query(t, Weights::default()), Err(RecommendError::TitleNotFound(_))));
    }
    // surrounding whitespace is not part of the title
    assert!(r.validate_title(" beta "));
    assert_eq!(r.run_query("  ALPHA ", Weights::default()).unwrap().selected_index, 0);
}

#[test]
fn identical_queries_give_identical_output() {
    let uncached = Recommender::new(Arc::new(larger_catalog()), RecommenderConfig::default().without_cache()).unwrap();
    let cached = recommender(larger_catalog());
    let w = Weights::new(3, 2, 4).unwrap();
    let a = uncached.run_query("Movie 7", w).unwrap();
    let b = uncached.run_query("movie 7", w).unwrap();
    let c = cached.run_query("Movie 7", w).unwrap();
    let d = cached.run_query("Movie 7", w).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(c, d);
}

#[test]
fn cast_token_count_never_drops_as_weight_rises() {
    let rec = MovieRecord::new("X", "Drama, Crime", "Jo Ann", "Tom Lee, Amy Fox, Ed Park, Sue Kim");
    let cfg = CombinerConfig::default();
    let mut last = 0;
    for c in 1..=5 {
        let text = combine(&rec, Weights::new(c, 2, 2).unwrap(), &cfg);
        let n = text.split_whitespace().filter(|t| *t == "Amy_Fox").count();
        assert!(n >= last);
        last = n;
        assert_eq!(text.split_whitespace().filter(|t| *t == "Sue_Kim").count(), 0);
    }
}

#[test]
fn blank_record_scores_zero_everywhere() {
    let catalog = larger_catalog();
    let blank = catalog.find_title("Blank").unwrap();
    let w = Weights::new(4, 4, 4).unwrap();
    let texts: Vec<String> = catalog.records().iter().map(|r| combine(r, w, &CombinerConfig::default())).collect();
    assert!(texts[blank].trim().is_empty());

    let (_, matrix) = vectorize(&texts).unwrap();
    assert!(matrix.row(blank).unwrap().is_empty());
    let ranked = rank(&matrix, blank).unwrap();
    assert!(ranked.iter().all(|s| s.score == 0.0));
    // all ties: catalog order
    let order: Vec<usize> = ranked.iter().map(|s| s.index).collect();
    assert_eq!(order, (0..catalog.len()).collect::<Vec<_>>());

    let r = recommender(catalog);
    let recs = r.run_query("blank", w).unwrap();
    assert_eq!(recs.results.len(), 10);
    assert!(recs.results.iter().all(|x| x.index != blank && x.score == 0.0));
}

#[test]
fn all_blank_catalog_reports_no_recommendations() {
    let catalog = Catalog::from_records(vec![
        MovieRecord::new("One", "", "", ""),
        MovieRecord::new("Two", "", "", ""),
    ])
    .unwrap();
    let r = recommender(catalog);
    assert!(matches!(r.run_query("One", Weights::default()), Err(RecommendError::Vectorization(_))));
}

#[test]
fn duplicate_titles_use_first_match() {
    let catalog = Catalog::from_records(vec![
        MovieRecord::new("Solaris", "Sci-Fi, Drama", "Andrei Tarkovsky", "Natalya Bondarchuk"),
        MovieRecord::new("Other", "Drama", "Someone", "Natalya Bondarchuk"),
        MovieRecord::new("SOLARIS", "Sci-Fi, Romance", "Steven Soderbergh", "George Clooney"),
    ])
    .unwrap();
    let r = recommender(catalog);
    let recs = r.run_query("solaris", Weights::default()).unwrap();
    assert_eq!(recs.selected_index, 0);
    assert_eq!(recs.selected, "Solaris");
    // the second "Solaris" is a different record and may be recommended
    assert!(recs.results.iter().any(|x| x.index == 2));
}

#[test]
fn top_n_follows_config() {
    let r = Recommender::new(Arc::new(larger_catalog()), RecommenderConfig::default().with_top_n(3)).unwrap();
    let recs = r.run_query("Movie 1", Weights::default()).unwrap();
    assert_eq!(recs.results.len(), 3);
    assert_eq!(recs.results.iter().map(|x| x.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn non_string_field_degrades_without_aborting_query() {
    let catalog = Catalog::from_records(vec![
        MovieRecord::new("Alpha", "Action,Drama", "Jane Doe", "Tom Lee,Amy Fox"),
        MovieRecord::new("Broken", "Action", "Jane Doe", Field::Invalid(serde_json::json!(42))),
        MovieRecord::new("Beta", "Action", "John Roe", "Tom Lee,Amy Fox"),
        MovieRecord::new("Gamma", "Comedy", "Sue Kim", "Ed Park"),
    ])
    .unwrap();
    let r = recommender(catalog);
    let w = Weights::new(2, 3, 2).unwrap();

    let recs = r.run_query("Alpha", w).unwrap();
    assert_eq!(recs.results.len(), 3);
    assert_eq!(recs.results[0].title, "Beta");
    let broken = recs.results.iter().find(|x| x.title == "Broken").unwrap();
    assert_eq!(broken.score, 0.0);

    // shares genre and director with Alpha, but the whole record has no signal
    let own = r.run_query("broken", w).unwrap();
    assert_eq!(own.selected_index, 1);
    assert_eq!(own.results.len(), 3);
    assert!(own.results.iter().all(|x| x.index != 1 && x.score == 0.0));
}
