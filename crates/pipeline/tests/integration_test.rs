//! Integration tests for genre search.
//!
//! These tests load a catalog from CSV text, the way the binary does, and
//! check the search invariants over every genre in it.

use data_loader::Catalog;
use pipeline::{GenreSearch, ValidationError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::Arc;

fn create_test_catalog() -> Arc<Catalog> {
    let mut csv = String::from("Title,Genre,Year\n");

    // 12 comedies, 3 horror films, 10 dramas (one duplicated title)
    for i in 0..12 {
        csv.push_str(&format!("Comedy Film {},Comedy,{}\n", i, 1990 + i));
    }
    csv.push_str("Alien,horror,1979\n");
    csv.push_str("\"Halloween, Part One\",Horror,1978\n");
    csv.push_str("The Thing,HORROR,1982\n");
    for i in 0..9 {
        csv.push_str(&format!("Drama Film {},drama,2000\n", i));
    }
    csv.push_str("Drama Film 0,drama,2001\n");
    csv.push_str("Heat,Suspense/Thriller/Mystery,1995\n");

    Arc::new(Catalog::from_csv_str(&csv).unwrap())
}

#[test]
fn test_every_genre_satisfies_search_invariants() {
    let catalog = create_test_catalog();
    let search = GenreSearch::new(catalog.clone());
    let mut rng = StdRng::seed_from_u64(2024);

    for genre in catalog.genres().iter() {
        let expected_titles: HashSet<&str> = catalog
            .filter_by_genre(genre)
            .iter()
            .map(|r| r.title.as_str())
            .collect();

        let result = search.search(genre, &mut rng).unwrap();

        assert_eq!(result.genre.as_str(), genre);
        assert_eq!(result.len(), expected_titles.len().min(10));

        let unique: HashSet<&str> = result.titles.iter().map(String::as_str).collect();
        assert_eq!(unique.len(), result.len(), "No duplicate titles in one result");
        assert!(unique.is_subset(&expected_titles));
    }
}

#[test]
fn test_small_genre_is_a_permutation() {
    let search = GenreSearch::new(create_test_catalog());
    let mut rng = StdRng::seed_from_u64(1);

    let result = search.search("horror", &mut rng).unwrap();
    let titles: HashSet<&str> = result.titles.iter().map(String::as_str).collect();

    assert_eq!(result.len(), 3);
    assert_eq!(
        titles,
        HashSet::from(["Alien", "Halloween, Part One", "The Thing"])
    );
}

#[test]
fn test_mixed_case_matches_lower_case() {
    let search = GenreSearch::new(create_test_catalog());

    let lower = search
        .search("comedy", &mut StdRng::seed_from_u64(77))
        .unwrap();
    let mixed = search
        .search("  Comedy ", &mut StdRng::seed_from_u64(77))
        .unwrap();

    assert_eq!(lower, mixed);
}

#[test]
fn test_repeated_searches_vary() {
    let search = GenreSearch::new(create_test_catalog());
    let mut rng = StdRng::seed_from_u64(99);

    let draws: HashSet<Vec<String>> = (0..20)
        .map(|_| search.search("comedy", &mut rng).unwrap().titles)
        .collect();

    // 12 choose 10 in random order leaves plenty of room for variety
    assert!(draws.len() > 1);
    for titles in &draws {
        assert_eq!(titles.len(), 10);
    }
}

#[test]
fn test_unknown_genres_are_rejected() {
    let search = GenreSearch::new(create_test_catalog());
    let mut rng = StdRng::seed_from_u64(3);

    for input in ["western", "thriller", "Comedy Film", "horror films"] {
        match search.search(input, &mut rng) {
            Err(ValidationError::UnknownGenre { valid_genres, .. }) => {
                assert_eq!(
                    valid_genres,
                    vec!["comedy", "drama", "horror", "suspense/thriller/mystery"]
                );
            }
            other => panic!("expected UnknownGenre for {:?}, got {:?}", input, other),
        }
    }

    assert_eq!(
        search.search("", &mut rng).unwrap_err(),
        ValidationError::EmptyGenre
    );
}
