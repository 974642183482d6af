/// Payload of `GET /movies` as the catalog service returns it.
pub fn movies_fixture() -> &'static str {
    return r#"
[
    {"movie_id": 1, "movie_name": "The Godfather", "genre": "Crime", "ratings": 9.2},
    {"movie_id": 2, "movie_name": "Spirited Away", "genre": "Animation", "ratings": 8.6},
    {"movie_id": 3, "movie_name": "Heat", "genre": "Crime", "ratings": 8.3},
    {"movie_id": 4, "movie_name": "The Dark Knight", "genre": "Action", "ratings": 9.0},
    {"movie_id": 42, "movie_name": "Godzilla Minus One", "genre": "Action", "ratings": 7.8}
]
"#
    .trim();
}

/// Payload of `GET /recommendations/1`, ordered by likes then ratings.
pub fn recommendations_fixture() -> &'static str {
    return r#"
[
    {"movie_id": 3, "movie_name": "Heat", "genre": "Crime", "ratings": 8.3, "like_count": 4},
    {"movie_id": 7, "movie_name": "Goodfellas", "genre": "Crime", "ratings": 8.7, "like_count": 0}
]
"#
    .trim();
}
