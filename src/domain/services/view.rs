#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use crate::domain::models::Card;
use crate::domain::models::LikedSet;
use crate::domain::models::Movie;

pub fn escape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&#39;"),
            _ => res.push(c),
        }
    }

    return res;
}

/// Movies whose name contains `search` (ignoring case) and whose genre equals
/// `genre`. An empty `genre` disables the genre check. The source is never
/// touched, matches are returned in source order.
pub fn filter_movies<'a, I>(movies: I, search: &str, genre: &str) -> Vec<&'a Movie>
where
    I: IntoIterator<Item = &'a Movie>,
{
    let search = search.to_lowercase();

    return movies
        .into_iter()
        .filter(|movie| return movie.matches(&search, genre))
        .collect();
}

/// Sorted genres across `movies`, without duplicates.
pub fn genres(movies: &[Movie]) -> Vec<String> {
    let mut res = movies
        .iter()
        .map(|movie| return movie.genre.to_string())
        .collect::<Vec<String>>();
    res.sort();
    res.dedup();

    return res;
}

pub fn genre_options(movies: &[Movie], selected: &str) -> String {
    let mut options = vec![option("", "All Genres", selected.is_empty())];
    for genre in genres(movies) {
        let is_selected = genre == selected;
        options.push(option(&genre, &genre, is_selected));
    }

    return options.join("");
}

fn option(value: &str, label: &str, selected: bool) -> String {
    let selected_attr = if selected { " selected" } else { "" };

    return format!(
        r#"<option value="{}"{selected_attr}>{}</option>"#,
        escape(value),
        escape(label)
    );
}

pub fn like_button(movie_id: i64, liked: bool) -> String {
    if liked {
        return format!(r#"<button class="like-btn liked" data-movie-id="{movie_id}">❤️</button>"#);
    }

    return format!(r#"<button class="like-btn" data-movie-id="{movie_id}">🤍</button>"#);
}

/// The like count badge is only shown on recommendations, and only when the
/// service reported at least one like.
pub fn movie_card(movie: &Movie, liked: bool, is_recommendation: bool) -> String {
    let mut badge = "".to_string();
    if is_recommendation {
        if let Some(count) = movie.like_badge_count() {
            badge = format!(r#"<span class="like-count">👍 {count}</span>"#);
        }
    }

    return format!(
        r#"<div class="movie-card"><h3>{name}</h3><div class="movie-info"><span class="genre">{genre}</span><span class="rating">⭐ {ratings}</span></div>{badge}{button}</div>"#,
        name = escape(&movie.movie_name),
        genre = escape(&movie.genre),
        ratings = movie.ratings,
        button = like_button(movie.movie_id, liked),
    );
}

pub fn movie_cards(movies: &[&Movie], liked: &LikedSet) -> Vec<Card> {
    return movies
        .iter()
        .map(|movie| {
            return Card {
                movie_id: movie.movie_id,
                markup: movie_card(movie, liked.contains(movie.movie_id), false),
            };
        })
        .collect();
}

pub fn recommendation_section(liked_movie: &Movie, recommendations: &[Movie], liked: &LikedSet) -> String {
    let cards = recommendations
        .iter()
        .map(|movie| return movie_card(movie, liked.contains(movie.movie_id), true))
        .collect::<Vec<String>>()
        .join("");

    return format!(
        r#"<div class="recommendation-section"><h3>Because you liked "{name}"</h3><div class="movies-grid">{cards}</div></div>"#,
        name = escape(&liked_movie.movie_name),
    );
}

pub fn recommendations_empty_state() -> String {
    return r#"<div class="empty-state"><h3>No Recommendations Yet</h3><p>Like some movies to get personalized recommendations!</p></div>"#.to_string();
}
