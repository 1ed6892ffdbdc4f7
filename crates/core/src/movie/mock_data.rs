//! Deterministic demo rankings used for seeding a running server.

use super::MovieRankRequest;

/// Catalog of demo movies: (name, description, actors).
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Inception",
        "A thief who steals corporate secrets through dream-sharing technology.",
        &["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Elliot Page"],
    ),
    (
        "Heat",
        "A group of professional bank robbers and the detective chasing them.",
        &["Al Pacino", "Robert De Niro", "Val Kilmer"],
    ),
    (
        "Alien",
        "The crew of a commercial spacecraft encounters a deadly lifeform.",
        &["Sigourney Weaver", "Tom Skerritt", "John Hurt"],
    ),
    (
        "Arrival",
        "A linguist works with the military to communicate with alien visitors.",
        &["Amy Adams", "Jeremy Renner", "Forest Whitaker"],
    ),
    (
        "Zodiac",
        "A cartoonist becomes obsessed with tracking down the Zodiac Killer.",
        &["Jake Gyllenhaal", "Mark Ruffalo", "Robert Downey Jr."],
    ),
    (
        "Amelie",
        "A shy waitress decides to change the lives of those around her.",
        &["Audrey Tautou", "Mathieu Kassovitz"],
    ),
];

/// Generates one ranking per (user, movie) pair for users `1..=user_count`.
///
/// Rankings are spread over 1..=10 so that averages differ per movie.
pub fn generate_seed_rankings(user_count: u32) -> Vec<(i64, MovieRankRequest)> {
    let mut rankings = Vec::with_capacity(user_count as usize * CATALOG.len());

    for user in 1..=user_count {
        for (index, (name, description, actors)) in CATALOG.iter().enumerate() {
            let ranking = ((user as usize * 3 + index * 7) % 10 + 1) as i32;
            rankings.push((
                i64::from(user),
                MovieRankRequest {
                    movie_name: (*name).to_string(),
                    description: (*description).to_string(),
                    actors: actors.iter().map(|a| (*a).to_string()).collect(),
                    ranking,
                },
            ));
        }
    }

    rankings
}

/// Names of the movies produced by [`generate_seed_rankings`].
pub fn seed_movie_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _, _)| *name)
}
