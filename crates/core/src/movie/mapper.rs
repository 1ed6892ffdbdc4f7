//! Pure translation from stored records to API responses.

use super::{MovieRankRecord, MovieRankResponse, MovieResponse, UserRanking};

/// Maps a single record to its API projection.
pub fn to_movie_response(record: &MovieRankRecord) -> MovieResponse {
    MovieResponse {
        user_id: record.user_id,
        movie_name: record.movie_name.clone(),
        description: record.description.clone(),
        actors: record.actors.clone(),
        ranking: record.ranking,
        ranked_date_time: record.ranked_date_time,
    }
}

/// Maps records to responses, preserving order.
pub fn to_movie_responses(records: &[MovieRankRecord]) -> Vec<MovieResponse> {
    records.iter().map(to_movie_response).collect()
}

/// Arithmetic mean of the rankings, or `None` for an empty slice.
pub fn overall_ranking(records: &[MovieRankRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: i64 = records.iter().map(|r| i64::from(r.ranking)).sum();
    Some(total as f64 / records.len() as f64)
}

/// Builds the cross-user ranking summary for `movie_name`.
pub fn to_movie_rank_response(
    movie_name: impl Into<String>,
    records: &[MovieRankRecord],
) -> MovieRankResponse {
    MovieRankResponse {
        movie_name: movie_name.into(),
        overall_ranking: overall_ranking(records),
        rankings: records
            .iter()
            .map(|r| UserRanking {
                user_id: r.user_id,
                ranking: r.ranking,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Utc};

    use super::*;

    fn record(user_id: i64, movie_name: &str, ranking: i32) -> MovieRankRecord {
        MovieRankRecord {
            user_id,
            movie_name: movie_name.to_string(),
            description: format!("{movie_name} description"),
            actors: BTreeSet::from(["A".to_string(), "B".to_string()]),
            ranking,
            ranked_date_time: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_to_movie_response_copies_fields() {
        let r = record(7, "Inception", 9);
        let response = to_movie_response(&r);

        assert_eq!(response.user_id, 7);
        assert_eq!(response.movie_name, "Inception");
        assert_eq!(response.description, "Inception description");
        assert_eq!(response.actors, r.actors);
        assert_eq!(response.ranking, 9);
        assert_eq!(response.ranked_date_time, r.ranked_date_time);
    }

    #[test]
    fn test_to_movie_responses_preserves_order() {
        let records = vec![record(2, "Zodiac", 5), record(1, "Alien", 8)];
        let names: Vec<_> = to_movie_responses(&records)
            .into_iter()
            .map(|r| r.movie_name)
            .collect();

        assert_eq!(names, vec!["Zodiac", "Alien"]);
    }

    #[test]
    fn test_to_movie_responses_empty() {
        assert!(to_movie_responses(&[]).is_empty());
    }

    #[test]
    fn test_overall_ranking_is_mean() {
        let records = vec![
            record(1, "Heat", 7),
            record(2, "Heat", 8),
            record(3, "Heat", 10),
        ];

        let mean = overall_ranking(&records).unwrap();
        assert!((mean - 25.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overall_ranking_empty_is_none() {
        assert_eq!(overall_ranking(&[]), None);
    }

    #[test]
    fn test_movie_rank_response_lists_every_user() {
        let records = vec![record(1, "Heat", 6), record(2, "Heat", 8)];
        let response = to_movie_rank_response("Heat", &records);

        assert_eq!(response.movie_name, "Heat");
        assert_eq!(response.overall_ranking, Some(7.0));
        assert_eq!(
            response.rankings,
            vec![
                UserRanking {
                    user_id: 1,
                    ranking: 6
                },
                UserRanking {
                    user_id: 2,
                    ranking: 8
                },
            ]
        );
    }

    #[test]
    fn test_movie_rank_response_serializes_pascal_case() {
        let response = to_movie_rank_response("Heat", &[record(1, "Heat", 6)]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["MovieName"], "Heat");
        assert_eq!(json["OverallRanking"], 6.0);
        assert_eq!(json["Rankings"][0]["UserId"], 1);
        assert_eq!(json["Rankings"][0]["Ranking"], 6);
    }
}
