//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! `MovieRankRecord`. These are testable in isolation without DynamoDB access.

use std::collections::{BTreeSet, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use movierank_core::movie::MovieRankRecord;
use movierank_core::storage::schema::{
    ATTR_ACTORS, ATTR_DESCRIPTION, ATTR_MOVIE_NAME, ATTR_RANKED_DATE_TIME, ATTR_RANKING,
    ATTR_USER_ID,
};
use movierank_core::storage::RepositoryError;

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Keys
// ============================================================================

/// Numeric attribute value for a user id.
pub fn user_id_value(user_id: i64) -> AttributeValue {
    AttributeValue::N(user_id.to_string())
}

/// String attribute value for a movie name.
pub fn movie_name_value(movie_name: &str) -> AttributeValue {
    AttributeValue::S(movie_name.to_string())
}

/// Timestamp attribute value (RFC 3339).
pub fn timestamp_value(at: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(at.to_rfc3339())
}

/// Composite primary key for a ranking.
pub fn key(user_id: i64, movie_name: &str) -> Item {
    HashMap::from([
        (ATTR_USER_ID.to_string(), user_id_value(user_id)),
        (ATTR_MOVIE_NAME.to_string(), movie_name_value(movie_name)),
    ])
}

// ============================================================================
// Record conversions
// ============================================================================

/// Convert a MovieRankRecord to a DynamoDB item.
///
/// DynamoDB rejects empty string sets, so `Actors` is omitted when empty.
pub fn record_to_item(record: &MovieRankRecord) -> Item {
    let mut item = key(record.user_id, &record.movie_name);

    item.insert(
        ATTR_DESCRIPTION.to_string(),
        AttributeValue::S(record.description.clone()),
    );
    if !record.actors.is_empty() {
        item.insert(
            ATTR_ACTORS.to_string(),
            AttributeValue::Ss(record.actors.iter().cloned().collect()),
        );
    }
    item.insert(
        ATTR_RANKING.to_string(),
        AttributeValue::N(record.ranking.to_string()),
    );
    item.insert(
        ATTR_RANKED_DATE_TIME.to_string(),
        timestamp_value(record.ranked_date_time),
    );

    item
}

/// Convert a DynamoDB item to MovieRankRecord.
pub fn item_to_record(item: &Item) -> Result<MovieRankRecord, RepositoryError> {
    Ok(MovieRankRecord {
        user_id: get_number(item, ATTR_USER_ID)?,
        movie_name: get_string(item, ATTR_MOVIE_NAME)?,
        description: get_string(item, ATTR_DESCRIPTION)?,
        actors: get_string_set(item, ATTR_ACTORS)?,
        ranking: get_number(item, ATTR_RANKING)?,
        ranked_date_time: get_datetime(item, ATTR_RANKED_DATE_TIME)?,
    })
}

/// Convert a page of items, failing on the first malformed one.
pub fn items_to_records(items: &[Item]) -> Result<Vec<MovieRankRecord>, RepositoryError> {
    items.iter().map(item_to_record).collect()
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::Mapping(format!("Missing or invalid field: {}", key)))
}

/// Get a required numeric attribute.
fn get_number<T: std::str::FromStr>(item: &Item, key: &str) -> Result<T, RepositoryError> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::Mapping(format!("Missing or invalid field: {}", key)))?;
    raw.parse()
        .map_err(|_| RepositoryError::Mapping(format!("Invalid number {}: {}", key, raw)))
}

/// Get an optional string set attribute; a missing attribute is the empty set.
fn get_string_set(item: &Item, key: &str) -> Result<BTreeSet<String>, RepositoryError> {
    match item.get(key) {
        None => Ok(BTreeSet::new()),
        Some(value) => value
            .as_ss()
            .map(|set| set.iter().cloned().collect())
            .map_err(|_| RepositoryError::Mapping(format!("Invalid string set field: {}", key))),
    }
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Mapping(format!("Invalid datetime {}: {}", key, e)))
}
