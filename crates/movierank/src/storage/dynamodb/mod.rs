//! DynamoDB storage backend implementation.
//!
//! Implements `MovieRepository` on top of `aws-sdk-dynamodb`. Attribute maps
//! never leave this module; callers only see `MovieRankRecord`.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
