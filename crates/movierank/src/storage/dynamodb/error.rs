//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `movierank_core::storage`.
//! Transport failures and throttling become `StoreUnavailable`; anything the
//! service refuses as malformed becomes `StoreRejected`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use movierank_core::storage::RepositoryError;

/// Unmodeled error codes that still indicate a transient condition.
const TRANSIENT_CODES: &[&str] = &[
    "ThrottlingException",
    "RequestLimitExceeded",
    "ServiceUnavailable",
    "InternalServerError",
];

/// Separates service errors from transport/construction failures.
fn into_service_error<E, R>(
    err: SdkError<E, R>,
    operation: &str,
) -> Result<E, RepositoryError>
where
    E: Debug,
    R: Debug,
{
    match err {
        SdkError::ServiceError(context) => Ok(context.into_err()),
        err @ SdkError::ConstructionFailure(_) => Err(RepositoryError::StoreRejected(format!(
            "{operation} request could not be built: {:?}",
            err
        ))),
        err => Err(RepositoryError::StoreUnavailable(format!(
            "{operation} failed: {:?}",
            err
        ))),
    }
}

/// Classifies a service error the SDK does not model explicitly.
fn map_unmodeled(err: impl ProvideErrorMetadata + Debug, operation: &str) -> RepositoryError {
    match err.code() {
        Some(code) if TRANSIENT_CODES.contains(&code) => {
            RepositoryError::StoreUnavailable(format!("{operation} failed: {code}"))
        }
        Some(code) => RepositoryError::StoreRejected(format!(
            "{operation} rejected: {code}: {}",
            err.message().unwrap_or_default()
        )),
        None => RepositoryError::StoreRejected(format!("{operation} failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug>(err: SdkError<ScanError, R>) -> RepositoryError {
    match into_service_error(err, "Scan") {
        Ok(ScanError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table not found".to_string())
        }
        Ok(ScanError::ProvisionedThroughputExceededException(_)) => {
            RepositoryError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        Ok(ScanError::RequestLimitExceeded(_)) => {
            RepositoryError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        Ok(ScanError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(err) => map_unmodeled(err, "Scan"),
        Err(err) => err,
    }
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug>(err: SdkError<GetItemError, R>) -> RepositoryError {
    match into_service_error(err, "GetItem") {
        Ok(GetItemError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table not found".to_string())
        }
        Ok(GetItemError::ProvisionedThroughputExceededException(_)) => {
            RepositoryError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        Ok(GetItemError::RequestLimitExceeded(_)) => {
            RepositoryError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        Ok(GetItemError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(err) => map_unmodeled(err, "GetItem"),
        Err(err) => err,
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug>(err: SdkError<QueryError, R>) -> RepositoryError {
    match into_service_error(err, "Query") {
        Ok(QueryError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table or index not found".to_string())
        }
        Ok(QueryError::ProvisionedThroughputExceededException(_)) => {
            RepositoryError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        Ok(QueryError::RequestLimitExceeded(_)) => {
            RepositoryError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        Ok(QueryError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(err) => map_unmodeled(err, "Query"),
        Err(err) => err,
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug>(err: SdkError<PutItemError, R>) -> RepositoryError {
    match into_service_error(err, "PutItem") {
        Ok(PutItemError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table not found".to_string())
        }
        Ok(PutItemError::ProvisionedThroughputExceededException(_)) => {
            RepositoryError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        Ok(PutItemError::RequestLimitExceeded(_)) => {
            RepositoryError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        Ok(PutItemError::TransactionConflictException(_)) => {
            RepositoryError::StoreUnavailable("Transaction conflict, please retry".to_string())
        }
        Ok(PutItemError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(PutItemError::ItemCollectionSizeLimitExceededException(_)) => {
            RepositoryError::StoreRejected("Item collection size limit exceeded".to_string())
        }
        Ok(err) => map_unmodeled(err, "PutItem"),
        Err(err) => err,
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
///
/// A failed `attribute_exists` condition means the key was never inserted.
pub fn map_update_item_error<R: Debug>(
    err: SdkError<UpdateItemError, R>,
    user_id: i64,
    movie_name: &str,
) -> RepositoryError {
    match into_service_error(err, "UpdateItem") {
        Ok(UpdateItemError::ConditionalCheckFailedException(_)) => {
            RepositoryError::movie_not_found(user_id, movie_name)
        }
        Ok(UpdateItemError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table not found".to_string())
        }
        Ok(UpdateItemError::ProvisionedThroughputExceededException(_)) => {
            RepositoryError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        Ok(UpdateItemError::RequestLimitExceeded(_)) => {
            RepositoryError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        Ok(UpdateItemError::TransactionConflictException(_)) => {
            RepositoryError::StoreUnavailable("Transaction conflict, please retry".to_string())
        }
        Ok(UpdateItemError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(UpdateItemError::ItemCollectionSizeLimitExceededException(_)) => {
            RepositoryError::StoreRejected("Item collection size limit exceeded".to_string())
        }
        Ok(err) => map_unmodeled(err, "UpdateItem"),
        Err(err) => err,
    }
}

/// Map a DescribeTable SDK error to RepositoryError.
pub fn map_describe_table_error<R: Debug>(
    err: SdkError<DescribeTableError, R>,
) -> RepositoryError {
    match into_service_error(err, "DescribeTable") {
        Ok(DescribeTableError::ResourceNotFoundException(_)) => {
            RepositoryError::StoreUnavailable("Table not found".to_string())
        }
        Ok(DescribeTableError::InternalServerError(_)) => {
            RepositoryError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        Ok(err) => map_unmodeled(err, "DescribeTable"),
        Err(err) => err,
    }
}
