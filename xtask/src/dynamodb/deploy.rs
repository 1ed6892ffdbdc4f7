//! Table deployment operations (Imperative Shell).

use super::client;
use super::config::{self, BillingMode, TableConfig};
use super::error::{DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode as SdkBillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use backon::{BackoffBuilder, ExponentialBuilder};
use std::time::Duration;
use tokio::time::Instant;

/// Execute a deploy plan, waiting at most `wait_timeout` for each change to settle.
pub async fn execute_deploy_plan(
    client: &Client,
    plan: &DeployPlan,
    billing_mode: BillingMode,
    wait_timeout: Duration,
) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { config } => {
            create_table(client, config).await?;
            wait_for_table_active(client, &config.table_name, wait_timeout).await?;
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => {
            for gsi in gsis_to_add {
                add_gsi(client, table_name, gsi, billing_mode).await?;
                wait_for_table_active(client, table_name, wait_timeout).await?;
            }
        }
        DeployPlan::NoChanges { .. } => {
            // Nothing to do
        }
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            delete_table(client, table_name).await?;
        }
        DestroyPlan::AlreadyGone { .. } => {
            // Nothing to do
        }
    }
    Ok(())
}

fn key_schema(
    partition_key: &config::KeyAttribute,
    sort_key: Option<&config::KeyAttribute>,
) -> Result<Vec<KeySchemaElement>> {
    let mut schema = vec![KeySchemaElement::builder()
        .attribute_name(&partition_key.name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?];

    if let Some(sk) = sort_key {
        schema.push(
            KeySchemaElement::builder()
                .attribute_name(&sk.name)
                .key_type(KeyType::Range)
                .build()
                .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?,
        );
    }

    Ok(schema)
}

/// Adds a definition for `key` unless one with the same name is already present.
fn push_attribute_definition(
    definitions: &mut Vec<AttributeDefinition>,
    key: &config::KeyAttribute,
) -> Result<()> {
    if definitions
        .iter()
        .any(|a| a.attribute_name() == key.name.as_str())
    {
        return Ok(());
    }

    definitions.push(
        AttributeDefinition::builder()
            .attribute_name(&key.name)
            .attribute_type(to_scalar_type(&key.attribute_type))
            .build()
            .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?,
    );
    Ok(())
}

fn provisioned_throughput(billing_mode: BillingMode) -> Result<Option<ProvisionedThroughput>> {
    match billing_mode {
        BillingMode::Provisioned {
            read_capacity,
            write_capacity,
        } => Ok(Some(
            ProvisionedThroughput::builder()
                .read_capacity_units(read_capacity)
                .write_capacity_units(write_capacity)
                .build()
                .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?,
        )),
        BillingMode::PayPerRequest => Ok(None),
    }
}

fn to_sdk_billing_mode(billing_mode: BillingMode) -> SdkBillingMode {
    match billing_mode {
        BillingMode::Provisioned { .. } => SdkBillingMode::Provisioned,
        BillingMode::PayPerRequest => SdkBillingMode::PayPerRequest,
    }
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let mut attribute_definitions = Vec::new();
    push_attribute_definition(&mut attribute_definitions, &config.partition_key)?;
    if let Some(sk) = &config.sort_key {
        push_attribute_definition(&mut attribute_definitions, sk)?;
    }

    // Add GSI attribute definitions
    for gsi in &config.gsis {
        push_attribute_definition(&mut attribute_definitions, &gsi.partition_key)?;
        if let Some(sk) = &gsi.sort_key {
            push_attribute_definition(&mut attribute_definitions, sk)?;
        }
    }

    let throughput = provisioned_throughput(config.billing_mode)?;

    let mut request = client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema(
            &config.partition_key,
            config.sort_key.as_ref(),
        )?))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(to_sdk_billing_mode(config.billing_mode))
        .set_provisioned_throughput(throughput.clone());

    // Add GSIs
    for gsi in &config.gsis {
        request = request.global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .set_key_schema(Some(key_schema(
                    &gsi.partition_key,
                    gsi.sort_key.as_ref(),
                )?))
                .projection(
                    Projection::builder()
                        .projection_type(to_sdk_projection(&gsi.projection))
                        .build(),
                )
                .set_provisioned_throughput(throughput.clone())
                .build()
                .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?,
        );
    }

    request
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(format!("{:?}", e)))?;
    Ok(())
}

async fn add_gsi(
    client: &Client,
    table_name: &str,
    gsi: &config::GsiConfig,
    billing_mode: BillingMode,
) -> Result<()> {
    use aws_sdk_dynamodb::types::{CreateGlobalSecondaryIndexAction, GlobalSecondaryIndexUpdate};

    // Build attribute definitions for the GSI keys
    let mut attribute_definitions = Vec::new();
    push_attribute_definition(&mut attribute_definitions, &gsi.partition_key)?;
    if let Some(sk) = &gsi.sort_key {
        push_attribute_definition(&mut attribute_definitions, sk)?;
    }

    client
        .update_table()
        .table_name(table_name)
        .set_attribute_definitions(Some(attribute_definitions))
        .global_secondary_index_updates(
            GlobalSecondaryIndexUpdate::builder()
                .create(
                    CreateGlobalSecondaryIndexAction::builder()
                        .index_name(&gsi.name)
                        .set_key_schema(Some(key_schema(
                            &gsi.partition_key,
                            gsi.sort_key.as_ref(),
                        )?))
                        .projection(
                            Projection::builder()
                                .projection_type(to_sdk_projection(&gsi.projection))
                                .build(),
                        )
                        .set_provisioned_throughput(provisioned_throughput(billing_mode)?)
                        .build()
                        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?,
                )
                .build(),
        )
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(format!("{:?}", e)))?;

    Ok(())
}

async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(format!("{:?}", e)))?;
    Ok(())
}

/// Delays between table status polls: 500ms doubling up to 5s, unbounded count.
fn poll_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(5))
        .without_max_times()
        .with_jitter()
        .build()
}

/// How long to sleep before the next poll, or `None` once the deadline has passed.
fn next_sleep(delay: Duration, now: Instant, deadline: Instant) -> Option<Duration> {
    if now >= deadline {
        return None;
    }
    Some(delay.min(deadline - now))
}

/// Runs `check` until it reports ready or `timeout` elapses.
///
/// The first check always runs, so a zero timeout still observes a table
/// that is already settled. Returns whether readiness was observed.
async fn poll_until_ready<F, Fut>(mut check: F, timeout: Duration) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    let mut delays = poll_backoff();

    loop {
        if check().await? {
            return Ok(true);
        }

        let Some(delay) = delays.next() else {
            return Ok(false);
        };
        let Some(sleep) = next_sleep(delay, Instant::now(), deadline) else {
            return Ok(false);
        };
        tokio::time::sleep(sleep).await;
    }
}

/// Polls until the table and all of its GSIs are ACTIVE.
///
/// A table that is not visible yet counts as not ready.
pub async fn wait_for_table_active(
    client: &Client,
    table_name: &str,
    timeout: Duration,
) -> Result<()> {
    let ready = poll_until_ready(
        move || async move {
            Ok(client::get_table_state(client, table_name)
                .await?
                .is_some_and(|state| state.is_ready()))
        },
        timeout,
    )
    .await?;

    if ready {
        Ok(())
    } else {
        Err(DynamodbError::TableActivationTimeout {
            table_name: table_name.to_string(),
            timeout,
        })
    }
}

fn to_sdk_projection(projection: &config::ProjectionType) -> ProjectionType {
    match projection {
        config::ProjectionType::All => ProjectionType::All,
    }
}

fn to_scalar_type(attr_type: &config::AttributeType) -> ScalarAttributeType {
    match attr_type {
        config::AttributeType::String => ScalarAttributeType::S,
        config::AttributeType::Number => ScalarAttributeType::N,
    }
}
