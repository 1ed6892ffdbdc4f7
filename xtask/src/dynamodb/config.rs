//! Table configuration types (Functional Core - pure data).

use movierank_core::storage::schema::{
    ATTR_MOVIE_NAME, ATTR_USER_ID, MOVIE_NAME_INDEX, TABLE_NAME,
};

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

impl AttributeType {
    /// Short DynamoDB type code.
    pub fn code(self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
        }
    }
}

/// Global Secondary Index configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: ProjectionType,
}

/// GSI projection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionType {
    All,
}

/// Billing mode for the table.
///
/// Provisioned capacity applies to the table and to every GSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    Provisioned { read_capacity: i64, write_capacity: i64 },
    PayPerRequest,
}

impl BillingMode {
    pub fn display(&self) -> String {
        match self {
            BillingMode::Provisioned {
                read_capacity,
                write_capacity,
            } => format!("PROVISIONED (read: {read_capacity}, write: {write_capacity})"),
            BillingMode::PayPerRequest => "PAY_PER_REQUEST".to_string(),
        }
    }
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Sets the billing mode.
    pub fn with_billing_mode(mut self, billing_mode: BillingMode) -> Self {
        self.billing_mode = billing_mode;
        self
    }
}

/// Returns the canonical table configuration for movierank.
/// This is a pure function - no I/O.
pub fn movierank_table_config() -> TableConfig {
    TableConfig {
        table_name: TABLE_NAME.to_string(),
        partition_key: KeyAttribute {
            name: ATTR_USER_ID.to_string(),
            attribute_type: AttributeType::Number,
        },
        sort_key: Some(KeyAttribute {
            name: ATTR_MOVIE_NAME.to_string(),
            attribute_type: AttributeType::String,
        }),
        gsis: vec![GsiConfig {
            name: MOVIE_NAME_INDEX.to_string(),
            partition_key: KeyAttribute {
                name: ATTR_MOVIE_NAME.to_string(),
                attribute_type: AttributeType::String,
            },
            sort_key: None,
            projection: ProjectionType::All,
        }],
        billing_mode: BillingMode::Provisioned {
            read_capacity: 1,
            write_capacity: 1,
        },
    }
}
