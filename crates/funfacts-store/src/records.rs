//! Table and column constants for the fact store.

/// Table holding fact rows.
pub const FACT_TABLE: &str = "fact";

/// Primary key column of every table.
pub const ID_COLUMN: &str = "id";

/// Column holding a fact's category name.
pub const CATEGORY_COLUMN: &str = "category";

/// Maximum number of facts requested in a single listing.
pub const MAX_FACTS: u32 = 1000;

/// Path prefix of the store's REST API.
pub const REST_PREFIX: &str = "rest/v1";
