/// Column-name constants for the transaction dataset.
/// Single source of truth - shared by the loader, aggregation and bindings.

// ── Transaction columns ─────────────────────────────────────────────────────
pub mod transaction {
    pub const USER_ID: &str = "User_ID";
    pub const PRODUCT_ID: &str = "Product_ID";
    pub const GENDER: &str = "Gender";
    pub const AGE: &str = "Age";
    pub const OCCUPATION: &str = "Occupation";
    pub const CITY_CATEGORY: &str = "City_Category";
    pub const MARITAL_STATUS: &str = "Marital_Status";
    pub const PRODUCT_CATEGORY_1: &str = "Product_Category_1";
    pub const PRODUCT_CATEGORY_2: &str = "Product_Category_2";
    pub const PRODUCT_CATEGORY_3: &str = "Product_Category_3";
    pub const PURCHASE: &str = "Purchase";

    /// Output column order of the normalized transaction table.
    pub const ALL: [&str; 11] = [
        USER_ID,
        PRODUCT_ID,
        GENDER,
        AGE,
        OCCUPATION,
        CITY_CATEGORY,
        MARITAL_STATUS,
        PRODUCT_CATEGORY_1,
        PRODUCT_CATEGORY_2,
        PRODUCT_CATEGORY_3,
        PURCHASE,
    ];

    /// Columns that may be blank in the source file (filled with 0).
    pub const OPTIONAL: [&str; 2] = [PRODUCT_CATEGORY_2, PRODUCT_CATEGORY_3];
}

// ── Demographic columns ─────────────────────────────────────────────────────
pub mod demographic {
    use super::transaction;

    pub const ALL: [&str; 6] = [
        transaction::USER_ID,
        transaction::GENDER,
        transaction::AGE,
        transaction::OCCUPATION,
        transaction::CITY_CATEGORY,
        transaction::MARITAL_STATUS,
    ];

    /// Demographic fields other than the customer key.
    pub const ATTRIBUTES: [&str; 5] = [
        transaction::GENDER,
        transaction::AGE,
        transaction::OCCUPATION,
        transaction::CITY_CATEGORY,
        transaction::MARITAL_STATUS,
    ];
}

// ── Selector values ─────────────────────────────────────────────────────────
pub mod mode {
    pub const COUNTER: &str = "counter";
    pub const PURCHASE: &str = "purchase";
    pub const PRODUCTS: &str = "products";
}
