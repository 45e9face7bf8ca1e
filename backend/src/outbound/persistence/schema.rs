//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with their plan and billing link.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique login email.
        email -> Varchar,
        display_name -> Varchar,
        /// `free` or `pro`.
        plan -> Varchar,
        /// Billing provider customer handle, set on first checkout.
        billing_customer_id -> Nullable<Varchar>,
        /// Argon2id hash in PHC string format.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Receipt scans counted per user per calendar month (UTC).
    receipt_usage (user_id, period_start) {
        user_id -> Uuid,
        /// First day of the counted month.
        period_start -> Date,
        receipts_used -> Int4,
    }
}

diesel::table! {
    /// In-app notifications, newest read first.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        title -> Varchar,
        body -> Text,
        url -> Nullable<Text>,
        created_at -> Timestamptz,
        read_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(receipt_usage -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(notifications, receipt_usage, users);
