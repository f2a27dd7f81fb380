//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! The `diesel print-schema` command can regenerate them from a live
//! database.

diesel::table! {
    /// Registered accounts, keyed by an internal UUID and unique on both the
    /// identity provider subject and the email address.
    users (id) {
        id -> Uuid,
        external_id -> Varchar,
        display_name -> Varchar,
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable classification records for authenticated submissions.
    scans (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        category -> Varchar,
        label -> Varchar,
        confidence -> Float8,
        severity -> Varchar,
        description -> Text,
        /// JSON array of recommendation strings, in order.
        recommendations -> Jsonb,
        image_url -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One counter row per user, created on the first recorded scan.
    user_stats (id) {
        id -> Uuid,
        user_id -> Uuid,
        total_scans -> Int4,
        skin_scans -> Int4,
        eye_scans -> Int4,
        last_scan_at -> Nullable<Timestamptz>,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(scans -> users (user_id));
diesel::joinable!(user_stats -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(scans, user_stats, users);
