//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Reference table of account roles: `1` Manager, `2` Customer.
    roles (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Unique, compared case-insensitively via a functional index.
        email -> Varchar,
        phone -> Varchar,
        /// bcrypt hash; never leaves the persistence and account layers.
        password_hash -> Varchar,
        role_id -> Int8,
    }
}

diesel::table! {
    loan_types (id) {
        id -> Int8,
        label -> Varchar,
    }
}

diesel::table! {
    /// Seeded with `1` Pending, `2` Approved, `3` Rejected.
    loan_statuses (id) {
        id -> Int8,
        label -> Varchar,
    }
}

diesel::table! {
    loans (id) {
        id -> Int8,
        /// `NUMERIC(15,2)`.
        amount -> Numeric,
        term -> Int4,
        user_id -> Int8,
        loan_type_id -> Int8,
        status_id -> Int8,
    }
}

diesel::joinable!(users -> roles (role_id));
diesel::joinable!(loans -> users (user_id));
diesel::joinable!(loans -> loan_types (loan_type_id));
diesel::joinable!(loans -> loan_statuses (status_id));

diesel::allow_tables_to_appear_in_same_query!(roles, users, loan_types, loan_statuses, loans);
