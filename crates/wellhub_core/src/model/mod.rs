//! Typed record payloads for every built-in collection.
//!
//! # Responsibility
//! - Define the wire shape (camelCase JSON) of each tracker record.
//! - Bind each payload to its collection via `CollectionRecord`.
//!
//! # Invariants
//! - Payloads never carry their own `id`; `Record<T>` adds the store id.
//! - Cross-collection links are free-text `related_tags`, never ids.

pub mod advocacy;
pub mod flare;
pub mod goals;
pub mod habit;
pub mod health;
pub mod journal;
pub mod record;
