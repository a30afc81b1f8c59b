//! Shared utilities and common types for the report assistant backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token and report identifier generation
//! - Password hashing with Argon2id
//! - Common validation logic

pub mod crypto;
pub mod password;
pub mod validation;
