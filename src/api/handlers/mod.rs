//! API handlers for qadmin.

pub mod admin;
pub mod health;
