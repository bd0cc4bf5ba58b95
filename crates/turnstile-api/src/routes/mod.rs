//! # API Route Modules
//!
//! - `login`: credential login and token check. Whitelisted.
//! - `alive`: liveness check (whitelisted) and identity endpoints for the
//!   authenticated caller.

pub mod alive;
pub mod login;
