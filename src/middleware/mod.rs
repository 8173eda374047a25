//! Request middleware
//!
//! Provides request logging.

pub mod logging;
