//! Built-in functions.
//!
//! Each module registers its function with the inventory so the default
//! registry picks it up without a central list.

pub mod batch;
pub mod content;
pub mod count;
pub mod env;
pub mod field;
pub mod json;
pub mod literal;
pub mod meta;
pub mod random_int;
pub mod throw;
pub mod timestamp;
pub mod uuid;
pub mod var;
