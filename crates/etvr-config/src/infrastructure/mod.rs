//! Infrastructure adapters.
//!
//! - **`storage`** – settings file persistence with backup and fallback.

pub mod storage;
