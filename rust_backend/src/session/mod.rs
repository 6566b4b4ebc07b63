//! Interactive session state.
//!
//! One [`SessionStore`] lives for the duration of a user session. It is only
//! mutated by explicit actions: loading a TDT and uploading a historian export.

pub mod store;

pub use store::{SessionStore, TdtTransition};
