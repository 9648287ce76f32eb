//! Everything that happens on a data connection once it is up.

pub mod ascii;
pub mod executor;
pub mod listing;

pub use executor::{execute, TransferOperation};
