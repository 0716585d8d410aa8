//! Value types shared by the relay crates.

mod amount;

pub use amount::{Amount, AmountError};
