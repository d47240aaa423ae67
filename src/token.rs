//! Token primitives: redacted secrets, renewed pairs, and the two storage slots.

pub mod pair;
pub mod secret;

pub use pair::*;
pub use secret::*;
