//! Pure data structures (DTOs) for the cart domain.

pub mod line;
pub mod product;

pub use line::*;
pub use product::*;
