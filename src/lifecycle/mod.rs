//! Runtime orchestration: wiring the store, coordinator, oracle and
//! persistence into a running system, and tearing it down again.

pub mod cart_system;
pub mod tracing;

pub use self::cart_system::*;
pub use self::tracing::*;
