use std::sync::Arc;

use tracing::{error, info, warn};

use crate::coordinator::ValidationCoordinator;
use crate::oracle::StockOracle;
use crate::persistence::SnapshotStore;
use crate::pricing::PricingPolicy;
use crate::store::{self, CartClient};

/// The running cart engine: store actor, coordinator, and collaborators.
///
/// There is no ambient global cart. Each `CartSystem` owns one store
/// instance with an explicit lifecycle, so tests (and multiple UI
/// surfaces) can run fully isolated systems side by side.
///
/// # Example
///
/// ```ignore
/// let system = CartSystem::start(oracle, persistence).await;
/// system.coordinator.validate_quantity("p1", 3).await?;
/// system.shutdown().await?;
/// ```
pub struct CartSystem {
    /// Client for direct cart reads and non-validated mutations.
    pub cart: CartClient,

    /// Entry point for user-driven quantity changes.
    pub coordinator: ValidationCoordinator,

    /// Task handle for the store actor (used for graceful shutdown).
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Starts a system with the default pricing policy.
    ///
    /// Rehydrates the cart from `persistence`; an unreadable or malformed
    /// snapshot starts an empty cart and is never an error past this
    /// boundary.
    pub async fn start(
        oracle: Arc<dyn StockOracle>,
        persistence: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self::start_with_policy(oracle, persistence, PricingPolicy::default()).await
    }

    /// Starts a system with an explicit pricing policy.
    pub async fn start_with_policy(
        oracle: Arc<dyn StockOracle>,
        persistence: Arc<dyn SnapshotStore>,
        pricing: PricingPolicy,
    ) -> Self {
        let initial = match persistence.load().await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, "Snapshot unreadable, starting with an empty cart");
                Vec::new()
            }
        };

        let (store, cart) = store::new(pricing, persistence, initial);
        let handle = tokio::spawn(store.run());
        let coordinator = ValidationCoordinator::new(cart.clone(), oracle);

        info!("Cart system started");
        Self {
            cart,
            coordinator,
            handle,
        }
    }

    /// Gracefully shuts the system down.
    ///
    /// Dropping the clients closes the store's channel; the actor drains
    /// its queue and exits, and we wait for it.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cart system...");
        drop(self.cart);
        drop(self.coordinator);

        if let Err(e) = self.handle.await {
            error!("Cart store task failed: {:?}", e);
            return Err(format!("Cart store task failed: {e:?}"));
        }
        info!("Cart system shutdown complete");
        Ok(())
    }
}
