//! End-to-end tests: full system with a timed oracle and real snapshot
//! persistence.

use std::sync::Arc;
use std::time::Duration;

use cart_engine::lifecycle::CartSystem;
use cart_engine::model::Product;
use cart_engine::oracle::InMemoryOracle;
use cart_engine::persistence::{InMemoryStore, JsonFileStore, SnapshotStore};
use cart_engine::store::{AddOutcome, ValidationOutcome};

fn product(id: &str, name: &str, price: u64, stock: u32) -> Product {
    Product::new(id, name, "pc", price, stock)
}

/// The full checkout-path scenario: add, grow, stock drops, clamp.
#[tokio::test]
async fn end_to_end_add_grow_clamp() {
    let oracle = Arc::new(InMemoryOracle::with_latency(Duration::from_millis(5)));
    oracle.insert("p1", 500, 3);

    let system = CartSystem::start(oracle.clone(), Arc::new(InMemoryStore::new())).await;

    // Empty cart, then one unit at 500.
    assert_eq!(system.cart.item_count().await.unwrap(), 0);
    let outcome = system.cart.add_item(product("p1", "Basmati Rice", 500, 3)).await.unwrap();
    assert!(matches!(outcome, AddOutcome::Added(_)));

    let totals = system.cart.totals().await.unwrap();
    assert_eq!(totals.subtotal, 500);
    assert_eq!(totals.total, 650); // below the free-delivery threshold

    // Grow to the full known stock.
    let outcome = system.coordinator.validate_quantity("p1", 3).await.unwrap();
    assert!(matches!(outcome, ValidationOutcome::Validated(_)));
    let totals = system.cart.totals().await.unwrap();
    assert_eq!(totals.subtotal, 1500);
    assert_eq!(totals.total, 1650);

    // Stock drops to 2 behind the cart's back; the next validation clamps.
    oracle.set_stock("p1", 2);
    let outcome = system.coordinator.validate_quantity("p1", 3).await.unwrap();
    assert!(matches!(
        outcome,
        ValidationOutcome::Clamped { requested: 3, available: 2, .. }
    ));
    let totals = system.cart.totals().await.unwrap();
    assert_eq!(totals.subtotal, 1000);
    assert_eq!(totals.total, 1150);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn crossing_the_free_delivery_threshold() {
    let oracle = Arc::new(InMemoryOracle::new());
    oracle.insert("p1", 1000, 10);

    let system = CartSystem::start(oracle, Arc::new(InMemoryStore::new())).await;
    system.cart.add_item(product("p1", "Ghee", 1000, 10)).await.unwrap();

    // 1000: fee applies.
    let totals = system.cart.totals().await.unwrap();
    assert_eq!(totals.delivery_charge, 150);

    // 2000: exactly at the threshold ships free.
    system.coordinator.validate_quantity("p1", 2).await.unwrap();
    let totals = system.cart.totals().await.unwrap();
    assert_eq!(totals.subtotal, 2000);
    assert_eq!(totals.delivery_charge, 0);
    assert_eq!(totals.total, 2000);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn cart_survives_a_restart_via_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");
    let oracle = Arc::new(InMemoryOracle::new());
    oracle.insert("p1", 60, 10);
    oracle.insert("p2", 90, 4);

    let system = CartSystem::start(oracle.clone(), Arc::new(JsonFileStore::new(path.clone()))).await;
    system.cart.add_item(product("p1", "Milk", 60, 10)).await.unwrap();
    system.cart.add_item(product("p2", "Rice", 90, 4)).await.unwrap();
    system.coordinator.validate_quantity("p1", 3).await.unwrap();

    // Shutdown flushes the queued snapshot saves.
    system.shutdown().await.unwrap();
    let persisted = JsonFileStore::new(path.clone()).load().await.unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].quantity, 3);

    // A fresh system over the same file rehydrates the cart.
    let restarted = CartSystem::start(oracle, Arc::new(JsonFileStore::new(path))).await;
    let lines = restarted.cart.lines().await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, "p1");
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[1].product_id, "p2");
    assert_eq!(restarted.cart.item_count().await.unwrap(), 4);

    restarted.shutdown().await.unwrap();
}

#[tokio::test]
async fn corrupt_snapshot_starts_an_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");
    tokio::fs::write(&path, b"][ definitely not json").await.unwrap();

    let system = CartSystem::start(
        Arc::new(InMemoryOracle::new()),
        Arc::new(JsonFileStore::new(path)),
    )
    .await;

    assert!(system.cart.lines().await.unwrap().is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn concurrent_validations_on_different_products() {
    let oracle = Arc::new(InMemoryOracle::with_latency(Duration::from_millis(20)));
    oracle.insert("p1", 100, 10);
    oracle.insert("p2", 200, 10);
    oracle.insert("p3", 300, 10);

    let system = CartSystem::start(oracle, Arc::new(InMemoryStore::new())).await;
    for (id, price) in [("p1", 100), ("p2", 200), ("p3", 300)] {
        system.cart.add_item(product(id, id, price, 10)).await.unwrap();
    }

    let mut handles = Vec::new();
    for (id, quantity) in [("p1", 2u32), ("p2", 4), ("p3", 6)] {
        let coordinator = system.coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator.validate_quantity(id, quantity).await
        }));
    }
    for handle in handles {
        assert!(matches!(
            handle.await.unwrap().unwrap(),
            ValidationOutcome::Validated(_)
        ));
    }

    let lines = system.cart.lines().await.unwrap();
    let quantities: Vec<_> = lines.iter().map(|l| l.quantity).collect();
    assert_eq!(quantities, [2, 4, 6]);

    system.shutdown().await.unwrap();
}

/// Checkout clears the cart; the cleared state is what gets snapshotted.
#[tokio::test]
async fn clear_after_checkout_persists_the_empty_cart() {
    let persistence = Arc::new(InMemoryStore::new());
    let oracle = Arc::new(InMemoryOracle::new());
    oracle.insert("p1", 500, 5);

    let system = CartSystem::start(oracle, persistence.clone()).await;
    system.cart.add_item(product("p1", "Flour", 500, 5)).await.unwrap();
    system.cart.clear().await.unwrap();

    assert_eq!(system.cart.item_count().await.unwrap(), 0);

    // Shutdown flushes the save queue; the add then the clear landed in
    // order, leaving the empty snapshot last.
    system.shutdown().await.unwrap();
    assert!(persistence.saved().is_empty());
    assert_eq!(persistence.save_count(), 2);
}
