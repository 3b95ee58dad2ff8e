//! Order intake.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{TimeZone, Utc};
use tracing::{info, warn};

use guriri_types::error::RepositoryError;
use guriri_types::event::{OutboundEvent, RoomEvent};
use guriri_types::order::{NewOrder, Order};

use crate::repository::order::OrderRepository;
use crate::room::connection::RoomConnection;
use crate::room::registry::RoomRegistry;

/// Creates orders and broadcasts `new_pedido` to every room.
///
/// Order ids are the creation time in epoch milliseconds, bumped by one when
/// two orders land in the same millisecond so ids stay unique per process.
pub struct OrderService<O: OrderRepository, C: RoomConnection> {
    orders: Arc<O>,
    registry: Arc<RoomRegistry<C>>,
    last_id: AtomicI64,
}

impl<O: OrderRepository, C: RoomConnection> OrderService<O, C> {
    pub fn new(orders: Arc<O>, registry: Arc<RoomRegistry<C>>) -> Self {
        Self {
            orders,
            registry,
            last_id: AtomicI64::new(0),
        }
    }

    pub async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let id = self.next_id(Utc::now().timestamp_millis());
        let created_at = Utc
            .timestamp_millis_opt(id)
            .single()
            .unwrap_or_else(Utc::now);
        let order = Order::from_new(id.to_string(), new, created_at);

        if let Err(err) = self.orders.create_order(&order).await {
            warn!(order_id = %order.id, error = %err, "Failed to persist order");
            return Err(err);
        }

        let report = self
            .registry
            .broadcast_all(&OutboundEvent::now(RoomEvent::NewPedido(order.clone())))
            .await;
        info!(order_id = %order.id, delivered = report.delivered, "Order created");
        Ok(order)
    }

    pub async fn count_orders(&self) -> Result<i64, RepositoryError> {
        self.orders.count_orders().await
    }

    fn next_id(&self, now_ms: i64) -> i64 {
        let mut current = self.last_id.load(Ordering::SeqCst);
        loop {
            let candidate = now_ms.max(current + 1);
            match self.last_id.compare_exchange(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryOrders, RecordingConnection};

    fn service() -> (
        OrderService<InMemoryOrders, RecordingConnection>,
        Arc<InMemoryOrders>,
        Arc<RoomRegistry<RecordingConnection>>,
    ) {
        let orders = Arc::new(InMemoryOrders::default());
        let registry = Arc::new(RoomRegistry::new());
        (
            OrderService::new(orders.clone(), registry.clone()),
            orders,
            registry,
        )
    }

    #[tokio::test]
    async fn test_order_is_persisted_and_announced_to_every_room() {
        let (service, orders, registry) = service();
        let a = RecordingConnection::new();
        let b = RecordingConnection::new();
        registry.admit("central", a.clone()).await;
        registry.admit("order-9", b.clone()).await;

        let order = service
            .create_order(NewOrder {
                cliente: Some("Ana".into()),
                coleta: Some("Rua A".into()),
                entrega: None,
                obs: None,
            })
            .await
            .unwrap();

        assert_eq!(orders.all(), vec![order.clone()]);
        assert!(order.id.parse::<i64>().is_ok());
        for conn in [&a, &b] {
            let events = conn.of_type("new_pedido");
            assert_eq!(events.len(), 1);
            assert_eq!(events[0]["payload"]["id"], order.id.as_str());
            assert_eq!(events[0]["payload"]["cliente"], "Ana");
            assert!(events[0]["payload"]["entrega"].is_null());
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_returned_and_nothing_is_broadcast() {
        let (service, orders, registry) = service();
        let conn = RecordingConnection::new();
        registry.admit("central", conn.clone()).await;
        conn.clear();
        orders.fail_writes();

        assert!(service.create_order(NewOrder::default()).await.is_err());
        assert!(conn.frames().is_empty());
    }

    #[tokio::test]
    async fn test_rapid_orders_get_distinct_increasing_ids() {
        let (service, orders, _) = service();
        let mut ids = Vec::new();
        for _ in 0..20 {
            ids.push(
                service
                    .create_order(NewOrder::default())
                    .await
                    .unwrap()
                    .id
                    .parse::<i64>()
                    .unwrap(),
            );
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(service.count_orders().await.unwrap(), 20);
        assert_eq!(orders.all().len(), 20);
    }

    #[test]
    fn test_next_id_never_goes_backwards() {
        let (service, _, _) = service();
        assert_eq!(service.next_id(1_000), 1_000);
        assert_eq!(service.next_id(1_000), 1_001);
        assert_eq!(service.next_id(900), 1_002);
        assert_eq!(service.next_id(5_000), 5_000);
    }
}
