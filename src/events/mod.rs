use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Cloneable handle for publishing domain events onto the in-process channel.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Publishes after a committed write. A closed channel is logged and
    /// otherwise ignored; the write itself already succeeded.
    pub async fn publish(&self, event: Event) {
        let name = event.name();
        match self.send(event).await {
            Ok(()) => counter!("transport_events_published_total", 1, "event" => name),
            Err(e) => {
                counter!("transport_events_dropped_total", 1, "event" => name);
                warn!(event = name, error = %e, "Failed to publish event");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(i32),
    OrderUpdated(i32),
    OrderStatusChanged {
        order_id: i32,
        old_status: String,
        new_status: String,
    },
    OrderDeleted(i32),
    BuiltyCreated {
        builty_id: i32,
        order_id: i32,
    },
    BuiltyUpdated {
        builty_id: i32,
        order_id: i32,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderCreated(_) => "order_created",
            Event::OrderUpdated(_) => "order_updated",
            Event::OrderStatusChanged { .. } => "order_status_changed",
            Event::OrderDeleted(_) => "order_deleted",
            Event::BuiltyCreated { .. } => "builty_created",
            Event::BuiltyUpdated { .. } => "builty_updated",
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCreated(order_id) => info!(order_id, "Order created"),
            Event::OrderUpdated(order_id) => info!(order_id, "Order updated"),
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(order_id, %old_status, %new_status, "Order status changed"),
            Event::OrderDeleted(order_id) => info!(order_id, "Order deleted"),
            Event::BuiltyCreated { builty_id, order_id } => {
                info!(builty_id, order_id, "Builty created; order dispatched")
            }
            Event::BuiltyUpdated { builty_id, order_id } => {
                info!(builty_id, order_id, "Builty updated")
            }
        }
        debug!(event = ?event, "Event processed");
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender.publish(Event::OrderCreated(7)).await;

        assert_eq!(rx.recv().await, Some(Event::OrderCreated(7)));
    }

    #[tokio::test]
    async fn publish_to_closed_channel_does_not_fail() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        sender.publish(Event::OrderDeleted(1)).await;
        assert!(sender.send(Event::OrderDeleted(1)).await.is_err());
    }

    #[tokio::test]
    async fn processor_exits_when_senders_drop() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(process_events(rx));
        tx.send(Event::BuiltyCreated {
            builty_id: 1,
            order_id: 2,
        })
        .await
        .unwrap();
        drop(tx);

        handle.await.unwrap();
    }
}
