use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Connected WebSocket clients, each with an outbound channel.
pub struct ClientRegistry {
    clients: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl ClientRegistry {
    /// Create a new registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            clients: DashMap::new(),
        })
    }

    /// Register a new client.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> Uuid {
        let client_id = Uuid::new_v4();
        self.clients.insert(client_id, tx);
        client_id
    }

    /// Unregister a client.
    pub fn unregister(&self, client_id: Uuid) {
        self.clients.remove(&client_id);
    }

    /// Send to one client. Returns false if the client is gone.
    pub fn send(&self, client_id: Uuid, msg: &str) -> bool {
        match self.clients.get(&client_id) {
            Some(tx) => tx.send(msg.to_string()).is_ok(),
            None => false,
        }
    }

    /// Send to every client, dropping the ones whose channel has closed.
    /// Returns the number of clients reached.
    pub fn broadcast(&self, msg: &str) -> usize {
        let mut sent = 0;
        self.clients.retain(|_, tx| {
            let ok = tx.send(msg.to_string()).is_ok();
            if ok {
                sent += 1;
            }
            ok
        });
        sent
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_send() {
        let registry = ClientRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = registry.register(tx);

        assert_eq!(registry.len(), 1);
        assert!(registry.send(id, "hello"));
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_broadcast_drops_closed_clients() {
        let registry = ClientRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        registry.register(tx1);
        registry.register(tx2);
        drop(rx2);

        assert_eq!(registry.broadcast("tick"), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(rx1.try_recv().unwrap(), "tick");
    }

    #[test]
    fn test_unregister() {
        let registry = ClientRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx);
        registry.unregister(id);
        assert!(registry.is_empty());
        assert!(!registry.send(id, "x"));
    }
}
