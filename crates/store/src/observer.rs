//! Change subscriptions.
//!
//! Each subscriber gets its own channel and a copy of every event (broadcast).
//! Subscribers whose receiving end has been dropped are pruned on publish.

use std::sync::{Mutex, mpsc};

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: mpsc::Receiver<M>,
}

impl<M> Subscription<M> {
    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Everything published since the last call, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Sending side: the list of live subscribers.
#[derive(Debug)]
pub struct Subscribers<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> Default for Subscribers<M> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M: Clone> Subscribers<M> {
    pub fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        match self.senders.lock() {
            Ok(mut senders) => senders.push(tx),
            Err(_) => tracing::error!("subscriber list lock poisoned; subscription will stay silent"),
        }
        Subscription { receiver: rx }
    }

    pub fn publish(&self, message: &M) {
        if let Ok(mut senders) = self.senders.lock() {
            senders.retain(|tx| tx.send(message.clone()).is_ok());
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.senders.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_every_message() {
        let subscribers = Subscribers::default();
        let a = subscribers.subscribe();
        let b = subscribers.subscribe();

        subscribers.publish(&1);
        subscribers.publish(&2);

        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.drain(), vec![1, 2]);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let subscribers = Subscribers::default();
        let keep = subscribers.subscribe();
        drop(subscribers.subscribe());
        assert_eq!(subscribers.len(), 2);

        subscribers.publish(&"changed");
        assert_eq!(subscribers.len(), 1);
        assert_eq!(keep.recv().unwrap(), "changed");
    }
}
