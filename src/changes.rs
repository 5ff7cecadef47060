use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, Sender};

/// Notification emitted by the store after a write has been committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ListsChanged,
    ItemsChanged { list_id: i64 },
    HistoryChanged { item_id: i64 },
}

/// Fan-out of store notifications to any number of subscribers.
/// Subscribers whose receiver has been dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct ChangeFeed {
    subscribers: RefCell<Vec<Sender<StoreEvent>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    pub fn publish(&self, event: StoreEvent) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_each_event() {
        let feed = ChangeFeed::new();
        let first = feed.subscribe();
        let second = feed.subscribe();

        feed.publish(StoreEvent::ListsChanged);
        feed.publish(StoreEvent::ItemsChanged { list_id: 4 });

        for rx in [first, second] {
            let seen: Vec<_> = rx.try_iter().collect();
            assert_eq!(seen, vec![StoreEvent::ListsChanged, StoreEvent::ItemsChanged { list_id: 4 }]);
        }
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let feed = ChangeFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(StoreEvent::HistoryChanged { item_id: 1 });

        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(StoreEvent::HistoryChanged { item_id: 1 }));
    }
}
