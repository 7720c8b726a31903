//! Publish/subscribe channel for game notifications.

/// Notifications published by a [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Base hit points changed by the given amount.
    BaseHealthChanged(i32),
    /// The displayed base health should be refreshed.
    BaseHealthTextUpdate,
    FreezeEnemies,
    LevelEnd,
    GameOver,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Delivers each published event to every subscriber, in subscription
/// order.
pub struct EventBus<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscriber. Returns whether it was still subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &E) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }

    /// Drop every subscriber.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_receive_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let a = Rc::clone(&seen);
        bus.subscribe(move |e: &GameEvent| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&seen);
        bus.subscribe(move |e: &GameEvent| b.borrow_mut().push(("b", *e)));

        bus.publish(&GameEvent::BaseHealthChanged(-1));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("a", GameEvent::BaseHealthChanged(-1)),
                ("b", GameEvent::BaseHealthChanged(-1))
            ]
        );
    }

    #[test]
    fn unsubscribed_handlers_stay_silent() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_: &GameEvent| *c.borrow_mut() += 1);
        bus.publish(&GameEvent::LevelEnd);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&GameEvent::LevelEnd);
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn clear_drops_everyone() {
        let mut bus: EventBus<GameEvent> = EventBus::new();
        bus.subscribe(|_| {});
        bus.subscribe(|_| {});
        assert_eq!(bus.len(), 2);
        bus.clear();
        bus.publish(&GameEvent::GameOver);
        assert!(bus.is_empty());
    }
}
