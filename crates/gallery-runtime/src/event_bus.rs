//! Queue of gameplay events raised during one update

use crate::event::GameEvent;

/// Filled by the scene while it updates, emptied by the orchestrator
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.queue
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RetireCause;

    #[test]
    fn test_events_keep_push_order() {
        let mut bus = EventBus::new();
        bus.push(GameEvent::BulletFired { slot: 2 });
        bus.push(GameEvent::TargetHit {
            target: 0,
            slot: 2,
            score: 1,
        });
        bus.push(GameEvent::BulletRetired {
            slot: 2,
            cause: RetireCause::Hit,
        });

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.pending()[0], GameEvent::BulletFired { slot: 2 });
        let drained = bus.drain();
        assert!(matches!(drained[2], GameEvent::BulletRetired { cause: RetireCause::Hit, .. }));
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut bus = EventBus::new();
        bus.push(GameEvent::PoolExhausted);
        assert_eq!(bus.drain().len(), 1);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }
}
