//! Non-blocking debounce: each action remembers when it last fired.

use std::{
    collections::HashMap,
    hash::Hash,
    time::{Duration, Instant},
};

#[derive(Debug)]
pub struct Cooldown<K> {
    period: Duration,
    last_fired: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Copy> Cooldown<K> {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: HashMap::new(),
        }
    }

    /// Returns true and records `now` when `key` is outside its cooldown window.
    pub fn try_fire(&mut self, key: K, now: Instant) -> bool {
        match self.last_fired.get(&key) {
            Some(&last) if now.saturating_duration_since(last) < self.period => false,
            _ => {
                self.last_fired.insert(key, now);
                true
            }
        }
    }
}
