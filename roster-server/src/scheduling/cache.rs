//! Shift window cache
//!
//! Caches `list_shifts` results per (restaurant, window). Each restaurant has
//! a generation counter; a fill records the generation it started under and
//! is discarded if an invalidation happened before it completes.

use dashmap::DashMap;
use shared::models::{DateRange, Shift};
use std::sync::Arc;

/// Default number of cached windows across all restaurants
pub const DEFAULT_CAPACITY: usize = 256;

type WindowKey = (i64, DateRange);

/// Proof that a fill started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTicket {
    restaurant_id: i64,
    range: DateRange,
    generation: u64,
}

#[derive(Debug)]
pub struct ShiftWindowCache {
    windows: DashMap<WindowKey, Arc<Vec<Shift>>>,
    /// restaurant_id -> generation
    generations: DashMap<i64, u64>,
    capacity: usize,
}

impl ShiftWindowCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            windows: DashMap::new(),
            generations: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, restaurant_id: i64, range: DateRange) -> Option<Arc<Vec<Shift>>> {
        self.windows
            .get(&(restaurant_id, range))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Current generation (0 when never invalidated)
    pub fn generation(&self, restaurant_id: i64) -> u64 {
        self.generations.get(&restaurant_id).map(|g| *g).unwrap_or(0)
    }

    /// Start a fill; call before reading from the store
    pub fn begin_fill(&self, restaurant_id: i64, range: DateRange) -> FillTicket {
        FillTicket {
            restaurant_id,
            range,
            generation: self.generation(restaurant_id),
        }
    }

    /// Store the fetched window unless it was invalidated meanwhile
    ///
    /// Returns `false` when the fill was stale and dropped.
    pub fn complete_fill(&self, ticket: FillTicket, shifts: Arc<Vec<Shift>>) -> bool {
        // Generation entry stays locked while inserting so an invalidation
        // cannot slip in between the check and the write.
        let current = self.generations.entry(ticket.restaurant_id).or_insert(0);
        if *current != ticket.generation {
            tracing::debug!(
                restaurant_id = ticket.restaurant_id,
                started = ticket.generation,
                current = *current,
                "Dropping stale shift window fill"
            );
            return false;
        }

        if self.windows.len() >= self.capacity {
            self.evict_one();
        }
        self.windows
            .insert((ticket.restaurant_id, ticket.range), shifts);
        true
    }

    /// Invalidate every cached window of `restaurant_id` containing `date`
    pub fn invalidate(&self, restaurant_id: i64, date: chrono::NaiveDate) {
        let mut generation = self.generations.entry(restaurant_id).or_insert(0);
        *generation += 1;
        self.windows
            .retain(|(rid, range), _| !(*rid == restaurant_id && range.contains(date)));
    }

    /// Invalidate every cached window of `restaurant_id`
    pub fn invalidate_restaurant(&self, restaurant_id: i64) {
        let mut generation = self.generations.entry(restaurant_id).or_insert(0);
        *generation += 1;
        self.windows.retain(|(rid, _), _| *rid != restaurant_id);
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn evict_one(&self) {
        let victim = self.windows.iter().next().map(|entry| *entry.key());
        if let Some(key) = victim {
            self.windows.remove(&key);
        }
    }
}

impl Default for ShiftWindowCache {
    fn default() -> Self {
        Self::new()
    }
}
