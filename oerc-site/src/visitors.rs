//! Visitor registry
//!
//! A visitor is one browser session. Each owns independent library, admin and
//! chat state, each behind its own lock so unrelated calls overlap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::views::{AdminView, ChatTranscript, LibraryView};

pub struct Visitor {
    pub id: Uuid,
    pub library: Arc<Mutex<LibraryView>>,
    pub admin: Arc<Mutex<AdminView>>,
    pub chat: Arc<Mutex<ChatTranscript>>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Visitor {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            library: Arc::default(),
            admin: Arc::default(),
            chat: Arc::default(),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_seen.lock() {
            *last = Instant::now();
        }
    }

    fn idle_for(&self, now: Instant) -> Duration {
        match self.last_seen.lock() {
            Ok(last) => now.saturating_duration_since(*last),
            Err(_) => Duration::ZERO,
        }
    }
}

#[derive(Default)]
pub struct VisitorRegistry {
    visitors: RwLock<HashMap<Uuid, Arc<Visitor>>>,
}

impl VisitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh visitor
    pub async fn create(&self) -> Arc<Visitor> {
        let visitor = Arc::new(Visitor::new(Uuid::new_v4()));
        self.visitors
            .write()
            .await
            .insert(visitor.id, Arc::clone(&visitor));
        debug!(visitor_id = %visitor.id, "Visitor registered");
        visitor
    }

    /// Look up a visitor and mark it active
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Visitor>> {
        let visitor = self.visitors.read().await.get(id).cloned()?;
        visitor.touch();
        Some(visitor)
    }

    /// Drop visitors idle longer than `max_idle`; returns how many
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut visitors = self.visitors.write().await;
        let before = visitors.len();
        visitors.retain(|_, v| v.idle_for(now) <= max_idle);
        let pruned = before - visitors.len();
        if pruned > 0 {
            info!(pruned, remaining = visitors.len(), "Pruned idle visitors");
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.visitors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.visitors.read().await.is_empty()
    }
}
