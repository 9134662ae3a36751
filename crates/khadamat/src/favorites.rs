//! Optimistic favorites: a local overlay in front of the server's list.
//!
//! A toggle flips the overlay at call time and only then sends the mutation,
//! so list screens drop an unfavorited worker immediately. When the mutation
//! fails the entry is put back, unless a newer toggle for the same worker has
//! been issued in the meantime. Dropping the mutation before it settles
//! reverts the flip the same way, so the entry rejoins `sync`.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::{MaidId, MaidSummary};

/// Server side of a favorite toggle; resolves to the confirmed state.
pub trait FavoritesBackend: Send + Sync {
    fn toggle(&self, id: &MaidId) -> impl Future<Output = Result<bool, ApiError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OverlayEntry {
    favorited: bool,
    pending: Option<u64>,
}

#[derive(Debug, Default)]
struct Overlay {
    entries: HashMap<MaidId, OverlayEntry>,
    generation: u64,
}

/// Handle for one in-flight toggle.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    generation: u64,
    previous: bool,
}

/// Owned by the toggle future; reverts the flip if the future is dropped
/// before the backend answers.
struct Inflight<'a, B> {
    reconciler: &'a FavoritesReconciler<B>,
    id: MaidId,
    ticket: Ticket,
    settled: bool,
}

impl<B> Drop for Inflight<'_, B> {
    fn drop(&mut self) {
        if !self.settled {
            self.reconciler.abandon(&self.id, self.ticket);
        }
    }
}

pub struct FavoritesReconciler<B> {
    backend: Arc<B>,
    overlay: Mutex<Overlay>,
    revision: watch::Sender<u64>,
}

impl<B> FavoritesReconciler<B>
where
    B: FavoritesBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            overlay: Mutex::new(Overlay::default()),
            revision,
        }
    }

    /// Bumped on every overlay change; list screens re-filter when it moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Adopts the server's favorites for every worker without a mutation in
    /// flight.
    pub fn sync<I>(&self, server_ids: I)
    where
        I: IntoIterator<Item = MaidId>,
    {
        let server: HashSet<MaidId> = server_ids.into_iter().collect();
        {
            let mut overlay = self.overlay.lock().expect("favorites mutex poisoned");
            for (id, entry) in overlay.entries.iter_mut() {
                if entry.pending.is_none() {
                    entry.favorited = server.contains(id);
                }
            }
            for id in server {
                overlay.entries.entry(id).or_insert(OverlayEntry {
                    favorited: true,
                    pending: None,
                });
            }
        }
        self.bump();
    }

    pub fn check_is_favorite(&self, id: &MaidId) -> bool {
        let overlay = self.overlay.lock().expect("favorites mutex poisoned");
        overlay
            .entries
            .get(id)
            .is_some_and(|entry| entry.favorited)
    }

    pub fn is_pending(&self, id: &MaidId) -> bool {
        let overlay = self.overlay.lock().expect("favorites mutex poisoned");
        overlay
            .entries
            .get(id)
            .is_some_and(|entry| entry.pending.is_some())
    }

    /// Filters the server-reported list through the overlay. Workers the
    /// overlay has never seen are shown as the server reports them.
    pub fn visible(&self, server_items: &[MaidSummary]) -> Vec<MaidSummary> {
        let overlay = self.overlay.lock().expect("favorites mutex poisoned");
        server_items
            .iter()
            .filter(|item| {
                overlay
                    .entries
                    .get(&item.id)
                    .map_or(true, |entry| entry.favorited)
            })
            .cloned()
            .collect()
    }

    /// Flips the overlay now and returns the mutation to drive. The future
    /// resolves to the server-confirmed state; dropping it unsettled undoes
    /// the flip.
    pub fn toggle(
        &self,
        id: &MaidId,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send + '_ {
        let ticket = self.flip(id);
        let mut inflight = Inflight {
            reconciler: self,
            id: id.clone(),
            ticket,
            settled: false,
        };
        async move {
            let outcome = self.backend.toggle(&inflight.id).await;
            inflight.settled = true;
            self.settle(&inflight.id, inflight.ticket, outcome)
        }
    }

    fn flip(&self, id: &MaidId) -> Ticket {
        let ticket = {
            let mut overlay = self.overlay.lock().expect("favorites mutex poisoned");
            overlay.generation += 1;
            let generation = overlay.generation;
            let entry = overlay.entries.entry(id.clone()).or_insert(OverlayEntry {
                favorited: false,
                pending: None,
            });
            let previous = entry.favorited;
            entry.favorited = !previous;
            entry.pending = Some(generation);
            Ticket {
                generation,
                previous,
            }
        };
        debug!(maid_id = %id, favorited = !ticket.previous, "favorite toggled optimistically");
        self.bump();
        ticket
    }

    fn settle(
        &self,
        id: &MaidId,
        ticket: Ticket,
        outcome: Result<bool, ApiError>,
    ) -> Result<bool, ApiError> {
        {
            let mut overlay = self.overlay.lock().expect("favorites mutex poisoned");
            if let Some(entry) = overlay.entries.get_mut(id) {
                if entry.pending == Some(ticket.generation) {
                    entry.pending = None;
                    match &outcome {
                        Ok(confirmed) => entry.favorited = *confirmed,
                        Err(err) => {
                            warn!(maid_id = %id, error = %err, "favorite toggle failed, reverting");
                            entry.favorited = ticket.previous;
                        }
                    }
                }
            }
        }
        self.bump();
        outcome
    }

}

impl<B> FavoritesReconciler<B> {
    fn abandon(&self, id: &MaidId, ticket: Ticket) {
        let reverted = {
            let mut overlay = self.overlay.lock().expect("favorites mutex poisoned");
            match overlay.entries.get_mut(id) {
                Some(entry) if entry.pending == Some(ticket.generation) => {
                    entry.pending = None;
                    entry.favorited = ticket.previous;
                    true
                }
                _ => false,
            }
        };
        if reverted {
            debug!(maid_id = %id, "favorite toggle dropped before settling, reverted");
            self.bump();
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
