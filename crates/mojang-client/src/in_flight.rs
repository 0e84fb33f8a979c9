//! Registry of usernames currently being fetched upstream
//!
//! The first resolve call that misses the cache on a username becomes its
//! owner and fetches it; concurrent calls missing on the same username wait
//! on the owner's channel instead of issuing a duplicate upstream request.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mojang_uuid::PlayerId;
use tokio::sync::watch;

use crate::types::Diagnostic;

/// What the owner of a username learned from upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shared {
    /// Answered by the API: the id, or `None` for an account that does not exist
    Resolved(Option<PlayerId>),
    /// Soft failure, narrowed to the one username
    Failed(Diagnostic),
    /// The owner stopped before getting an answer; waiters look it up themselves
    Abandoned,
}

/// `None` while pending
pub(crate) type Slot = Option<Shared>;

#[derive(Default)]
pub(crate) struct InFlight {
    pending: Mutex<HashMap<String, watch::Receiver<Slot>>>,
}

/// Usernames split between the ones this call must fetch and the ones
/// another call is already fetching
pub(crate) struct Claim<'a> {
    pub(crate) owned: Vec<String>,
    pub(crate) waiting: Vec<(String, watch::Receiver<Slot>)>,
    pub(crate) lease: Lease<'a>,
}

/// Ownership of claimed usernames; releases them from the registry on drop.
///
/// Usernames still unpublished at drop are marked [`Shared::Abandoned`],
/// unless the lease was [`failed`](Lease::fail), in which case their waiters
/// see a closed channel.
pub(crate) struct Lease<'a> {
    registry: &'a InFlight,
    senders: HashMap<String, watch::Sender<Slot>>,
    failed: bool,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, watch::Receiver<Slot>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the given usernames, deduplicated in first-occurrence order
    pub(crate) fn claim<I, S>(&self, usernames: I) -> Claim<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut owned = Vec::new();
        let mut waiting = Vec::new();
        let mut senders = HashMap::new();

        let mut pending = self.lock();
        for name in usernames {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                continue;
            }
            if let Some(rx) = pending.get(name) {
                waiting.push((name.to_string(), rx.clone()));
                continue;
            }
            let (tx, rx) = watch::channel(None);
            pending.insert(name.to_string(), rx);
            senders.insert(name.to_string(), tx);
            owned.push(name.to_string());
        }

        Claim {
            owned,
            waiting,
            lease: Lease {
                registry: self,
                senders,
                failed: false,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Lease<'_> {
    pub(crate) fn publish(&self, username: &str, outcome: Shared) {
        if let Some(tx) = self.senders.get(username) {
            tx.send_replace(Some(outcome));
        }
    }

    /// Release after a hard error; unpublished usernames are not handed on
    pub(crate) fn fail(mut self) {
        self.failed = true;
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let mut pending = self.registry.lock();
        for (name, tx) in self.senders.drain() {
            pending.remove(&name);
            if self.failed {
                continue;
            }
            tx.send_if_modified(|slot| {
                if slot.is_some() {
                    return false;
                }
                *slot = Some(Shared::Abandoned);
                true
            });
        }
    }
}

/// Wait for the owner of a username to publish; `None` if it hard-failed
pub(crate) async fn wait_for_owner(mut rx: watch::Receiver<Slot>) -> Option<Shared> {
    match rx.wait_for(Option::is_some).await {
        Ok(slot) => (*slot).clone(),
        Err(_) => None,
    }
}
