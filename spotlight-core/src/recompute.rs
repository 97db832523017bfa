//! Coalescing recomputation of recommendations.
//!
//! Callers request a recompute for a user whenever that user's profile or
//! the catalog changes. [`RecomputeQueue`] keeps at most one pending entry
//! per user and stamps every request with a per-user generation, so a
//! result computed for an older generation can be recognised as stale.
//! [`RecomputeWorker`] drains the queue on a background thread, waits a
//! debounce window before computing, and only delivers results whose
//! ticket is still current.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    CandidateItem, CandidateSource, DEFAULT_RECOMMENDATION_COUNT, PreferenceService,
    ProfileStore, Recommendations, UserKey,
};

/// Debounce window used by [`WorkerConfig::default`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A request to recompute one user's recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecomputeTicket {
    user: UserKey,
    generation: u64,
}

impl RecomputeTicket {
    /// User whose recommendations should be recomputed.
    #[must_use]
    pub const fn user(&self) -> &UserKey {
        &self.user
    }

    /// Per-user sequence number; higher is newer.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<UserKey>,
    generations: HashMap<UserKey, u64>,
    closed: bool,
}

/// FIFO of users awaiting recomputation.
///
/// # Examples
/// ```
/// use spotlight_core::{RecomputeQueue, UserKey};
///
/// let queue = RecomputeQueue::new();
/// let user = UserKey::new("hal")?;
/// let first = queue.request(&user);
/// let second = queue.request(&user);
///
/// assert_eq!(queue.len(), 1);
/// assert!(!queue.is_current(&first));
/// assert!(queue.is_current(&second));
/// # Ok::<(), spotlight_core::UserKeyError>(())
/// ```
#[derive(Debug, Default)]
pub struct RecomputeQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl RecomputeQueue {
    /// Create an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `user` to be recomputed and return the new ticket.
    ///
    /// Every call supersedes the user's earlier tickets. A user already
    /// waiting keeps its place in the queue. Requests on a closed queue are
    /// ignored but still return a ticket, which is never delivered.
    #[expect(
        clippy::must_use_candidate,
        reason = "callers usually fire and forget; the ticket is optional"
    )]
    pub fn request(&self, user: &UserKey) -> RecomputeTicket {
        let mut state = self.lock();
        let generation = {
            let slot = state.generations.entry(user.clone()).or_insert(0);
            *slot += 1;
            *slot
        };
        if state.closed {
            log::debug!("recompute queue closed; dropping request for {user}");
        } else if state.pending.contains(user) {
            log::debug!("coalesced recompute for {user} into generation {generation}");
        } else {
            state.pending.push_back(user.clone());
            self.ready.notify_one();
        }
        RecomputeTicket {
            user: user.clone(),
            generation,
        }
    }

    /// Report whether `ticket` is still the user's latest request.
    #[must_use]
    pub fn is_current(&self, ticket: &RecomputeTicket) -> bool {
        self.lock().generations.get(&ticket.user) == Some(&ticket.generation)
    }

    /// Pop the next ticket without waiting.
    #[must_use]
    pub fn try_next(&self) -> Option<RecomputeTicket> {
        let mut state = self.lock();
        Self::pop(&mut state)
    }

    /// Block until a ticket is available or the queue is closed.
    ///
    /// Returns `None` once the queue is closed; pending entries are then
    /// abandoned.
    #[must_use]
    pub fn next(&self) -> Option<RecomputeTicket> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(ticket) = Self::pop(&mut state) {
                return Some(ticket);
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting work and wake every waiting consumer.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.pending.clear();
        self.ready.notify_all();
    }

    /// Report whether [`RecomputeQueue::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of users waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Report whether no user is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop(state: &mut QueueState) -> Option<RecomputeTicket> {
        let user = state.pending.pop_front()?;
        let generation = state.generations.get(&user).copied().unwrap_or_default();
        Some(RecomputeTicket { user, generation })
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settings for a [`RecomputeWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Delay between taking a ticket and computing it.
    pub debounce: Duration,
    /// Number of recommendations computed per user.
    pub limit: usize,
    /// Seed for cold-start shuffling; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            limit: DEFAULT_RECOMMENDATION_COUNT,
            seed: None,
        }
    }
}

/// Fresh recommendations delivered by a [`RecomputeWorker`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    /// Ticket the result was computed for.
    pub ticket: RecomputeTicket,
    /// The recommendations.
    pub recommendations: Recommendations,
}

/// Background thread turning queued tickets into recommendations.
#[derive(Debug)]
pub struct RecomputeWorker {
    queue: Arc<RecomputeQueue>,
    handle: Option<JoinHandle<()>>,
}

impl RecomputeWorker {
    /// Start a worker reading from `queue`.
    ///
    /// Results arrive on the returned receiver. Dropping the receiver stops
    /// the worker after its current ticket.
    ///
    /// # Errors
    /// Returns the I/O error raised when the thread cannot be spawned.
    pub fn spawn<S, C>(
        service: Arc<PreferenceService<S>>,
        catalog: Arc<C>,
        queue: Arc<RecomputeQueue>,
        config: WorkerConfig,
    ) -> std::io::Result<(Self, Receiver<Recomputed>)>
    where
        S: ProfileStore + 'static,
        C: CandidateSource + ?Sized + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let worker_queue = Arc::clone(&queue);
        let handle = thread::Builder::new()
            .name("spotlight-recompute".to_owned())
            .spawn(move || run(&service, catalog.as_ref(), &worker_queue, config, &sender))?;
        Ok((
            Self {
                queue,
                handle: Some(handle),
            },
            receiver,
        ))
    }

    /// Close the queue and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.queue.close();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("recompute worker panicked");
        }
    }
}

impl Drop for RecomputeWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S, C>(
    service: &PreferenceService<S>,
    catalog: &C,
    queue: &RecomputeQueue,
    config: WorkerConfig,
    sender: &Sender<Recomputed>,
) where
    S: ProfileStore,
    C: CandidateSource + ?Sized,
{
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    while let Some(ticket) = queue.next() {
        if !config.debounce.is_zero() {
            thread::sleep(config.debounce);
        }
        if !queue.is_current(&ticket) {
            log::debug!(
                "skipping superseded recompute {} for {}",
                ticket.generation,
                ticket.user
            );
            continue;
        }
        let candidates: Vec<CandidateItem> = catalog.candidates().collect();
        let recommendations = service
            .recommend(&ticket.user, &candidates, config.limit, &mut rng)
            .into_value();
        if !queue.is_current(&ticket) {
            log::debug!(
                "discarding stale recommendations {} for {}",
                ticket.generation,
                ticket.user
            );
            continue;
        }
        if sender
            .send(Recomputed {
                ticket,
                recommendations,
            })
            .is_err()
        {
            log::debug!("recompute receiver dropped; stopping worker");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> UserKey {
        UserKey::new("ivy").expect("valid key")
    }

    #[rstest]
    fn requests_coalesce_per_user(user: UserKey) {
        let queue = RecomputeQueue::new();
        let other = UserKey::new("jon").expect("valid key");
        queue.request(&user);
        queue.request(&other);
        let latest = queue.request(&user);

        assert_eq!(queue.len(), 2);
        let first = queue.try_next().expect("queued ticket");
        assert_eq!(first, latest);
        assert_eq!(first.generation(), 2);
        assert_eq!(queue.try_next().map(|t| t.user().clone()), Some(other));
        assert!(queue.is_empty());
    }

    #[rstest]
    fn request_after_pop_requeues(user: UserKey) {
        let queue = RecomputeQueue::new();
        queue.request(&user);
        let taken = queue.try_next().expect("queued ticket");
        queue.request(&user);
        assert!(!queue.is_current(&taken));
        assert_eq!(queue.len(), 1);
    }

    #[rstest]
    fn close_releases_blocked_consumer(user: UserKey) {
        let queue = Arc::new(RecomputeQueue::new());
        let consumer = {
            let waiting = Arc::clone(&queue);
            thread::spawn(move || waiting.next())
        };
        queue.close();
        assert_eq!(consumer.join().expect("consumer thread"), None);

        queue.request(&user);
        assert!(queue.is_empty());
        assert!(queue.is_closed());
    }
}
