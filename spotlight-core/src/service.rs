//! Per-user profile ownership with write-through persistence.
//!
//! [`PreferenceService`] keeps exactly one in-memory [`InterestProfile`] per
//! user. The first operation touching a user loads the stored profile; every
//! mutation is then saved immediately. Store failures never abort an
//! operation: they are logged and handed back as [`ServiceWarning`]s next to
//! the result.
//!
//! A failed load is never cached. Reads fall back to an empty profile for
//! that call and the next operation tries the store again. A mutation that
//! could not load a transiently unavailable profile is applied to an empty
//! profile and not saved, so the stored record survives. Only a record the
//! store reports as corrupt is replaced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use thiserror::Error;

use crate::{
    CandidateItem, InterestProfile, ProfileStore, RecommendationEngine, Recommendations, Signal,
    UserKey,
};

/// Non-fatal store failure observed while serving a request.
#[derive(Debug, Error)]
pub enum ServiceWarning<E>
where
    E: std::error::Error + 'static,
{
    /// The stored profile could not be read; an empty profile was used.
    #[error("could not load the profile of {user}; continuing with an empty profile")]
    LoadFailed {
        /// Affected user.
        user: UserKey,
        /// Store error.
        #[source]
        source: E,
    },
    /// The stored profile could not be read, so the update was not saved.
    #[error("did not save the profile of {user} because the stored copy could not be read")]
    SaveSkipped {
        /// Affected user.
        user: UserKey,
    },
    /// The updated profile could not be written; memory stays authoritative.
    #[error("could not save the profile of {user}; keeping the in-memory copy")]
    SaveFailed {
        /// Affected user.
        user: UserKey,
        /// Store error.
        #[source]
        source: E,
    },
}

/// A result accompanied by any warnings raised while producing it.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T, E>
where
    E: std::error::Error + 'static,
{
    /// The produced value.
    pub value: T,
    /// Store failures that did not prevent the operation.
    pub warnings: Vec<ServiceWarning<E>>,
}

impl<T, E> Outcome<T, E>
where
    E: std::error::Error + 'static,
{
    /// Report whether no warning was raised.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Discard the warnings and keep the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value while keeping the warnings.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// `None` until the user's stored profile has been loaded.
type Slot = Arc<Mutex<Option<InterestProfile>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the live profile of every active user.
///
/// Operations on the same user are serialised; operations on different
/// users proceed in parallel. Store I/O happens while holding only the
/// affected user's lock.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use spotlight_core::{
///     Axis, CandidateItem, MemoryProfileStore, PreferenceService, UserKey,
/// };
///
/// let service = PreferenceService::new(MemoryProfileStore::default());
/// let user = UserKey::new("fay")?;
/// let item = CandidateItem::new(3).with_category("Jazz");
///
/// let profile = service.record_booking(&user, &item).into_value();
/// assert_eq!(profile.weight(Axis::Category, "Jazz"), 3.0);
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let picks = service.recommend(&user, &[item], 4, &mut rng).into_value();
/// assert_eq!(picks.item_ids(), vec![3]);
/// # Ok::<(), spotlight_core::UserKeyError>(())
/// ```
#[derive(Debug)]
pub struct PreferenceService<S> {
    store: S,
    engine: RecommendationEngine,
    profiles: Mutex<HashMap<UserKey, Slot>>,
}

impl<S> PreferenceService<S>
where
    S: ProfileStore,
{
    /// Create a service writing through to `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_engine(store, RecommendationEngine::default())
    }

    /// Create a service with a custom engine.
    #[must_use]
    pub fn with_engine(store: S, engine: RecommendationEngine) -> Self {
        Self {
            store,
            engine,
            profiles: Mutex::new(HashMap::new()),
        }
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the engine used by [`PreferenceService::recommend`].
    #[must_use]
    pub const fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Apply `signal` for `item` to the user's profile and persist it.
    ///
    /// Returns a snapshot of the updated profile.
    pub fn record(
        &self,
        user: &UserKey,
        signal: Signal,
        item: &CandidateItem,
    ) -> Outcome<InterestProfile, S::Error> {
        log::debug!("recording {signal} of item {} for {user}", item.id);
        self.mutate(user, |profile| profile.record(signal, item))
    }

    /// Record that the user viewed `item`.
    pub fn record_view(
        &self,
        user: &UserKey,
        item: &CandidateItem,
    ) -> Outcome<InterestProfile, S::Error> {
        self.record(user, Signal::View, item)
    }

    /// Record that the user booked `item`.
    pub fn record_booking(
        &self,
        user: &UserKey,
        item: &CandidateItem,
    ) -> Outcome<InterestProfile, S::Error> {
        self.record(user, Signal::Booking, item)
    }

    /// Replace the user's profile with an empty one and persist it.
    ///
    /// The stored profile is not read first.
    pub fn reset_preferences(&self, user: &UserKey) -> Outcome<(), S::Error> {
        let slot = self.slot(user);
        let mut guard = lock(&slot);
        let profile = guard.insert(InterestProfile::new());
        log::info!("reset preferences for {user}");
        let warnings = self.save(user, profile).into_iter().collect();
        Outcome {
            value: (),
            warnings,
        }
    }

    /// Snapshot of the user's current profile.
    pub fn profile(&self, user: &UserKey) -> Outcome<InterestProfile, S::Error> {
        let slot = self.slot(user);
        let mut guard = lock(&slot);
        self.ensure_loaded(user, &mut guard).map_or_else(
            |source| Outcome {
                value: InterestProfile::new(),
                warnings: vec![Self::load_failed(user, source)],
            },
            |profile| Outcome {
                value: profile.clone(),
                warnings: Vec::new(),
            },
        )
    }

    /// Recommend up to `k` of `candidates` for the user.
    ///
    /// Scoring runs on a snapshot, outside the user's lock.
    pub fn recommend<R>(
        &self,
        user: &UserKey,
        candidates: &[CandidateItem],
        k: usize,
        rng: &mut R,
    ) -> Outcome<Recommendations, S::Error>
    where
        R: Rng + ?Sized,
    {
        self.profile(user)
            .map(|profile| self.engine.recommend(&profile, candidates, k, rng))
    }

    fn mutate<F>(&self, user: &UserKey, change: F) -> Outcome<InterestProfile, S::Error>
    where
        F: FnOnce(&mut InterestProfile),
    {
        let slot = self.slot(user);
        let mut guard = lock(&slot);
        let mut warnings = Vec::new();
        if let Err(source) = self.ensure_loaded(user, &mut guard) {
            let corrupt = self.store.is_corrupt_record(&source);
            warnings.push(Self::load_failed(user, source));
            if !corrupt {
                let mut detached = InterestProfile::new();
                change(&mut detached);
                log::warn!("not saving the profile of {user}; the stored copy is kept");
                warnings.push(ServiceWarning::SaveSkipped { user: user.clone() });
                return Outcome {
                    value: detached,
                    warnings,
                };
            }
            log::warn!("replacing the unreadable stored profile of {user}");
        }
        let profile = guard.get_or_insert_with(InterestProfile::new);
        change(profile);
        warnings.extend(self.save(user, profile));
        Outcome {
            value: profile.clone(),
            warnings,
        }
    }

    fn slot(&self, user: &UserKey) -> Slot {
        let mut profiles = lock(&self.profiles);
        Arc::clone(profiles.entry(user.clone()).or_default())
    }

    /// Fill `cached` from the store unless it already holds the profile.
    ///
    /// On failure `cached` stays empty so the next call retries.
    fn ensure_loaded<'a>(
        &self,
        user: &UserKey,
        cached: &'a mut Option<InterestProfile>,
    ) -> Result<&'a mut InterestProfile, S::Error> {
        if cached.is_none() {
            let stored = self.store.load(user)?;
            *cached = Some(stored.map_or_else(InterestProfile::new, InterestProfile::sanitised));
        }
        Ok(cached.get_or_insert_with(InterestProfile::new))
    }

    fn load_failed(user: &UserKey, source: S::Error) -> ServiceWarning<S::Error> {
        log::warn!("failed to load profile for {user}: {source}");
        ServiceWarning::LoadFailed {
            user: user.clone(),
            source,
        }
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Option<ServiceWarning<S::Error>> {
        self.store.save(user, profile).err().map(|source| {
            log::warn!("failed to save profile for {user}: {source}");
            ServiceWarning::SaveFailed {
                user: user.clone(),
                source,
            }
        })
    }
}
