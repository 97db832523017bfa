//! Persistence seam for interest profiles.
//!
//! The [`ProfileStore`] trait is the key-value collaborator the engine
//! writes every profile change through to. Backends live in
//! `spotlight-store`; [`MemoryProfileStore`] keeps profiles in process and
//! can be told to fail on demand.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use thiserror::Error;

use crate::{InterestProfile, UserKey};

/// Load and save interest profiles keyed by user.
///
/// Implementations must be thread-safe; the service calls them while holding
/// only the lock of the affected user.
///
/// # Examples
/// ```
/// use spotlight_core::{InterestProfile, MemoryProfileStore, ProfileStore, UserKey};
///
/// let store = MemoryProfileStore::default();
/// let user = UserKey::new("ana")?;
/// assert_eq!(store.load(&user)?, None);
/// store.save(&user, &InterestProfile::new())?;
/// assert_eq!(store.load(&user)?, Some(InterestProfile::new()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait ProfileStore: Send + Sync {
    /// Failure reported by this backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the stored profile for `user`, or `None` when nothing is stored.
    ///
    /// # Errors
    /// Returns the backend error when the profile cannot be read or decoded.
    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error>;

    /// Replace the stored profile for `user`.
    ///
    /// # Errors
    /// Returns the backend error when the profile cannot be written.
    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error>;

    /// Report whether `error` means the stored record itself is unreadable.
    ///
    /// Such a record will not recover on retry, so the service may replace
    /// it. Any other load failure is treated as transient and the stored
    /// record is left alone.
    #[must_use]
    fn is_corrupt_record(&self, _error: &Self::Error) -> bool {
        false
    }
}

impl<S: ProfileStore + ?Sized> ProfileStore for &S {
    type Error = S::Error;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        (**self).load(user)
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        (**self).save(user, profile)
    }

    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        (**self).is_corrupt_record(error)
    }
}

impl<S: ProfileStore + ?Sized> ProfileStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        (**self).load(user)
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        (**self).save(user, profile)
    }

    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        (**self).is_corrupt_record(error)
    }
}

/// Failures injected into a [`MemoryProfileStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// Loading was switched off with [`MemoryProfileStore::fail_loads`].
    #[error("loading the profile of {user} was rejected")]
    LoadRejected {
        /// User whose profile was requested.
        user: UserKey,
    },
    /// The record was flagged with [`MemoryProfileStore::mark_unreadable`].
    #[error("the stored profile of {user} is unreadable")]
    Unreadable {
        /// User whose profile was requested.
        user: UserKey,
    },
    /// Saving was switched off with [`MemoryProfileStore::fail_saves`].
    #[error("saving the profile of {user} was rejected")]
    SaveRejected {
        /// User whose profile was written.
        user: UserKey,
    },
}

/// In-process profile store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<UserKey, InterestProfile>>,
    unreadable: Mutex<HashSet<UserKey>>,
    reject_loads: AtomicBool,
    reject_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryProfileStore {
    /// Create a store pre-populated with `profiles`.
    #[must_use]
    pub fn with_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (UserKey, InterestProfile)>,
    {
        Self {
            profiles: Mutex::new(profiles.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.reject_loads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.reject_saves.store(fail, Ordering::SeqCst);
    }

    /// Make loads of `user` fail as a corrupt record until it is saved again.
    pub fn mark_unreadable(&self, user: &UserKey) {
        self.unreadable
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(user.clone());
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the stored profile for `user`, bypassing failure injection.
    #[must_use]
    pub fn stored(&self, user: &UserKey) -> Option<InterestProfile> {
        self.lock().get(user).cloned()
    }

    fn is_unreadable(&self, user: &UserKey) -> bool {
        self.unreadable
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(user)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserKey, InterestProfile>> {
        self.profiles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProfileStore for MemoryProfileStore {
    type Error = MemoryStoreError;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        if self.reject_loads.load(Ordering::SeqCst) {
            return Err(MemoryStoreError::LoadRejected { user: user.clone() });
        }
        if self.is_unreadable(user) {
            return Err(MemoryStoreError::Unreadable { user: user.clone() });
        }
        Ok(self.lock().get(user).cloned())
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(MemoryStoreError::SaveRejected { user: user.clone() });
        }
        self.lock().insert(user.clone(), profile.clone());
        self.unreadable
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(user);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        matches!(error, MemoryStoreError::Unreadable { .. })
    }
}
