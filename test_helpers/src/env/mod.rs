//! Guarded mutation of process environment variables in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns an RAII
//! guard that restores the prior state on drop, re-acquiring the mutex for
//! the restoration. Stacked guards for one key restore in LIFO order.
//! Tests that mutate several keys, or that must keep other tests from
//! interleaving, hold [`lock`] across the whole block.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

#[cfg(test)]
mod tests;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring one environment variable to its prior state.
#[must_use = "dropping restores the prior value"]
pub struct VarGuard {
    key: String,
    prior: Option<OsString>,
}

impl Drop for VarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        match self.prior.take() {
            // SAFETY: the mutex serialises every environment write in
            // this process that goes through these helpers.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

impl fmt::Debug for VarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarGuard")
            .field("key", &self.key)
            .field("had_prior", &self.prior.is_some())
            .finish()
    }
}

/// Set a variable, returning a guard that restores the prior state.
///
/// # Examples
///
/// ```
/// let _guard = test_helpers::env::set_var("STRATA_DEMO", "1");
/// assert_eq!(std::env::var("STRATA_DEMO").as_deref(), Ok("1"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> VarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let owned = key.into();
    let _held = ENV_MUTEX.lock();
    let prior = env::var_os(&owned);
    // SAFETY: serialised by ENV_MUTEX, as above.
    unsafe { env::set_var(&owned, value.as_ref()) };
    VarGuard { key: owned, prior }
}

/// Remove a variable, returning a guard that restores the prior state.
pub fn remove_var<K: Into<String>>(key: K) -> VarGuard {
    let owned = key.into();
    let _held = ENV_MUTEX.lock();
    let prior = env::var_os(&owned);
    // SAFETY: serialised by ENV_MUTEX, as above.
    unsafe { env::remove_var(&owned) };
    VarGuard { key: owned, prior }
}

/// Hold the global environment lock for the guard's lifetime.
///
/// The mutex is re-entrant, so the mutation helpers stay usable while the
/// lock is held.
#[must_use = "dropping releases the environment lock"]
pub fn lock() -> ReentrantMutexGuard<'static, ()> {
    ENV_MUTEX.lock()
}
