//! Remote file manager panel.
//!
//! Ties the remote API, the rendered directory state and the upload
//! pipeline together behind [`FileManager`], the interface the front-end
//! drives: drops, navigation, activation and delete requests. The
//! rendering itself stays behind [`remotefm_view::ViewSurface`].

pub mod error;
pub mod manager;
pub mod navigate;
pub mod reconcile;

#[cfg(test)]
mod testing;

pub use error::PanelError;
pub use manager::{FileManager, FileManagerBuilder};
pub use navigate::Navigator;
pub use reconcile::Reconciler;

use std::sync::{Mutex, MutexGuard, PoisonError};

use remotefm_view::DirectoryState;

/// Locks the directory state, recovering from a poisoned lock.
pub(crate) fn lock_state(state: &Mutex<DirectoryState>) -> MutexGuard<'_, DirectoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
