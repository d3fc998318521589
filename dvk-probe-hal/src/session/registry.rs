use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::Error;

/// Unique IDs of probes with a live session in this process.
static CLAIMED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

fn claimed() -> MutexGuard<'static, BTreeSet<String>> {
    // The set is updated with single calls, so a poisoned lock still holds a
    // consistent value.
    CLAIMED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive hold on a probe ID, released on drop.
#[derive(Debug)]
pub(crate) struct Claim {
    unique_id: String,
}

impl Claim {
    pub(crate) fn acquire(unique_id: &str) -> Result<Self, Error> {
        if !claimed().insert(unique_id.to_owned()) {
            return Err(Error::AlreadyOpen(unique_id.to_owned()));
        }
        trace!("Claimed probe {unique_id}");
        Ok(Self {
            unique_id: unique_id.to_owned(),
        })
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        claimed().remove(&self.unique_id);
        trace!("Released probe {}", self.unique_id);
    }
}

/// Whether a [`ProbeSession`](crate::ProbeSession) for `unique_id` is alive in
/// this process.
pub fn is_claimed(unique_id: &str) -> bool {
    claimed().contains(unique_id)
}
