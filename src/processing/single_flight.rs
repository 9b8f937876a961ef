use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

type Flight<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Runs an expensive initialization at most once at a time.
///
/// Every caller that arrives while a load is in flight awaits that same load
/// and sees its result. A successful value is kept for the lifetime of the
/// cell. A failure is delivered to all of its waiters and then cleared, so
/// the next caller starts a fresh attempt.
pub struct SingleFlight<T, E> {
    slot: Mutex<Option<Flight<T, E>>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let flight = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                // A finished failure whose waiters have not cleared it yet is
                // replaced rather than handed out again.
                Some(flight) if !matches!(flight.peek(), Some(Err(_))) => flight.clone(),
                _ => {
                    let flight = init().boxed().shared();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };

        let outcome = flight.clone().await;
        if outcome.is_err() {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            // Only clear our own failed flight, never a retry started since.
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&flight)) {
                *slot = None;
            }
        }
        outcome
    }

    pub fn is_ready(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .and_then(|flight| flight.peek())
            .is_some_and(|outcome| outcome.is_ok())
    }
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
