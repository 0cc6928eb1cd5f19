//! Bounded pool of automation sessions (e.g. headless browser handles).
//!
//! Each fetch checks a session out and gets a [`SessionGuard`]. The guard puts the
//! session back when dropped, whichever way the fetch exits. A guard marked with
//! [`SessionGuard::discard`] drops the session instead, so a handle that failed
//! mid-scrape is never handed out again.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, instrument};

use crate::sources::SourceError;

/// Opens new sessions. Closing is the session's own `Drop`.
#[async_trait::async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Send + 'static;

    async fn open(&self) -> Result<Self::Session, SourceError>;
}

pub struct SessionPool<F: SessionFactory> {
    factory: F,
    idle: Mutex<Vec<F::Session>>,
    permits: Arc<Semaphore>,
}

impl<F: SessionFactory> SessionPool<F> {
    /// At most `max_sessions` sessions are checked out at once (minimum 1).
    pub fn new(factory: F, max_sessions: usize) -> Arc<Self> {
        Arc::new(Self {
            factory,
            idle: Mutex::new(Vec::new()),
            permits: Arc::new(Semaphore::new(max_sessions.max(1))),
        })
    }

    /// Waits for a free slot, then reuses an idle session or opens a new one.
    #[instrument(skip(self))]
    pub async fn checkout(self: &Arc<Self>) -> Result<SessionGuard<F>, SourceError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| SourceError::Session("session pool closed".into()))?;

        let idle = self.idle.lock().pop();
        let session = match idle {
            Some(s) => {
                debug!("Reusing idle session");
                s
            }
            // On failure the permit drops here and the slot frees up
            None => self.factory.open().await?,
        };

        Ok(SessionGuard {
            session: Some(session),
            pool: Arc::clone(self),
            discard: false,
            _permit: permit,
        })
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Exclusive use of one session until dropped.
pub struct SessionGuard<F: SessionFactory> {
    session: Option<F::Session>,
    pool: Arc<SessionPool<F>>,
    discard: bool,
    // Dropped after `Drop::drop` has checked the session back in
    _permit: OwnedSemaphorePermit,
}

impl<F: SessionFactory> SessionGuard<F> {
    /// Close the session on drop instead of returning it to the pool.
    pub fn discard(&mut self) {
        self.discard = true;
    }
}

impl<F: SessionFactory> Deref for SessionGuard<F> {
    type Target = F::Session;

    fn deref(&self) -> &F::Session {
        // Only `Drop` takes the session out
        self.session.as_ref().unwrap_or_else(|| unreachable!("session taken before drop"))
    }
}

impl<F: SessionFactory> DerefMut for SessionGuard<F> {
    fn deref_mut(&mut self) -> &mut F::Session {
        self.session.as_mut().unwrap_or_else(|| unreachable!("session taken before drop"))
    }
}

impl<F: SessionFactory> Drop for SessionGuard<F> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else { return };
        if self.discard {
            debug!("Discarding session");
            drop(session);
        } else {
            self.pool.idle.lock().push(session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        fail: bool,
    }

    struct Handle {
        id: usize,
        closed: Arc<AtomicUsize>,
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl SessionFactory for Counting {
        type Session = Handle;

        async fn open(&self) -> Result<Handle, SourceError> {
            if self.fail {
                return Err(SourceError::Session("driver did not start".into()));
            }
            let id = self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Handle { id, closed: Arc::clone(&self.closed) })
        }
    }

    fn pool(max: usize, fail: bool) -> (Arc<SessionPool<Counting>>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let opened = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));
        let factory = Counting { opened: Arc::clone(&opened), closed: Arc::clone(&closed), fail };
        (SessionPool::new(factory, max), opened, closed)
    }

    #[tokio::test]
    async fn test_session_reused_after_checkin() {
        let (pool, opened, _) = pool(1, false);
        {
            let guard = pool.checkout().await.unwrap();
            assert_eq!(guard.id, 0);
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.available(), 1);

        let guard = pool.checkout().await.unwrap();
        assert_eq!(guard.id, 0);
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discarded_session_is_closed() {
        let (pool, opened, closed) = pool(1, false);
        {
            let mut guard = pool.checkout().await.unwrap();
            guard.discard();
        }
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        let guard = pool.checkout().await.unwrap();
        assert_eq!(guard.id, 1);
        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_open_releases_slot() {
        let (pool, _, _) = pool(1, true);
        assert!(pool.checkout().await.is_err());
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_checkout_waits_for_free_slot() {
        let (pool, _, _) = pool(1, false);
        let first = pool.checkout().await.unwrap();

        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.checkout().await.map(|g| g.id) })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(first);
        assert_eq!(waiter.await.unwrap().unwrap(), 0);
    }
}
