use std::error::Error;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task;

/// A value together with the earliest time it may be reloaded.
pub struct Refresh<T> {
    pub(crate) value: T,
    not_before: Instant,
}

impl<T> Refresh<T> {
    pub fn new(value: T, wait: Duration) -> Self {
        Self {
            value,
            not_before: Instant::now() + wait,
        }
    }
}

pub trait Refresher {
    type Error;
    type Output;
    type Future: Future<Output = Result<Refresh<Self::Output>, Self::Error>> + Send + Sync;

    fn refresh(&self) -> Self::Future;
}

pub struct RefreshableValue<T, R, E>
where
    R: Refresher<Output = T, Error = E> + Send + Sync,
{
    value: Arc<RwLock<Arc<Refresh<T>>>>,
    refresher: R,
    active_refresh: Arc<Semaphore>,
}

impl<T, R, E> RefreshableValue<T, R, E>
where
    R: Refresher<Output = T, Error = E> + Send + Sync,
{
    pub fn should_refresh(&self) -> bool {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        value.not_before <= Instant::now()
    }

    pub fn get_unchecked(&self) -> Arc<Refresh<T>> {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&value)
    }
}

impl<T, R, E> RefreshableValue<T, R, E>
where
    T: Sync + Send + 'static,
    R: Refresher<Output = T, Error = E> + Send + Sync,
    E: Error + 'static,
{
    pub async fn new(refresher: R) -> Result<Self, E> {
        refresher.refresh().await.map(|value| Self {
            value: Arc::new(RwLock::new(Arc::new(value))),
            refresher,
            active_refresh: Arc::new(Semaphore::new(1)),
        })
    }
}

impl<T, R, E> RefreshableValue<T, R, E>
where
    R: Refresher<Output = T, Error = E> + Send + Sync,
    E: Error + 'static,
    T: Send + Sync + 'static,
{
    /// Reload the value in a background task. At most one reload runs at a time and none
    /// starts before the current value's wait time has passed.
    pub fn refresh(&self) -> bool
    where
        <R as Refresher>::Future: 'static,
    {
        if !self.should_refresh() {
            return false;
        }
        let Ok(permit) = Arc::clone(&self.active_refresh).try_acquire_owned() else {
            return false;
        };
        let value = Arc::clone(&self.value);
        let refresh_future = self.refresher.refresh();
        task::spawn(async move {
            let refresh = match refresh_future.await {
                Ok(refresh) => refresh,
                Err(error) => {
                    tracing::error!(error = &error as &dyn Error, "refresh failed");
                    return;
                }
            };
            *value.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(refresh);
            drop(permit);
        });
        true
    }
}
