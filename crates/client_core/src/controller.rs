//! Generic view-state synchronization: fetch, re-fetch on a timer, and
//! overlay optimistic local edits until the next authoritative load.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    error::ApiResult,
    view_state::{LoadOutcome, ViewState},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The read side of one view: what it shows and how to fetch it.
#[async_trait]
pub trait ViewSource: Send + Sync + 'static {
    type Data: Clone + Default + Send + Sync + 'static;

    /// Short name used in log fields.
    const NAME: &'static str;
    /// Shown to the user when `fetch` fails, whatever the cause.
    const FAILURE_MESSAGE: &'static str;

    async fn fetch(&self) -> ApiResult<Self::Data>;
}

/// Data made of entries that can be patched in place.
pub trait EntryCollection {
    type Entry;

    fn entries_mut(&mut self) -> &mut [Self::Entry];

    /// Called after an optimistic update changed `changed` entries.
    fn entries_changed(&mut self, _changed: usize) {}
}

impl<E> EntryCollection for Vec<E> {
    type Entry = E;

    fn entries_mut(&mut self) -> &mut [E] {
        self.as_mut_slice()
    }
}

pub struct ViewStateController<S: ViewSource> {
    source: S,
    state: watch::Sender<ViewState<S::Data>>,
}

impl<S: ViewSource> ViewStateController<S> {
    pub fn new(source: S) -> Arc<Self> {
        let (state, _) = watch::channel(ViewState::default());
        Arc::new(Self { source, state })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> ViewState<S::Data> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Data>> {
        self.state.subscribe()
    }

    /// Full refresh. Never fails: a fetch error becomes the view's error
    /// message and the last good `data` stays in place.
    pub async fn load(&self) -> LoadOutcome {
        self.state.send_modify(ViewState::begin_load);
        let mut guard = LoadGuard {
            state: &self.state,
            settled: false,
        };
        debug!(view = S::NAME, "load started");

        let result = self.source.fetch().await;

        guard.settled = true;
        match result {
            Ok(data) => {
                self.state
                    .send_modify(|state| state.settle_ready(data, Utc::now()));
                debug!(view = S::NAME, "load finished");
                LoadOutcome::Ready
            }
            Err(err) => {
                warn!(view = S::NAME, error = %err, "load failed");
                self.state
                    .send_modify(|state| state.settle_failed(S::FAILURE_MESSAGE));
                LoadOutcome::Failed
            }
        }
    }

    /// Re-runs `load()` every `period` until the returned handle is
    /// cancelled or dropped. The first tick fires one period from now.
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> PollingHandle {
        let period = period.max(MIN_POLL_INTERVAL);
        let controller: Weak<Self> = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(controller) = controller.upgrade() else {
                    debug!(view = S::NAME, "view dropped; polling stops");
                    break;
                };
                controller.load().await;
            }
        });

        info!(
            view = S::NAME,
            period_ms = period.as_millis() as u64,
            "polling started"
        );
        PollingHandle {
            view: S::NAME,
            task: Some(task),
        }
    }

    /// Rewrites every entry matching `predicate` with `transform`, in place
    /// and without a network round trip. `transform` returns whether it
    /// actually changed the entry; returning `false` for an entry that is
    /// already in the target shape keeps repeated calls idempotent.
    ///
    /// Returns the number of changed entries. The next `load()` overwrites
    /// the result with server state.
    pub fn apply_optimistic_update<P, F>(&self, predicate: P, mut transform: F) -> usize
    where
        S::Data: EntryCollection,
        P: Fn(&<S::Data as EntryCollection>::Entry) -> bool,
        F: FnMut(&mut <S::Data as EntryCollection>::Entry) -> bool,
    {
        let mut changed = 0;
        self.state.send_if_modified(|state| {
            for entry in state.data.entries_mut() {
                if predicate(&*entry) && transform(&mut *entry) {
                    changed += 1;
                }
            }
            if changed > 0 {
                state.data.entries_changed(changed);
            }
            changed > 0
        });
        debug!(view = S::NAME, changed, "optimistic update applied");
        changed
    }

    /// Replaces local data after a confirmed server-side mutation.
    pub fn update_local(&self, update: impl FnOnce(&mut S::Data)) {
        self.state.send_modify(|state| update(&mut state.data));
    }
}

/// Keeps the in-flight count honest when a load future is dropped before
/// it settles, e.g. when its polling task is aborted mid-request.
struct LoadGuard<'a, T> {
    state: &'a watch::Sender<ViewState<T>>,
    settled: bool,
}

impl<T> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.send_modify(ViewState::abandon_load);
        }
    }
}

/// Owned polling task. Cancelling or dropping it stops the timer; the task
/// is aborted at most once.
#[derive(Debug)]
pub struct PollingHandle {
    view: &'static str,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(view = self.view, "polling stopped");
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A view for as long as it is on screen: its controller plus, for
/// auto-refreshing views, the polling task. Dropping it unmounts.
pub struct MountedView<S: ViewSource> {
    controller: Arc<ViewStateController<S>>,
    polling: Option<PollingHandle>,
}

impl<S: ViewSource> MountedView<S> {
    /// Runs the first load, then starts polling when `poll` is set.
    pub async fn mount(source: S, poll: Option<Duration>) -> Self {
        let controller = ViewStateController::new(source);
        controller.load().await;
        let polling = poll.map(|period| controller.start_polling(period));
        Self {
            controller,
            polling,
        }
    }

    pub fn controller(&self) -> &Arc<ViewStateController<S>> {
        &self.controller
    }

    pub fn source(&self) -> &S {
        self.controller.source()
    }

    pub fn state(&self) -> ViewState<S::Data> {
        self.controller.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Data>> {
        self.controller.subscribe()
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.controller.load().await
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(PollingHandle::is_active)
    }

    pub fn unmount(mut self) {
        if let Some(polling) = self.polling.take() {
            polling.cancel();
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
