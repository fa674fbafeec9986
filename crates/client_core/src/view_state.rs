use chrono::{DateTime, Utc};

/// Where a view is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Result of one `load()` as seen by its caller. The view state already
/// reflects it; this is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed,
}

/// The `{data, loading, error}` snapshot a view renders from.
///
/// `data` is a cache of server state. A failed load keeps the previous
/// `data` and only sets `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    in_flight: usize,
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ViewState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            last_updated: None,
            in_flight: 0,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        if self.loading {
            ViewPhase::Loading
        } else if self.error.is_some() {
            ViewPhase::Failed
        } else if self.last_updated.is_some() {
            ViewPhase::Ready
        } else {
            ViewPhase::Idle
        }
    }

    /// True while nothing has been loaded yet and a load is running, i.e.
    /// the renderer should show a full-page spinner rather than stale data.
    pub fn is_first_load(&self) -> bool {
        self.loading && self.last_updated.is_none()
    }

    pub(crate) fn begin_load(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    pub(crate) fn settle_ready(&mut self, data: T, at: DateTime<Utc>) {
        self.data = data;
        self.error = None;
        self.last_updated = Some(at);
        self.finish_load();
    }

    pub(crate) fn settle_failed(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.finish_load();
    }

    /// Releases a load that was dropped before it settled.
    pub(crate) fn abandon_load(&mut self) {
        self.finish_load();
    }

    fn finish_load(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}
