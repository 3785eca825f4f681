//! A [`PollingView`] owns the render state of one dashboard section.
//!
//! The state lives in a [`watch`] channel together with an epoch counter and
//! the mounted flag. Mounting, unmounting and changing the key each bump the
//! epoch; a fetch remembers the epoch it started in and only applies its
//! result if that epoch is still current and the view is still mounted. The
//! check and the write happen in one `send_if_modified` call, so they cannot
//! interleave with an unmount.
//!
//! Fetches run as detached tasks and are never aborted, their results are
//! just dropped by the guard. The refresh timer is a task bound to the view:
//! it is aborted on unmount, on key change (and restarted) and on drop.

use {
    crate::{proxy_client::ProxyError, sources::ViewSource},
    log::{debug, warn},
    serde::Serialize,
    std::{sync::Arc, time::Duration},
    tokio::{
        sync::{watch, Notify},
        task::JoinHandle,
        time::{self, Instant, MissedTickBehavior},
    },
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(90);

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    /// Failure description, e.g. `"503 rate limited"`.
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(data) => ViewState::Ready(f(data)),
            ViewState::Error(message) => ViewState::Error(message),
        }
    }
}

impl<T> From<Result<T, ProxyError>> for ViewState<T> {
    fn from(result: Result<T, ProxyError>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Error(e.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewSnapshot<K, T> {
    pub key: K,
    pub state: ViewState<T>,
    pub mounted: bool,
    epoch: u64,
}

type Slot<S> = watch::Sender<ViewSnapshot<<S as ViewSource>::Key, <S as ViewSource>::Data>>;

/// Everything a detached task needs to reach back into the view.
struct Handles<S: ViewSource> {
    source: Arc<S>,
    slot: Arc<Slot<S>>,
    changed: Arc<Notify>,
}

impl<S: ViewSource> Clone for Handles<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            slot: Arc::clone(&self.slot),
            changed: Arc::clone(&self.changed),
        }
    }
}

impl<S: ViewSource> Handles<S> {
    /// Enters `Loading` and returns the key to fetch, unless `epoch` is no
    /// longer the active one.
    fn begin(&self, epoch: u64) -> Option<S::Key> {
        let mut key = None;

        self.slot.send_if_modified(|snapshot| {
            if !snapshot.mounted || snapshot.epoch != epoch {
                return false;
            }

            snapshot.state = ViewState::Loading;
            key = Some(snapshot.key.clone());

            true
        });

        if key.is_some() {
            self.changed.notify_one();
        }

        key
    }

    fn spawn_fetch(&self, epoch: u64, key: S::Key) {
        let handles = self.clone();

        tokio::spawn(async move {
            let name = handles.source.name();
            let result = handles.source.fetch(&key).await;

            if let Err(e) = &result {
                warn!("Fetching {name} for {key:?} failed: {e}");
            }

            let applied = handles.slot.send_if_modified(|snapshot| {
                if !snapshot.mounted || snapshot.epoch != epoch {
                    return false;
                }

                snapshot.state = result.into();

                true
            });

            if applied {
                handles.changed.notify_one();
            } else {
                debug!("Discarding stale {name} result for {key:?}");
            }
        });
    }
}

/// Fetch lifecycle of one dashboard section. Must be driven from within a
/// Tokio runtime.
pub struct PollingView<S: ViewSource> {
    handles: Handles<S>,
    refresh: Option<Duration>,
    timer: Option<JoinHandle<()>>,
}

impl<S: ViewSource> PollingView<S> {
    /// Creates an unmounted view. Nothing is fetched until [`Self::mount`].
    pub fn new(source: S, key: S::Key) -> Self {
        let (slot, _) = watch::channel(ViewSnapshot {
            key,
            state: ViewState::Loading,
            mounted: false,
            epoch: 0,
        });

        Self {
            handles: Handles {
                source: Arc::new(source),
                slot: Arc::new(slot),
                changed: Arc::new(Notify::new()),
            },
            refresh: Some(DEFAULT_REFRESH_INTERVAL),
            timer: None,
        }
    }

    /// Interval of the background refresh while mounted. `None` disables it.
    pub fn with_refresh(mut self, refresh: Option<Duration>) -> Self {
        self.refresh = refresh;
        self
    }

    /// Signalled whenever the state changes. Several views may share one.
    pub fn with_notify(mut self, changed: Arc<Notify>) -> Self {
        self.handles.changed = changed;
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.handles.slot.borrow().mounted
    }

    pub fn key(&self) -> S::Key {
        self.handles.slot.borrow().key.clone()
    }

    pub fn state(&self) -> ViewState<S::Data> {
        self.handles.slot.borrow().state.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot<S::Key, S::Data> {
        self.handles.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<S::Key, S::Data>> {
        self.handles.slot.subscribe()
    }

    /// Starts the view: one fetch right away, then one per refresh interval.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }

        let epoch = self.next_epoch(|snapshot| snapshot.mounted = true);

        self.start(epoch);
    }

    /// Stops the timer. Results still in flight are discarded on arrival.
    pub fn unmount(&mut self) {
        self.stop_timer();

        if !self.is_mounted() {
            return;
        }

        self.next_epoch(|snapshot| snapshot.mounted = false);
        self.handles.changed.notify_one();
    }

    /// Rebinds the view to new dependencies. A mounted view fetches once for
    /// the new key and restarts its timer; an equal key is a no-op.
    pub fn set_key(&mut self, key: S::Key) {
        let unchanged = self.handles.slot.borrow().key == key;

        if unchanged {
            return;
        }

        let epoch = self.next_epoch(|snapshot| snapshot.key = key);

        if self.is_mounted() {
            self.start(epoch);
        }
    }

    /// Fetches again for the current key without waiting for the timer.
    pub fn refresh(&self) {
        let epoch = self.handles.slot.borrow().epoch;

        if let Some(key) = self.handles.begin(epoch) {
            self.handles.spawn_fetch(epoch, key);
        }
    }

    fn next_epoch(&self, change: impl FnOnce(&mut ViewSnapshot<S::Key, S::Data>)) -> u64 {
        let mut epoch = 0;

        self.handles.slot.send_modify(|snapshot| {
            snapshot.epoch += 1;
            change(snapshot);
            epoch = snapshot.epoch;
        });

        epoch
    }

    fn start(&mut self, epoch: u64) {
        if let Some(key) = self.handles.begin(epoch) {
            self.handles.spawn_fetch(epoch, key);
        }

        self.stop_timer();

        let Some(every) = self.refresh else {
            return;
        };

        let handles = self.handles.clone();

        self.timer = Some(tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + every, every);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;

                let Some(key) = handles.begin(epoch) else {
                    break;
                };

                handles.spawn_fetch(epoch, key);
            }
        }));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<S: ViewSource> Drop for PollingView<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
