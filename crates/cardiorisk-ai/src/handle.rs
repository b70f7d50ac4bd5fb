//! Process-wide classifier handle with single-flight loading.
//!
//! A [`ModelHandle`] moves through `Unloaded → Loading → Ready`, or to
//! `Failed` when the loader errors. The first caller to need the classifier
//! starts one load on a short-lived loader thread; every caller, including
//! that one, waits on a condition variable for its outcome, so waiting can be
//! bounded by a timeout while the load itself runs to completion.
//!
//! A failed load stays failed until [`ModelHandle::reload`] is called. A
//! reload while `Ready` keeps serving the current classifier until the new
//! one is in place; callers holding the old `Arc` keep using it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Condvar, Mutex};
use tracing::{error, info, warn};

use crate::artifact::{ArtifactLoader, ModelInfo, ModelLoader};
use crate::classifier::Classifier;
use crate::error::LoadError;

/// Observable lifecycle state of a [`ModelHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl ModelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone)]
struct Loaded {
    classifier: Arc<dyn Classifier>,
    info: ModelInfo,
}

enum Current {
    Empty,
    Ready(Loaded),
    Failed(Arc<LoadError>),
}

struct State {
    current: Current,
    loading: bool,
    /// Completed loads, successful or not.
    generation: u64,
    /// Outcome of the most recent completed load.
    last_error: Option<Arc<LoadError>>,
}

struct Shared {
    loader: Box<dyn ModelLoader>,
    state: Mutex<State>,
    changed: Condvar,
}

/// Cloneable handle to one lazily loaded classifier.
#[derive(Clone)]
pub struct ModelHandle {
    shared: Arc<Shared>,
}

impl ModelHandle {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                loader: Box::new(loader),
                state: Mutex::new(State {
                    current: Current::Empty,
                    loading: false,
                    generation: 0,
                    last_error: None,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    /// Handle for an artifact file; nothing is read until first use.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactLoader::new(path))
    }

    pub fn source(&self) -> String {
        self.shared.loader.source()
    }

    pub fn state(&self) -> ModelState {
        let state = self.shared.state.lock();
        match (&state.current, state.loading) {
            (Current::Ready(_), _) => ModelState::Ready,
            (_, true) => ModelState::Loading,
            (Current::Failed(_), false) => ModelState::Failed,
            (Current::Empty, false) => ModelState::Unloaded,
        }
    }

    /// Metadata of the classifier currently served, if any.
    pub fn info(&self) -> Option<ModelInfo> {
        match &self.shared.state.lock().current {
            Current::Ready(loaded) => Some(loaded.info.clone()),
            _ => None,
        }
    }

    /// Load eagerly, blocking until the classifier is ready.
    pub fn load(&self) -> Result<ModelInfo, Arc<LoadError>> {
        self.acquire(None).map(|loaded| loaded.info)
    }

    /// The ready classifier, loading it first if needed.
    ///
    /// Blocks while a load is in flight. With a `timeout`, gives up after
    /// that long with [`LoadError::Timeout`]; the load keeps running. A
    /// previously failed load is returned as-is, not retried.
    pub fn classifier(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn Classifier>, Arc<LoadError>> {
        self.acquire(timeout).map(|loaded| loaded.classifier)
    }

    /// Load the artifact again, replacing the served classifier on success.
    ///
    /// Joins a load already in flight instead of starting a second one. On
    /// failure a previously ready classifier stays in service.
    pub fn reload(&self) -> Result<ModelInfo, Arc<LoadError>> {
        let mut state = self.shared.state.lock();
        let target = state.generation + 1;
        if !state.loading {
            info!(source = %self.shared.loader.source(), "reloading classifier");
            self.spawn_load(&mut state)?;
        }
        while state.generation < target {
            self.shared.changed.wait(&mut state);
        }
        match (&state.last_error, &state.current) {
            (Some(err), _) => Err(Arc::clone(err)),
            (None, Current::Ready(loaded)) => Ok(loaded.info.clone()),
            (None, _) => unreachable!("a successful load always leaves the handle ready"),
        }
    }

    fn acquire(&self, timeout: Option<Duration>) -> Result<Loaded, Arc<LoadError>> {
        // A timeout too large to represent as an instant waits without one.
        let deadline = timeout.and_then(|t| Some((Instant::now().checked_add(t)?, t)));
        let mut state = self.shared.state.lock();
        loop {
            if let Some(outcome) = settled(&state) {
                return outcome;
            }
            if !state.loading {
                self.spawn_load(&mut state)?;
            }
            match deadline {
                Some((at, timeout)) => {
                    if self.shared.changed.wait_until(&mut state, at).timed_out() {
                        if let Some(outcome) = settled(&state) {
                            return outcome;
                        }
                        warn!(?timeout, "timed out waiting for classifier to load");
                        return Err(Arc::new(LoadError::Timeout(timeout)));
                    }
                }
                None => self.shared.changed.wait(&mut state),
            }
        }
    }

    fn spawn_load(&self, state: &mut State) -> Result<(), Arc<LoadError>> {
        state.loading = true;
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || shared.run_load());

        if let Err(e) = spawned {
            state.loading = false;
            let err = Arc::new(LoadError::Spawn(e));
            if !matches!(state.current, Current::Ready(_)) {
                state.current = Current::Failed(Arc::clone(&err));
            }
            return Err(err);
        }
        Ok(())
    }
}

impl Shared {
    fn run_load(&self) {
        let source = self.loader.source();
        info!(source = %source, "loading classifier");
        let started = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.loader.load()))
            .unwrap_or_else(|payload| Err(LoadError::Panicked(panic_message(&*payload))));
        let load_millis = started.elapsed().as_millis() as u64;

        let mut state = self.state.lock();
        match outcome {
            Ok(classifier) => {
                let info = ModelInfo {
                    source,
                    kind: classifier.kind(),
                    supports_probability: classifier.supports_probability(),
                    loaded_at: Utc::now(),
                    load_millis,
                };
                info!(
                    kind = %info.kind,
                    supports_probability = info.supports_probability,
                    load_millis,
                    "classifier ready"
                );
                state.current = Current::Ready(Loaded { classifier, info });
                state.last_error = None;
            }
            Err(err) => {
                error!(error = %err, load_millis, "classifier failed to load");
                let err = Arc::new(err);
                if !matches!(state.current, Current::Ready(_)) {
                    state.current = Current::Failed(Arc::clone(&err));
                }
                state.last_error = Some(err);
            }
        }
        state.loading = false;
        state.generation += 1;
        drop(state);
        self.changed.notify_all();
    }
}

/// Final outcome visible to a caller, or `None` while it must wait.
fn settled(state: &State) -> Option<Result<Loaded, Arc<LoadError>>> {
    match &state.current {
        Current::Ready(loaded) => Some(Ok(loaded.clone())),
        Current::Failed(err) if !state.loading => Some(Err(Arc::clone(err))),
        _ => None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
