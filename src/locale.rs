//! Locale initialization and single-flight locale switching.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use crate::lang::{Catalog, Locale, LocaleError, STORAGE_KEY};
use crate::prefs::PreferenceStore;

/// One 60Hz frame.
const FRAME: Duration = Duration::from_millis(16);

/// Resolves once the renderer has had a chance to paint.
#[async_trait]
pub trait FrameTick: Send + Sync {
    async fn next_frame(&self);
}

/// Yields to the scheduler, then waits out one frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchedulerTick;

#[async_trait]
impl FrameTick for SchedulerTick {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
        tokio::time::sleep(FRAME).await;
    }
}

/// Stored locale if it is a supported code, else the default.
pub fn initial_locale(store: &dyn PreferenceStore) -> Locale {
    store.get(STORAGE_KEY).and_then(|code| Locale::parse(&code)).unwrap_or_default()
}

/// Load the bundle of the catalog's active locale (no-op when loaded).
pub async fn init_locale(catalog: &Catalog) -> Result<(), LocaleError> {
    let locale = catalog.active();
    catalog.load(locale).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    AlreadyActive,
    /// Another switch was in flight; this request was dropped.
    Busy,
}

pub struct LocaleSwitcher {
    catalog: Arc<Catalog>,
    prefs: Arc<dyn PreferenceStore>,
    tick: Arc<dyn FrameTick>,
    in_flight: AtomicBool,
}

struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) { self.0.store(false, Ordering::SeqCst); }
}

impl LocaleSwitcher {
    pub fn new(catalog: Arc<Catalog>, prefs: Arc<dyn PreferenceStore>, tick: Arc<dyn FrameTick>) -> Self {
        Self { catalog, prefs, tick, in_flight: AtomicBool::new(false) }
    }

    pub fn catalog(&self) -> &Arc<Catalog> { &self.catalog }

    pub fn is_switching(&self) -> bool { self.in_flight.load(Ordering::SeqCst) }

    /// Load, apply, persist, then wait one frame. At most one switch runs at
    /// a time; overlapping requests return [`SwitchOutcome::Busy`].
    pub async fn switch(&self, next: Locale) -> Result<SwitchOutcome, LocaleError> {
        if next == self.catalog.active() { return Ok(SwitchOutcome::AlreadyActive); }
        if self.in_flight.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            tracing::debug!(locale = %next, "locale switch already in flight, dropping request");
            return Ok(SwitchOutcome::Busy);
        }
        let _guard = FlightGuard(&self.in_flight);
        self.catalog.load(next).await?;
        self.catalog.apply(next)?;
        if let Err(e) = self.prefs.set(STORAGE_KEY, next.code()) {
            tracing::warn!(locale = %next, error = %e, "failed to persist locale preference");
        }
        self.tick.next_frame().await;
        tracing::info!(locale = %next, "locale switched");
        Ok(SwitchOutcome::Switched)
    }
}
