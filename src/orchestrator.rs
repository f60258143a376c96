//! Load cycles for the three site resources and the locale, keyed off a
//! retry counter; plus page-level derivations (view, title).
use std::sync::Arc;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use crate::fetch::{get_typed, Fetch, FetchError, FetchOptions};
use crate::lang::{Catalog, LocaleError};
use crate::load_state::LoadState;
use crate::locale::init_locale;
use crate::types::{Cert, Profile, TechStack, CERTS_PATH, INFO_PATH, TECH_STACKS_PATH};

/// Identity of one load cycle. Outcomes of a superseded cycle are dropped.
#[derive(Debug, Clone)]
pub struct CycleHandle {
    pub generation: u64,
    pub token: CancellationToken,
}

impl CycleHandle {
    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }
}

struct Inner {
    retry_count: u64,
    current: Option<CancellationToken>,
}

/// Owns the retry counter and the cancellation scope of the live cycle.
pub struct Orchestrator {
    inner: Mutex<Inner>,
}

impl Default for Orchestrator {
    fn default() -> Self { Self::new() }
}

impl Orchestrator {
    pub fn new() -> Self { Self { inner: Mutex::new(Inner { retry_count: 0, current: None }) } }

    pub fn retry_count(&self) -> u64 { self.inner.lock().retry_count }

    /// Cancel the live cycle (if any) and open a new one for the current count.
    pub fn begin_cycle(&self) -> CycleHandle {
        let mut inner = self.inner.lock();
        if let Some(prev) = inner.current.take() { prev.cancel(); }
        let token = CancellationToken::new();
        inner.current = Some(token.clone());
        CycleHandle { generation: inner.retry_count, token }
    }

    /// Bump the counter and cancel whatever is in flight. The next
    /// [`Orchestrator::begin_cycle`] carries the new count.
    pub fn retry(&self) -> u64 {
        let mut inner = self.inner.lock();
        if let Some(prev) = inner.current.take() { prev.cancel(); }
        inner.retry_count += 1;
        tracing::info!(generation = inner.retry_count, "retrying page load");
        inner.retry_count
    }

    /// Cancel the live cycle without starting another (unmount).
    pub fn shutdown(&self) {
        if let Some(prev) = self.inner.lock().current.take() { prev.cancel(); }
    }
}

/// Settled results of one resource cycle, each in its own failure domain.
#[derive(Debug)]
pub struct CycleOutcome {
    pub profile: Result<Profile, Arc<FetchError>>,
    pub certs: Result<Vec<Cert>, Arc<FetchError>>,
    pub tech_stack: Result<TechStack, Arc<FetchError>>,
}

/// Fetch all three resources concurrently and wait for every one of them.
/// `None` when the cycle was cancelled by the time they settled.
pub async fn run_cycle(fetcher: &dyn Fetch, handle: &CycleHandle) -> Option<CycleOutcome> {
    let opts = FetchOptions::with_cancel(handle.token.clone());
    let (profile, certs, tech_stack) = futures::join!(
        get_typed::<Profile>(fetcher, INFO_PATH, &opts),
        get_typed::<Vec<Cert>>(fetcher, CERTS_PATH, &opts),
        get_typed::<TechStack>(fetcher, TECH_STACKS_PATH, &opts),
    );
    if handle.is_cancelled() {
        tracing::debug!(generation = handle.generation, "discarding superseded load cycle");
        return None;
    }
    Some(CycleOutcome {
        profile: profile.map_err(Arc::new),
        certs: certs.map_err(Arc::new),
        tech_stack: tech_stack.map_err(Arc::new),
    })
}

/// Locale half of a cycle. `None` when cancelled, like [`run_cycle`].
pub async fn run_locale_init(catalog: &Catalog, handle: &CycleHandle) -> Option<Result<(), Arc<LocaleError>>> {
    let res = init_locale(catalog).await;
    if handle.is_cancelled() { return None; }
    Some(res.map_err(Arc::new))
}

/// Load-state containers for the three resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    pub profile: LoadState<Profile>,
    pub certs: LoadState<Vec<Cert>>,
    pub tech_stack: LoadState<TechStack>,
}

fn settle_logged<T>(name: &str, state: &mut LoadState<T>, result: Result<T, Arc<FetchError>>) {
    if let Err(e) = &result {
        tracing::error!(resource = name, error = %e, "resource fetch failed");
    }
    state.settle(result);
}

impl Resources {
    pub fn reset(&mut self) {
        self.profile.reset();
        self.certs.reset();
        self.tech_stack.reset();
    }

    /// Fold each outcome into its own container independently.
    pub fn apply(&mut self, outcome: CycleOutcome) {
        settle_logged("profile", &mut self.profile, outcome.profile);
        settle_logged("certs", &mut self.certs, outcome.certs);
        settle_logged("tech_stack", &mut self.tech_stack, outcome.tech_stack);
    }
}

/// Which top-level screen to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    /// Locale failed or the profile failed: full-page error with retry.
    Error,
    /// Locale bundle not ready yet.
    Loading,
    Ready,
}

/// Everything the composition root tracks for one page.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub resources: Resources,
    pub locale_ready: bool,
    pub locale_error: Option<Arc<LocaleError>>,
}

impl PageState {
    pub fn view(&self) -> PageView {
        if self.locale_error.is_some() || self.resources.profile.error().is_some() { return PageView::Error; }
        if !self.locale_ready { return PageView::Loading; }
        PageView::Ready
    }

    /// Back to the initial state ahead of a retry.
    pub fn reset(&mut self) {
        self.resources.reset();
        self.locale_ready = false;
        self.locale_error = None;
    }

    pub fn apply_locale(&mut self, result: Result<(), Arc<LocaleError>>) {
        match result {
            Ok(()) => self.locale_ready = true,
            Err(e) => {
                tracing::error!(error = %e, "locale initialization failed");
                self.locale_error = Some(e);
            }
        }
    }

    /// Record a failed user-initiated switch as a page-level error.
    pub fn fail_locale(&mut self, err: LocaleError) {
        tracing::error!(error = %err, "locale switch failed");
        self.locale_error = Some(Arc::new(err));
    }
}

/// Window title from the active locale and, once known, the profile name.
pub fn page_title(catalog: &Catalog, name: Option<&str>) -> String {
    match name {
        Some(n) => catalog.tr_fmt("meta.title", &[("name", n)]),
        None => catalog.tr("meta.titleNoName"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use crate::lang::tests::CountingBundles;
    use crate::lang::{EmbeddedBundles, Locale};

    #[derive(Clone)]
    pub(crate) struct Route {
        pub delay: Duration,
        pub result: Result<Value, u16>,
    }

    /// In-memory [`Fetch`] with per-path latency and outcome.
    #[derive(Default)]
    pub(crate) struct Scripted {
        routes: Mutex<HashMap<String, Route>>,
        pub calls: AtomicUsize,
    }

    impl Scripted {
        pub fn route(&self, path: &str, delay_ms: u64, result: Result<Value, u16>) {
            self.routes.lock().insert(path.to_string(), Route { delay: Duration::from_millis(delay_ms), result });
        }

        pub fn healthy() -> Self {
            let s = Scripted::default();
            s.route(INFO_PATH, 0, Ok(profile_json("A")));
            s.route(CERTS_PATH, 0, Ok(json!([{"name": "CKA", "issuer": "cert.linuxFoundation", "year": "2024", "href": "https://example.com/cka"}])));
            s.route(TECH_STACKS_PATH, 0, Ok(json!({"groupA": ["X", "Y"]})));
            s
        }
    }

    pub(crate) fn profile_json(name: &str) -> Value {
        json!({"name": name, "contact": {"email": "a@example.com", "wechat": "a", "phone": "+1 555", "github": "https://github.com/a", "linkedin": "https://linkedin.com/in/a"}})
    }

    #[async_trait]
    impl Fetch for Scripted {
        async fn get_json(&self, path: &str, opts: &FetchOptions) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let route = self.routes.lock().get(path).cloned();
            let work = async move {
                let Some(route) = route else {
                    return Err(FetchError::Status { url: path.to_string(), status: 404, status_text: "Not Found".into() });
                };
                tokio::time::sleep(route.delay).await;
                route.result.map_err(|status| FetchError::Status { url: path.to_string(), status, status_text: "Internal Server Error".into() })
            };
            match &opts.cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => Err(FetchError::Cancelled { url: path.to_string() }),
                    r = work => r,
                },
                None => work.await,
            }
        }
    }

    #[tokio::test]
    async fn failure_in_one_resource_leaves_siblings_alone() {
        let fetcher = Scripted::healthy();
        fetcher.route(CERTS_PATH, 0, Err(500));
        let orch = Orchestrator::new();
        let handle = orch.begin_cycle();
        let mut page = PageState::default();
        page.apply_locale(Ok(()));
        page.resources.apply(run_cycle(&fetcher, &handle).await.unwrap());

        assert_eq!(page.resources.profile.data().map(|p| p.name.as_str()), Some("A"));
        assert!(page.resources.profile.error().is_none());
        assert_eq!(page.resources.tech_stack.data().unwrap().groups()[0].items, vec!["X".to_string(), "Y".to_string()]);
        let certs_err = page.resources.certs.error().unwrap();
        assert!(matches!(certs_err.as_ref(), FetchError::Status { status: 500, .. }));
        assert!(page.resources.certs.data().is_none());
        assert!(!page.resources.certs.is_loading());
        // certs failing alone does not take the page down
        assert_eq!(page.view(), PageView::Ready);
    }

    #[tokio::test]
    async fn shipped_assets_over_http_keep_stack_group_order() {
        use crate::fetch::HttpFetcher;
        use reqwest::Url;
        let mut server = mockito::Server::new_async().await;
        for (path, body) in [
            (INFO_PATH, include_str!("../assets/info.json")),
            (CERTS_PATH, include_str!("../assets/certs.json")),
            (TECH_STACKS_PATH, include_str!("../assets/techStacks.json")),
        ] {
            server.mock("GET", format!("/{path}").as_str()).with_body(body).create_async().await;
        }
        let fetcher = HttpFetcher::new(Url::parse(&format!("{}/", server.url())).unwrap(), Duration::from_secs(5)).unwrap();
        let outcome = run_cycle(&fetcher, &Orchestrator::new().begin_cycle()).await.unwrap();
        let stack = outcome.tech_stack.unwrap();
        let labels: Vec<&str> = stack.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec![
            "stack.labels.languagesFrameworks",
            "stack.labels.dbMiddlewares",
            "stack.labels.cloud",
            "stack.labels.frontendFullstack",
        ]);
        assert_eq!(outcome.certs.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn scripted_stack_keeps_key_order() {
        let fetcher = Scripted::healthy();
        fetcher.route(TECH_STACKS_PATH, 0, Ok(json!({"zeta": ["Z"], "alpha": ["A"], "mid": ["M"]})));
        let outcome = run_cycle(&fetcher, &Orchestrator::new().begin_cycle()).await.unwrap();
        let labels: Vec<String> = outcome.tech_stack.unwrap().groups().iter().map(|g| g.label.clone()).collect();
        assert_eq!(labels, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn profile_failure_is_page_level() {
        let fetcher = Scripted::healthy();
        fetcher.route(INFO_PATH, 0, Err(503));
        let orch = Orchestrator::new();
        let mut page = PageState::default();
        page.apply_locale(Ok(()));
        page.resources.apply(run_cycle(&fetcher, &orch.begin_cycle()).await.unwrap());
        assert_eq!(page.view(), PageView::Error);
        assert!(page.resources.certs.data().is_some());
    }

    #[tokio::test]
    async fn slow_sibling_does_not_block_failure_reporting_of_others() {
        let fetcher = Scripted::healthy();
        fetcher.route(TECH_STACKS_PATH, 40, Err(500));
        fetcher.route(CERTS_PATH, 0, Err(502));
        let outcome = run_cycle(&fetcher, &Orchestrator::new().begin_cycle()).await.unwrap();
        assert!(outcome.profile.is_ok());
        assert!(outcome.certs.is_err());
        assert!(outcome.tech_stack.is_err());
    }

    #[tokio::test]
    async fn retry_supersedes_in_flight_cycle() {
        let fetcher = Arc::new(Scripted::healthy());
        fetcher.route(INFO_PATH, 100, Ok(profile_json("old")));
        let orch = Arc::new(Orchestrator::new());
        let page = Arc::new(Mutex::new(PageState::default()));
        let applied = Arc::new(AtomicUsize::new(0));

        let spawn_cycle = |handle: CycleHandle| {
            let (fetcher, page, applied) = (fetcher.clone(), page.clone(), applied.clone());
            tokio::spawn(async move {
                if let Some(outcome) = run_cycle(fetcher.as_ref(), &handle).await {
                    applied.fetch_add(1, Ordering::SeqCst);
                    page.lock().resources.apply(outcome);
                }
            })
        };

        let first = spawn_cycle(orch.begin_cycle());
        tokio::time::sleep(Duration::from_millis(10)).await;
        fetcher.route(INFO_PATH, 0, Ok(profile_json("new")));
        page.lock().reset();
        orch.retry();
        let second = spawn_cycle(orch.begin_cycle());
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(orch.retry_count(), 1);
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert_eq!(page.lock().resources.profile.data().unwrap().name, "new");
    }

    #[tokio::test]
    async fn completed_but_cancelled_cycle_is_discarded() {
        let fetcher = Scripted::healthy();
        let orch = Orchestrator::new();
        let handle = orch.begin_cycle();
        orch.shutdown();
        assert!(run_cycle(&fetcher, &handle).await.is_none());
    }

    #[tokio::test]
    async fn begin_cycle_cancels_previous_scope() {
        let orch = Orchestrator::new();
        let a = orch.begin_cycle();
        let b = orch.begin_cycle();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert_eq!(a.generation, b.generation);
        assert_eq!(orch.retry(), 1);
        assert!(b.is_cancelled());
        assert_eq!(orch.begin_cycle().generation, 1);
    }

    #[tokio::test]
    async fn locale_failure_on_mount_then_retry_reloads_everything() {
        let fetcher = Scripted::healthy();
        let bundles = Arc::new(CountingBundles::default());
        *bundles.fail.lock() = Some(Locale::En);
        let catalog = Catalog::new(bundles.clone(), Locale::En);
        let orch = Orchestrator::new();
        let mut page = PageState::default();

        let handle = orch.begin_cycle();
        page.apply_locale(run_locale_init(&catalog, &handle).await.unwrap());
        page.resources.apply(run_cycle(&fetcher, &handle).await.unwrap());
        assert_eq!(page.view(), PageView::Error);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);

        *bundles.fail.lock() = None;
        page.reset();
        assert_eq!(page.view(), PageView::Loading);
        orch.retry();
        let handle = orch.begin_cycle();
        let (locale, outcome) = futures::join!(run_locale_init(&catalog, &handle), run_cycle(&fetcher, &handle));
        page.apply_locale(locale.unwrap());
        page.resources.apply(outcome.unwrap());

        assert_eq!(page.view(), PageView::Ready);
        assert_eq!(bundles.loads.load(Ordering::SeqCst), 2);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn stale_locale_init_is_discarded() {
        let catalog = Catalog::new(Arc::new(EmbeddedBundles), Locale::En);
        let orch = Orchestrator::new();
        let handle = orch.begin_cycle();
        orch.retry();
        assert!(run_locale_init(&catalog, &handle).await.is_none());
    }

    #[tokio::test]
    async fn page_waits_for_locale_before_ready() {
        let mut page = PageState::default();
        assert_eq!(page.view(), PageView::Loading);
        page.resources.apply(run_cycle(&Scripted::healthy(), &Orchestrator::new().begin_cycle()).await.unwrap());
        assert_eq!(page.view(), PageView::Loading);
        page.apply_locale(Ok(()));
        assert_eq!(page.view(), PageView::Ready);
        page.fail_locale(LocaleError::NotLoaded(Locale::ZhCn));
        assert_eq!(page.view(), PageView::Error);
    }

    #[tokio::test]
    async fn title_uses_name_once_known() {
        let catalog = Catalog::new(Arc::new(EmbeddedBundles), Locale::En);
        catalog.load(Locale::En).await.unwrap();
        assert_eq!(page_title(&catalog, None), "Portfolio");
        assert_eq!(page_title(&catalog, Some("A")), "A · Portfolio");
        catalog.load(Locale::ZhCn).await.unwrap();
        catalog.apply(Locale::ZhCn).unwrap();
        assert_eq!(page_title(&catalog, Some("A")), "A · 个人主页");
    }
}
