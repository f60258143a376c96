//! Dioxus desktop GUI: composition root, page state and effects.
use std::rc::Rc;
use std::sync::Arc;
use anyhow::Result;
use dioxus::prelude::*;
use crate::config::{AppConfig, BundleMode};
use crate::fetch::{Fetch, HttpFetcher};
use crate::lang::{BundleSource, Catalog, EmbeddedBundles, Locale, RemoteBundles};
use crate::locale::{initial_locale, LocaleSwitcher, SchedulerTick};
use crate::orchestrator::{page_title, run_cycle, run_locale_init, Orchestrator, PageState, PageView};
use crate::prefs::{FilePreferenceStore, PreferenceStore};
use crate::scroll::{active_section, is_scrolled, SectionId, SectionRect, ANCHOR_Y};
use crate::sections::*;
use crate::theme::{Theme, GLOBAL_CSS};
use crate::types::HANDLE;

/// Long-lived services handed to the root component as context.
#[derive(Clone)]
pub struct Services {
    pub fetcher: Arc<dyn Fetch>,
    pub catalog: Arc<Catalog>,
    pub switcher: Arc<LocaleSwitcher>,
    pub prefs: Arc<dyn PreferenceStore>,
    pub orchestrator: Arc<Orchestrator>,
}

impl Services {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(cfg.base_url.clone(), cfg.timeout)?);
        let prefs_path = cfg.prefs_path.clone().unwrap_or_else(FilePreferenceStore::default_path);
        let prefs: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::open(prefs_path));
        let source: Arc<dyn BundleSource> = match cfg.bundles {
            BundleMode::Embedded => Arc::new(EmbeddedBundles),
            BundleMode::Remote => Arc::new(RemoteBundles::new(fetcher.clone())),
        };
        let catalog = Arc::new(Catalog::new(source, initial_locale(prefs.as_ref())));
        let switcher = Arc::new(LocaleSwitcher::new(catalog.clone(), prefs.clone(), Arc::new(SchedulerTick)));
        Ok(Self { fetcher, catalog, switcher, prefs, orchestrator: Arc::new(Orchestrator::new()) })
    }
}

/// Launch the desktop application.
pub fn run(services: Services) -> Result<()> {
    let cfg = dioxus_desktop::Config::new()
        .with_window(dioxus_desktop::WindowBuilder::new().with_title("Portfolio"));
    dioxus_desktop::launch::launch(
        app,
        vec![Box::new(move || Box::new(services.clone()) as Box<dyn std::any::Any>)],
        vec![Box::new(cfg)],
    );
}

/// Mounted nodes used for scroll measurements.
#[derive(Clone, Default)]
struct ScrollRefs {
    page: Option<Rc<MountedData>>,
    sections: [Option<Rc<MountedData>>; 3],
}

/// Re-derive the header state from current layout.
async fn measure(refs: ScrollRefs, mut scrolled: Signal<bool>, mut active: Signal<Option<SectionId>>) {
    let offset = match &refs.page {
        Some(page) => page.get_scroll_offset().await.map(|o| o.y).unwrap_or(0.0),
        None => 0.0,
    };
    let mut rects = Vec::with_capacity(SectionId::TRACKED.len());
    for id in SectionId::TRACKED {
        let Some(node) = &refs.sections[id.index()] else { continue };
        if let Ok(r) = node.get_client_rect().await {
            rects.push((id, SectionRect { top: r.min_y(), bottom: r.max_y() }));
        }
    }
    let next_scrolled = is_scrolled(offset);
    let next_active = active_section(&rects, ANCHOR_Y);
    if *scrolled.peek() != next_scrolled { scrolled.set(next_scrolled); }
    if *active.peek() != next_active { active.set(next_active); }
}

/// Root component: owns page state and drives load cycles off the retry count.
fn app() -> Element {
    let services = use_context::<Services>();
    let mut page = use_signal(PageState::default);
    let mut locale = use_signal(|| services.catalog.active());
    let mut theme = use_signal(|| Theme::load(services.prefs.as_ref()));
    let mut switching = use_signal(|| false);
    let mut retry_count = use_signal(|| services.orchestrator.retry_count());
    let scrolled = use_signal(|| false);
    let active = use_signal(|| None::<SectionId>);
    let mut scroll_refs = use_signal(ScrollRefs::default);
    let i18n = use_context_provider(|| I18n { catalog: services.catalog.clone(), locale });

    // load cycle: locale init + three resources, restarted whenever the count changes
    {
        let services = services.clone();
        use_effect(move || {
            let generation = *retry_count.read();
            let handle = services.orchestrator.begin_cycle();
            tracing::debug!(generation, "starting load cycle");
            let (catalog, h) = (services.catalog.clone(), handle.clone());
            spawn(async move {
                if let Some(res) = run_locale_init(&catalog, &h).await { page.write().apply_locale(res); }
            });
            let fetcher = services.fetcher.clone();
            spawn(async move {
                if let Some(outcome) = run_cycle(fetcher.as_ref(), &handle).await { page.write().resources.apply(outcome); }
            });
        });
    }
    {
        let orchestrator = services.orchestrator.clone();
        use_drop(move || orchestrator.shutdown());
    }

    // mirror catalog changes into the locale signal so sections repaint
    {
        let catalog = services.catalog.clone();
        use_future(move || {
            let mut rx = catalog.subscribe();
            async move {
                while rx.changed().await.is_ok() {
                    let next = *rx.borrow_and_update();
                    locale.set(next);
                }
            }
        });
    }

    // window title follows locale and profile name
    let window = dioxus_desktop::use_window();
    {
        let catalog = services.catalog.clone();
        use_effect(move || {
            let _ = locale.read(); // dependency anchor
            let name = page.read().resources.profile.data().map(|p| p.name.clone());
            window.set_title(&page_title(&catalog, name.as_deref()));
        });
    }

    let on_retry = {
        let orchestrator = services.orchestrator.clone();
        move |_: ()| {
            page.write().reset();
            switching.set(false);
            retry_count.set(orchestrator.retry());
        }
    };

    let on_lang_change = {
        let switcher = services.switcher.clone();
        move |next: Locale| {
            let switcher = switcher.clone();
            spawn(async move {
                switching.set(true);
                let res = switcher.switch(next).await;
                switching.set(switcher.is_switching());
                if let Err(e) = res { page.write().fail_locale(e); }
            });
        }
    };

    let on_theme_toggle = {
        let prefs = services.prefs.clone();
        move |_: ()| {
            let next = theme().toggle();
            next.save(prefs.as_ref());
            theme.set(next);
        }
    };

    let on_scroll = move |_: ScrollEvent| { spawn(measure(scroll_refs.read().clone(), scrolled, active)); };
    let track = move |id: SectionId| {
        move |e: MountedEvent| {
            scroll_refs.write().sections[id.index()] = Some(e.data());
            spawn(measure(scroll_refs.read().clone(), scrolled, active));
        }
    };

    let view = page.read().view();
    let body = match view {
        PageView::Error => rsx! { ErrorScreen { on_retry } },
        PageView::Loading => rsx! { LoadingScreen {} },
        PageView::Ready => {
            let error_message = i18n.tr("error.message");
            let state = page.read();
            let res = &state.resources;
            let profile = res.profile.data().cloned();
            let stack = res.tech_stack.data().map(|t| stack_groups(&i18n.catalog, t)).unwrap_or_default();
            let stack_loading = res.tech_stack.is_loading();
            let stack_error = res.tech_stack.error().map(|_| error_message.clone());
            let certs = res.certs.data().map(|c| cert_views(&i18n.catalog, c)).unwrap_or_default();
            let certs_loading = res.certs.is_loading();
            let certs_error = res.certs.error().map(|_| error_message.clone());
            drop(state);
            let hero = match &profile {
                Some(p) => rsx! {
                    Terminal { title: "~/portfolio", name: p.name.clone(), line2: i18n.tr("terminal.line2"), contact: p.contact.clone() }
                    ContactCard { contact: p.contact.clone() }
                },
                None => rsx! {
                    TerminalSkeleton {}
                    ContactSkeleton {}
                },
            };
            rsx! {
                HeaderBar {
                    scrolled: scrolled(),
                    active: active(),
                    locale: locale(),
                    on_lang_change: on_lang_change.clone(),
                    lang_disabled: switching(),
                    theme: theme(),
                    on_theme_toggle: on_theme_toggle.clone(),
                }
                div { class: "container",
                    header { style: "display:flex;flex-direction:column;gap:28px;",
                        div { style: "display:flex;flex-direction:column;gap:12px;",
                            div { style: "display:flex;flex-wrap:wrap;align-items:center;justify-content:space-between;gap:12px;",
                                div { style: "display:flex;flex-wrap:wrap;align-items:baseline;gap:8px 12px;",
                                    h1 { style: "margin:0;font-size:30px;font-weight:600;letter-spacing:-0.02em;color:var(--color-text-strong);",
                                        if let Some(p) = &profile {
                                            "{p.name}"
                                        } else {
                                            span { class: "skeleton", style: "display:inline-block;width:192px;height:30px;vertical-align:middle;", "aria-hidden": "true" }
                                        }
                                    }
                                    span { class: "mono", style: "font-size:14px;color:var(--color-text-dim);", "@{HANDLE}" }
                                }
                                if !scrolled() {
                                    div { style: "display:flex;align-items:center;gap:8px;",
                                        ThemeToggle { theme: theme(), on_toggle: on_theme_toggle.clone() }
                                        LanguageToggle { value: locale(), on_change: on_lang_change.clone(), disabled: switching() }
                                    }
                                }
                            }
                            p { class: "muted", style: "margin:0;line-height:1.6;font-size:15px;", {i18n.tr("header.tagline")} }
                            if let Some(p) = &profile {
                                SocialButtons { linkedin_url: p.contact.linkedin.clone() }
                            }
                        }
                        div { class: "grid-2", {hero} }
                    }
                    main { style: "margin-top:40px;display:grid;gap:40px;",
                        AboutSection { title: i18n.tr("about.title"), items: i18n.tr_list("about.items"), onmounted: track(SectionId::About) }
                        StackSection {
                            title: i18n.tr("stack.title"),
                            groups: stack,
                            is_loading: stack_loading,
                            error_message: stack_error,
                            onmounted: track(SectionId::Stack),
                        }
                        CertsSection {
                            title: i18n.tr("cert.title"),
                            valid_label: i18n.tr("cert.valid"),
                            view_label: i18n.tr("cert.viewOnCredly"),
                            certs,
                            is_loading: certs_loading,
                            error_message: certs_error,
                            onmounted: track(SectionId::Certs),
                        }
                    }
                    Footer {}
                }
            }
        }
    };

    rsx! {
        style { {GLOBAL_CSS} }
        div {
            class: "page",
            "data-theme": theme().code(),
            onscroll: on_scroll,
            onmounted: move |e: MountedEvent| { scroll_refs.write().page = Some(e.data()); },
            div { class: "bg-grid" }
            {body}
        }
    }
}
