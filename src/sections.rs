//! Presentational components. Each one renders error, loading or data from
//! its props alone; translations come from the [`I18n`] context.
use std::sync::Arc;
use dioxus::prelude::*;
use crate::lang::{Catalog, Locale};
use crate::load_state::SectionView;
use crate::scroll::SectionId;
use crate::theme::Theme;
use crate::types::{Cert, Contact, TechStack, HANDLE, PROJECT_URL};

/// Active catalog plus the locale signal components subscribe to.
#[derive(Clone)]
pub struct I18n {
    pub catalog: Arc<Catalog>,
    pub locale: Signal<Locale>,
}

impl I18n {
    pub fn tr(&self, key: &str) -> String {
        let _ = self.locale.read(); // dependency anchor
        self.catalog.tr(key)
    }

    pub fn tr_list(&self, key: &str) -> Vec<String> {
        let _ = self.locale.read();
        self.catalog.tr_list(key)
    }
}

pub fn use_i18n() -> I18n { use_context::<I18n>() }

#[derive(Debug, Clone, PartialEq)]
pub struct StackGroupView {
    /// Sibling key; position-based since labels need not be unique.
    pub key: String,
    pub title: String,
    pub items: Vec<String>,
}

/// Groups in document order with their labels translated.
pub fn stack_groups(catalog: &Catalog, stack: &TechStack) -> Vec<StackGroupView> {
    stack
        .groups()
        .iter()
        .enumerate()
        .map(|(i, g)| StackGroupView { key: format!("{i}-{}", g.label), title: catalog.tr(&g.label), items: g.items.clone() })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertView {
    pub key: String,
    pub name: String,
    pub issuer: String,
    pub year: String,
    pub href: String,
}

pub fn cert_views(catalog: &Catalog, certs: &[Cert]) -> Vec<CertView> {
    certs
        .iter()
        .enumerate()
        .map(|(i, c)| CertView { key: format!("{i}-{}", c.name), name: c.name.clone(), issuer: catalog.tr(&c.issuer), year: c.year.clone(), href: c.href.clone() })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactRow {
    pub label_key: &'static str,
    pub value: String,
    pub href: Option<String>,
}

/// Contact lines in display order; links only where a scheme makes sense.
pub fn contact_rows(contact: &Contact) -> Vec<ContactRow> {
    let strip = |url: &str| url.trim_start_matches("https://").trim_start_matches("http://").trim_end_matches('/').to_string();
    vec![
        ContactRow { label_key: "contact.email", value: contact.email.clone(), href: Some(format!("mailto:{}", contact.email)) },
        ContactRow { label_key: "contact.wechat", value: contact.wechat.clone(), href: None },
        ContactRow { label_key: "contact.phone", value: contact.phone.clone(), href: Some(format!("tel:{}", contact.phone.replace(' ', ""))) },
        ContactRow { label_key: "contact.github", value: strip(&contact.github), href: Some(contact.github.clone()) },
        ContactRow { label_key: "contact.linkedin", value: strip(&contact.linkedin), href: Some(contact.linkedin.clone()) },
    ]
}

#[component]
pub fn Card(#[props(default)] busy: bool, children: Element) -> Element {
    rsx! {
        div { class: "card", "aria-busy": if busy { "true" } else { "false" }, {children} }
    }
}

#[component]
fn SkeletonBar(width: String, height: String, #[props(default)] round: bool) -> Element {
    let radius = if round { "border-radius:999px;" } else { "" };
    rsx! {
        div { class: "skeleton", style: "width:{width};height:{height};{radius}", "aria-hidden": "true" }
    }
}

#[component]
pub fn Section(id: SectionId, title: String, onmounted: EventHandler<MountedEvent>, children: Element) -> Element {
    rsx! {
        section { id: id.dom_id(), style: "scroll-margin-top:80px;", onmounted: move |e| onmounted.call(e),
            h2 { class: "section-title", "{title}" }
            {children}
        }
    }
}

#[component]
pub fn LanguageToggle(value: Locale, on_change: EventHandler<Locale>, #[props(default)] disabled: bool) -> Element {
    let i18n = use_i18n();
    rsx! {
        div { class: "segmented", role: "radiogroup", "aria-label": i18n.tr("lang.label"), "aria-disabled": if disabled { "true" } else { "false" },
            for l in Locale::SUPPORTED {
                button {
                    key: "{l.code()}",
                    r#type: "button",
                    role: "radio",
                    class: if l == value { "active" } else { "" },
                    "aria-checked": if l == value { "true" } else { "false" },
                    disabled,
                    onclick: move |_| { if l != value { on_change.call(l); } },
                    "{l.label()}"
                }
            }
        }
    }
}

#[component]
pub fn ThemeToggle(theme: Theme, on_toggle: EventHandler<()>) -> Element {
    let i18n = use_i18n();
    let label = i18n.tr(theme.toggle_label_key());
    rsx! {
        button { class: "icon-btn", r#type: "button", title: "{label}", "aria-label": "{label}", onclick: move |_| on_toggle.call(()),
            "{theme.icon()}"
        }
    }
}

#[component]
pub fn HeaderBar(
    scrolled: bool,
    active: Option<SectionId>,
    locale: Locale,
    on_lang_change: EventHandler<Locale>,
    lang_disabled: bool,
    theme: Theme,
    on_theme_toggle: EventHandler<()>,
) -> Element {
    let i18n = use_i18n();
    let path = active.map(|s| s.path()).unwrap_or("");
    rsx! {
        div { class: if scrolled { "header-bar scrolled" } else { "header-bar" },
            div { class: "mono", style: "font-size:13px;color:var(--color-text-dim);",
                span { style: "color:var(--color-text-strong);", "~/{HANDLE}" }
                span { style: "color:var(--color-accent);", "{path}" }
            }
            nav { style: "display:flex;gap:14px;font-size:13px;",
                for s in SectionId::TRACKED {
                    a {
                        key: "{s.dom_id()}",
                        href: "#{s.dom_id()}",
                        style: if Some(s) == active { "color:var(--color-text-strong);font-weight:600;" } else { "color:var(--color-text-dim);" },
                        {i18n.tr(s.nav_key())}
                    }
                }
            }
            if scrolled {
                div { style: "display:flex;align-items:center;gap:8px;",
                    ThemeToggle { theme, on_toggle: on_theme_toggle }
                    LanguageToggle { value: locale, on_change: on_lang_change, disabled: lang_disabled }
                }
            } else {
                SocialButtons {}
            }
        }
    }
}

#[component]
pub fn SocialButtons(linkedin_url: Option<String>) -> Element {
    let i18n = use_i18n();
    rsx! {
        div { style: "display:flex;align-items:center;gap:8px;",
            a { class: "icon-btn", href: PROJECT_URL, target: "_blank", rel: "noopener noreferrer", title: "GitHub", "aria-label": i18n.tr("social.project"), "GH" }
            if let Some(url) = linkedin_url {
                a { class: "icon-btn", href: "{url}", target: "_blank", rel: "noopener noreferrer", title: "LinkedIn", "aria-label": i18n.tr("social.linkedin"), "in" }
            }
            button { class: "icon-btn", r#type: "button", disabled: true, title: i18n.tr("social.resume"), "aria-label": i18n.tr("social.resume"), "⇩" }
        }
    }
}

/// Hero card styled as a shell session.
#[component]
pub fn Terminal(title: String, name: String, line2: String, contact: Contact) -> Element {
    rsx! {
        div { class: "card mono", style: "font-size:13px;line-height:1.7;",
            div { style: "display:flex;align-items:center;gap:6px;margin-bottom:12px;",
                span { style: "width:10px;height:10px;border-radius:50%;background:#f87171;" }
                span { style: "width:10px;height:10px;border-radius:50%;background:#fbbf24;" }
                span { style: "width:10px;height:10px;border-radius:50%;background:#34d399;" }
                span { style: "margin-left:8px;color:var(--color-text-dim);", "{title}" }
            }
            div { span { style: "color:var(--color-accent);", "$ " } "whoami" }
            div { style: "color:var(--color-text-strong);", "{name}" }
            div { style: "color:var(--color-text-dim);", "{line2}" }
            div { style: "margin-top:10px;", span { style: "color:var(--color-accent);", "$ " } "cat contact.json" }
            div { "{{" }
            div { style: "padding-left:16px;", "\"email\": \"{contact.email}\"," }
            div { style: "padding-left:16px;", "\"wechat\": \"{contact.wechat}\"," }
            div { style: "padding-left:16px;", "\"phone\": \"{contact.phone}\"," }
            div { style: "padding-left:16px;", "\"github\": \"{contact.github}\"," }
            div { style: "padding-left:16px;", "\"linkedin\": \"{contact.linkedin}\"" }
            div { "}}" }
        }
    }
}

#[component]
pub fn TerminalSkeleton() -> Element {
    rsx! {
        Card { busy: true,
            SkeletonBar { width: "160px", height: "16px" }
            div { style: "margin-top:12px;", SkeletonBar { width: "208px", height: "12px" } }
            div { style: "margin-top:12px;", SkeletonBar { width: "192px", height: "12px" } }
            div { style: "margin-top:24px;display:flex;flex-direction:column;gap:8px;",
                for i in 0..6 { SkeletonBar { key: "{i}", width: "100%", height: "12px" } }
            }
        }
    }
}

#[component]
pub fn ContactCard(contact: Contact) -> Element {
    let i18n = use_i18n();
    rsx! {
        Card {
            div { style: "display:flex;align-items:flex-start;justify-content:space-between;gap:16px;",
                div { style: "font-size:14px;font-weight:600;color:var(--color-text-strong);", {i18n.tr("contact.title")} }
                span { class: "badge ok", {i18n.tr("contact.badge")} }
            }
            div { style: "margin-top:18px;display:grid;gap:10px;",
                for row in contact_rows(&contact) {
                    div { key: "{row.label_key}", style: "display:flex;justify-content:space-between;gap:12px;padding:12px 14px;border:1px solid var(--color-border);border-radius:var(--radius-md);",
                        span { class: "muted", {i18n.tr(row.label_key)} }
                        if let Some(href) = row.href.clone() {
                            a { href: "{href}", target: "_blank", rel: "noopener noreferrer", style: "color:var(--color-text-strong);font-size:14px;", "{row.value}" }
                        } else {
                            span { style: "color:var(--color-text-strong);font-size:14px;", "{row.value}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ContactSkeleton() -> Element {
    rsx! {
        Card { busy: true,
            div { style: "display:flex;justify-content:space-between;gap:16px;",
                SkeletonBar { width: "96px", height: "16px" }
                SkeletonBar { width: "48px", height: "20px", round: true }
            }
            div { style: "margin-top:20px;display:grid;gap:12px;",
                for i in 0..5 {
                    div { key: "{i}", style: "height:52px;border-radius:var(--radius-md);border:1px solid var(--color-border);" }
                }
            }
        }
    }
}

/// Inline error card used inside a section.
#[component]
fn InlineError(message: String) -> Element {
    rsx! { Card { div { class: "muted", "{message}" } } }
}

#[component]
pub fn AboutSection(title: String, items: Vec<String>, onmounted: EventHandler<MountedEvent>) -> Element {
    rsx! {
        Section { id: SectionId::About, title, onmounted,
            Card {
                ul { style: "margin:0;padding-left:20px;display:flex;flex-direction:column;gap:8px;line-height:1.6;",
                    for (i, item) in items.iter().enumerate() { li { key: "{i}", "{item}" } }
                }
            }
        }
    }
}

#[component]
pub fn StackSection(
    title: String,
    groups: Vec<StackGroupView>,
    is_loading: bool,
    error_message: Option<String>,
    onmounted: EventHandler<MountedEvent>,
) -> Element {
    let body = match SectionView::<_, str>::select(error_message.as_deref(), is_loading, Some(&groups)) {
        SectionView::Error(msg) => rsx! { InlineError { message: msg.to_string() } },
        SectionView::Loading => rsx! {
            div { class: "grid-2", "aria-busy": "true",
                for i in 0..2 {
                    Card { key: "{i}", busy: true,
                        SkeletonBar { width: "160px", height: "16px" }
                        div { style: "margin-top:16px;display:flex;flex-wrap:wrap;gap:8px;",
                            for j in 0..8 { SkeletonBar { key: "{j}", width: "80px", height: "24px", round: true } }
                        }
                    }
                }
            }
        },
        SectionView::Loaded(groups) => rsx! {
            div { class: "grid-2",
                for group in groups.iter() {
                    Card { key: "{group.key}",
                        div { style: "font-size:14px;font-weight:600;color:var(--color-text-strong);", "{group.title}" }
                        div { style: "margin-top:16px;display:flex;flex-wrap:wrap;gap:8px;",
                            for (i, item) in group.items.iter().enumerate() { span { key: "{i}", class: "badge", "{item}" } }
                        }
                    }
                }
            }
        },
    };
    rsx! {
        Section { id: SectionId::Stack, title, onmounted, {body} }
    }
}

#[component]
pub fn CertsSection(
    title: String,
    valid_label: String,
    view_label: String,
    certs: Vec<CertView>,
    is_loading: bool,
    error_message: Option<String>,
    onmounted: EventHandler<MountedEvent>,
) -> Element {
    let body = match SectionView::<_, str>::select(error_message.as_deref(), is_loading, Some(&certs)) {
        SectionView::Error(msg) => rsx! { InlineError { message: msg.to_string() } },
        SectionView::Loading => rsx! {
            div { class: "grid-2", "aria-busy": "true",
                for i in 0..3 {
                    Card { key: "{i}", busy: true,
                        SkeletonBar { width: "70%", height: "16px" }
                        div { style: "margin-top:12px;", SkeletonBar { width: "40%", height: "12px" } }
                        div { style: "margin-top:18px;", SkeletonBar { width: "96px", height: "24px", round: true } }
                    }
                }
            }
        },
        SectionView::Loaded(certs) => rsx! {
            div { class: "grid-2",
                for cert in certs.iter() {
                    Card { key: "{cert.key}",
                        div { style: "display:flex;justify-content:space-between;gap:12px;",
                            div { style: "font-size:14px;font-weight:600;color:var(--color-text-strong);", "{cert.name}" }
                            span { class: "badge ok", "{valid_label}" }
                        }
                        div { class: "muted", style: "margin-top:8px;", "{cert.issuer} · {cert.year}" }
                        a { href: "{cert.href}", target: "_blank", rel: "noopener noreferrer", style: "display:inline-block;margin-top:14px;font-size:13px;color:var(--color-accent);",
                            "{view_label} →"
                        }
                    }
                }
            }
        },
    };
    rsx! {
        Section { id: SectionId::Certs, title, onmounted, {body} }
    }
}

#[component]
pub fn Footer() -> Element {
    let i18n = use_i18n();
    rsx! {
        footer { class: "muted", style: "margin-top:48px;padding:24px 0;border-top:1px solid var(--color-border);font-size:13px;",
            span { style: "color:var(--color-text-strong);", "{HANDLE}" }
            " • "
            {i18n.tr("footer.builtWith")}
        }
    }
}

#[component]
pub fn ErrorScreen(on_retry: EventHandler<()>) -> Element {
    let i18n = use_i18n();
    rsx! {
        div { style: "position:absolute;inset:0;display:flex;align-items:center;justify-content:center;",
            div { style: "margin:0 16px;max-width:420px;display:flex;flex-direction:column;align-items:center;gap:16px;text-align:center;",
                h1 { style: "margin:0;font-size:20px;font-weight:600;color:var(--color-text-strong);", {i18n.tr("error.title")} }
                p { class: "muted", style: "margin:0;", {i18n.tr("error.message")} }
                button {
                    r#type: "button",
                    style: "border:0;border-radius:var(--radius-sm);padding:8px 16px;font-size:14px;font-weight:500;background:var(--color-text-strong);color:var(--color-bg);",
                    onclick: move |_| on_retry.call(()),
                    {i18n.tr("error.retry")}
                }
            }
        }
    }
}

#[component]
pub fn LoadingScreen() -> Element {
    let i18n = use_i18n();
    rsx! {
        div { style: "position:absolute;inset:0;display:flex;align-items:center;justify-content:center;", "aria-busy": "true",
            div { role: "status", style: "display:flex;flex-direction:column;align-items:center;gap:16px;",
                div { class: "spinner", "aria-hidden": "true" }
                p { class: "muted", style: "margin:0;font-weight:500;", {i18n.tr("loading")} }
            }
        }
    }
}
