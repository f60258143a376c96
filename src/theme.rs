//! Light/dark theme selection and the design tokens for each.
use crate::prefs::PreferenceStore;

pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn code(self) -> &'static str {
        match self { Theme::Light => "light", Theme::Dark => "dark" }
    }

    pub fn parse(code: &str) -> Option<Theme> {
        match code { "light" => Some(Theme::Light), "dark" => Some(Theme::Dark), _ => None }
    }

    pub fn toggle(self) -> Theme {
        match self { Theme::Light => Theme::Dark, Theme::Dark => Theme::Light }
    }

    /// Label key for the toggle button (describes the action, not the state).
    pub fn toggle_label_key(self) -> &'static str {
        match self { Theme::Light => "theme.toDark", Theme::Dark => "theme.toLight" }
    }

    pub fn icon(self) -> &'static str {
        match self { Theme::Light => "☾", Theme::Dark => "☀" }
    }

    pub fn load(store: &dyn PreferenceStore) -> Theme {
        store.get(STORAGE_KEY).and_then(|c| Theme::parse(&c)).unwrap_or_default()
    }

    pub fn save(self, store: &dyn PreferenceStore) {
        if let Err(e) = store.set(STORAGE_KEY, self.code()) {
            tracing::warn!(theme = self.code(), error = %e, "failed to persist theme");
        }
    }
}

/// Design tokens keyed by `data-theme` on the root element, plus base rules.
pub const GLOBAL_CSS: &str = r#":root, [data-theme="dark"] {
    color-scheme: dark;
    --color-bg: #0b0f14;
    --color-bg-alt: #111820;
    --color-panel: rgba(15,23,32,0.72);
    --color-border: #1f2a36;
    --color-border-hover: #2c3a49;
    --color-text: #e2e8f0;
    --color-text-strong: #f8fafc;
    --color-text-dim: #94a3b8;
    --color-accent: #34d399;
    --color-skeleton: #1e293b;
    --color-grid: rgba(148,163,184,0.06);
    --color-danger: #f87171;
}
[data-theme="light"] {
    color-scheme: light;
    --color-bg: #f8fafc;
    --color-bg-alt: #ffffff;
    --color-panel: rgba(255,255,255,0.75);
    --color-border: #e2e8f0;
    --color-border-hover: #cbd5e1;
    --color-text: #334155;
    --color-text-strong: #0f172a;
    --color-text-dim: #64748b;
    --color-accent: #059669;
    --color-skeleton: #e2e8f0;
    --color-grid: rgba(15,23,42,0.05);
    --color-danger: #dc2626;
}
:root { --radius-sm: 6px; --radius-md: 10px; --radius-lg: 14px; --transition: .2s cubic-bezier(.4,0,.2,1); }
html,body { margin:0; background:var(--color-bg); color:var(--color-text); font-family: 'Inter', 'SF Pro Text', 'Segoe UI', Arial, Helvetica, sans-serif; -webkit-font-smoothing:antialiased; }
body,div,span,a,button { box-sizing:border-box; }
a { color:inherit; text-decoration:none; }
button { font-family:inherit; cursor:pointer; }
button:disabled { cursor:not-allowed; opacity:.6; }
.page { height:100vh; overflow-y:auto; position:relative; background:var(--color-bg); transition:background var(--transition); }
.bg-grid { position:fixed; inset:0; pointer-events:none; background-image:linear-gradient(var(--color-grid) 1px, transparent 1px), linear-gradient(90deg, var(--color-grid) 1px, transparent 1px); background-size:32px 32px; }
.container { position:relative; max-width:1100px; margin:0 auto; padding:40px 20px; }
.card { border:1px solid var(--color-border); border-radius:var(--radius-lg); background:var(--color-panel); padding:18px; transition:border-color var(--transition); }
.card:hover { border-color:var(--color-border-hover); }
.badge { display:inline-flex; align-items:center; padding:3px 10px; border-radius:999px; border:1px solid var(--color-border); font-size:12px; color:var(--color-text); }
.badge.ok { color:var(--color-accent); border-color:var(--color-accent); }
.skeleton { background:var(--color-skeleton); border-radius:var(--radius-sm); animation:pulse 1.6s ease-in-out infinite; }
@keyframes pulse { 0%,100% { opacity:1; } 50% { opacity:.45; } }
@keyframes spin { to { transform:rotate(360deg); } }
.spinner { width:48px; height:48px; border-radius:50%; border:2px solid var(--color-text-dim); border-top-color:transparent; animation:spin 1s linear infinite; }
.header-bar { position:sticky; top:0; z-index:10; display:flex; align-items:center; justify-content:space-between; gap:12px; padding:10px 20px; transition:background var(--transition), border-color var(--transition); border-bottom:1px solid transparent; }
.header-bar.scrolled { background:var(--color-bg-alt); border-bottom-color:var(--color-border); }
.segmented { display:inline-flex; height:34px; align-items:center; border:1px solid var(--color-border); border-radius:var(--radius-md); padding:2px; background:var(--color-panel); }
.segmented button { border:0; background:transparent; color:var(--color-text-dim); border-radius:var(--radius-sm); padding:4px 10px; font-size:12px; font-weight:600; }
.segmented button.active { background:var(--color-text-strong); color:var(--color-bg); }
.icon-btn { width:34px; height:34px; display:inline-flex; align-items:center; justify-content:center; border-radius:50%; border:1px solid var(--color-border); background:transparent; color:var(--color-text); }
.section-title { font-size:18px; font-weight:600; color:var(--color-text-strong); margin:0 0 14px 0; }
.grid-2 { display:grid; grid-template-columns:repeat(auto-fit,minmax(320px,1fr)); gap:16px; }
.muted { color:var(--color-text-dim); font-size:14px; }
.mono { font-family:'JetBrains Mono','SF Mono',Consolas,monospace; }
"#;
