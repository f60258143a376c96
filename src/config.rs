//! Runtime configuration from the environment.
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://masteryyh.github.io/";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Where translation bundles are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleMode {
    #[default]
    Embedded,
    Remote,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Site root the assets (and remote bundles) are resolved against.
    pub base_url: Url,
    pub bundles: BundleMode,
    pub prefs_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_base = get("PORTFOLIO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base).with_context(|| format!("PORTFOLIO_BASE_URL={raw_base:?}"))?;

        let bundles = match get("PORTFOLIO_BUNDLES").as_deref() {
            None | Some("embedded") => BundleMode::Embedded,
            Some("remote") => BundleMode::Remote,
            Some(other) => bail!("PORTFOLIO_BUNDLES must be `embedded` or `remote`, got {other:?}"),
        };

        let timeout = match get("PORTFOLIO_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(v) => {
                let secs: u64 = v.parse().with_context(|| format!("PORTFOLIO_TIMEOUT_SECS={v:?}"))?;
                if secs == 0 { bail!("PORTFOLIO_TIMEOUT_SECS must be positive"); }
                Duration::from_secs(secs)
            }
        };

        Ok(Self { base_url, bundles, prefs_path: get("PORTFOLIO_PREFS").map(PathBuf::from), timeout })
    }
}

/// Absolute http(s) URL, with a trailing slash so relative joins stay inside it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).context("not an absolute URL")?;
    if !matches!(url.scheme(), "http" | "https") { bail!("unsupported scheme {}", url.scheme()); }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
