mod config; mod fetch; mod lang; mod load_state; mod locale; mod logging; mod prefs; mod types;
mod orchestrator; mod scroll; mod theme;
mod sections; mod dioxus_gui; // dioxus implementation
use anyhow::{Context, Result};

fn main() -> Result<()> {
    logging::init();
    let cfg = config::AppConfig::from_env().context("reading configuration")?;
    tracing::info!(base = %cfg.base_url, bundles = ?cfg.bundles, "starting portfolio");
    let services = dioxus_gui::Services::from_config(&cfg)?;
    dioxus_gui::run(services)?;
    Ok(())
}
