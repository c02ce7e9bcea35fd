use anyhow::{bail, Result};
use salescrunch::{chart::LogRenderer, config::Config, pipeline::Analysis};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let csv_path = match args.next() {
        Some(p) => p,
        None => bail!("usage: salescrunch <sales.csv> [config.yaml]"),
    };
    let config = match args.next() {
        Some(p) => Config::load(&p)?,
        None => Config::default(),
    };

    // ─── 3) load & explore ───────────────────────────────────────────
    let mut analysis = Analysis::new(config);
    let summary = analysis.load(&csv_path)?;
    info!("dataset summary:\n{summary}");

    // ─── 4) clean ────────────────────────────────────────────────────
    analysis.clean()?;

    // ─── 5) reports ──────────────────────────────────────────────────
    info!("payment methods:\n{}", analysis.payment_methods()?);
    info!("top cities by orders:\n{}", analysis.city_orders()?);
    info!("monthly order volume:\n{}", analysis.monthly_orders()?);
    info!("product summary:\n{}", analysis.product_summary()?);
    analysis.render_charts(&LogRenderer)?;

    // ─── 6) export ───────────────────────────────────────────────────
    let combined = analysis.export_reports()?;
    info!(
        rows = combined.len(),
        path = %analysis.config().output_path.display(),
        "all done"
    );
    Ok(())
}
