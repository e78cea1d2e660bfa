use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,reqwest=warn,hyper=warn";

/// Installs the stderr subscriber.
///
/// Directives come from `PLATFORMWATCH_LOG`, then `RUST_LOG`, then [`DEFAULT_DIRECTIVES`].
pub fn init() -> anyhow::Result<()> {
    let filter = build_filter(|key| std::env::var(key).ok())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn build_filter(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<EnvFilter> {
    for key in ["PLATFORMWATCH_LOG", "RUST_LOG"] {
        let Some(directives) = lookup(key).filter(|raw| !raw.trim().is_empty()) else {
            continue;
        };
        return EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {key}={directives:?}"));
    }
    EnvFilter::try_new(DEFAULT_DIRECTIVES).context("build default log filter")
}
