use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Default directives when `RUST_LOG` is unset: the flag controls the
/// dockhand crates, third-party crates stay at warn. ssh's own stderr
/// passes through untouched either way.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,dockhand_cli=debug,dockhand_runtime=debug,dockhand_registry=debug"
    } else {
        "warn,dockhand_cli=info,dockhand_runtime=info,dockhand_registry=info"
    }
}

pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // The agent's stdout carries frames; everything we say goes to stderr.
    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .with_level(true)
        .compact()
        .init();
}
