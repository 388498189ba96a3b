//! Diagnostic logging through tracing-subscriber
//!
//! Logs go to stderr so table and JSON output on stdout stays pipeable.

use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is unset
fn default_directives(verbose: bool) -> String {
    let mut directives = vec!["warn".to_string()];
    if verbose {
        directives.push("portal=debug".to_string());
    }

    // Suppress noisy third-party crates
    for target in ["hyper", "hyper_util", "reqwest", "rustls"] {
        directives.push(format!("{}=warn", target));
    }

    directives.join(",")
}

/// Build the filter: `RUST_LOG` wins, otherwise `warn` with this crate
/// raised to `debug` when verbose
fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber; repeated calls are ignored
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();
}
