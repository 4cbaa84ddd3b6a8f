//! Logging setup

use tracing_subscriber::EnvFilter;

/// Build the log filter.
///
/// `RUST_LOG` is honoured, falling back to `info`. With `show_stacktrace`
/// the SMTP conversation logged by lettre is turned on as well.
pub fn env_filter(show_stacktrace: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if show_stacktrace {
        match "lettre=trace".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    } else {
        filter
    }
}

/// Install the global subscriber, writing to stderr
#[mutants::skip]
pub fn init(show_stacktrace: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(show_stacktrace))
        .with_writer(std::io::stderr)
        .init();
}
