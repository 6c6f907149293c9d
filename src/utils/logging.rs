use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "CAUSERIE_LOG";

/// Install the global subscriber, writing to stderr so replies on stdout stay clean.
///
/// `CAUSERIE_LOG` wins when set; otherwise only warnings are shown, or debug
/// output for this crate with `verbose`.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(build_filter(verbose, std::env::var(LOG_ENV).ok().as_deref()))
        .try_init()?;
    Ok(())
}

fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    if let Some(filter) = directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }
    EnvFilter::new(default_directives(verbose))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,causerie=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_depend_on_verbosity() {
        assert_eq!(build_filter(false, None).to_string(), "warn");
        assert!(build_filter(true, Some("  "))
            .to_string()
            .contains("causerie=debug"));
    }

    #[test]
    fn explicit_directives_win() {
        assert_eq!(
            build_filter(false, Some("causerie=trace")).to_string(),
            "causerie=trace"
        );
    }

    #[test]
    fn unparsable_directives_fall_back() {
        assert_eq!(build_filter(false, Some("causerie=loud")).to_string(), "warn");
    }
}
