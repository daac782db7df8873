//! # SimpleChat Main Entry Point

use anyhow::Result;
use simplechat::cmd_args::CommandLineArgs;
use simplechat::config::LOG_LEVEL_ENV_VAR;
use simplechat::AppController;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const NOISY_CRATES: [&str; 4] = ["reqwest=warn", "hyper=warn", "hyper_util=warn", "rustls=warn"];

// The request worker uses a blocking HTTP client, so main stays synchronous
fn main() -> Result<()> {
    init_tracing_subscriber();

    let cmd_args = CommandLineArgs::parse();
    tracing::debug!("Command line: {:?}", cmd_args);

    let mut app = AppController::new(&cmd_args)?;
    app.run()?;

    println!("Bye!");
    Ok(())
}

fn init_tracing_subscriber() {
    let directives = std::env::var(LOG_LEVEL_ENV_VAR).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}

/// Logging stays off unless asked for; stderr shares the terminal with the chat screen
fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    let Some(directives) = directives.filter(|d| !d.trim().is_empty()) else {
        return EnvFilter::new("off");
    };

    let mut filter = EnvFilter::new(directives);
    for directive in NOISY_CRATES {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn init_tracing_subscriber_should_initialize_logging_without_panic() {
        init_tracing_subscriber();
    }

    #[test]
    fn unset_log_level_should_disable_logging() {
        assert_eq!(build_env_filter(None).max_level_hint(), Some(LevelFilter::OFF));
        assert_eq!(
            build_env_filter(Some("  ")).max_level_hint(),
            Some(LevelFilter::OFF)
        );
    }

    #[test]
    fn explicit_log_level_should_be_honored() {
        let filter = build_env_filter(Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
