use crate::conf::{ConfigError, ConfigOverrides, load_config};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(Some(&path), &ConfigOverrides::default()) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ listen {}", cfg.server.listen);
            println!(
                "✔ max {} concurrent streams",
                cfg.server.max_concurrent_streams
            );
            println!(
                "✔ profile {} (signal header {})",
                cfg.policy.profile.as_str(),
                cfg.policy.signal_header
            );
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    for problem in err.problems() {
        if plain {
            eprintln!("✘ {problem}");
        } else {
            eprintln!("{} {}", "✘".red(), problem.bold());
        }
        if let Some(hint) = config_error_hint(problem) {
            eprintln!();
            eprintln!("{hint}");
            eprintln!();
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Listener errors
        //---------------------------------------------------------------------
        ConfigError::MissingListenAddress | ConfigError::InvalidListenAddress { .. } => Some(
            "The listener needs a host:port address.\n\
             \n\
             Example:\n\
             \n\
             server {\n\
               listen = \"0.0.0.0:4000\"\n\
             }",
        ),

        ConfigError::ZeroConcurrentStreams => Some(
            "The stream ceiling must allow at least one call.\n\
             \n\
             Remove `max_concurrent_streams` to use the default of 10.",
        ),

        //---------------------------------------------------------------------
        // Policy errors
        //---------------------------------------------------------------------
        ConfigError::MissingChallenge => Some(
            "The proxy_challenge profile answers with a Proxy-Authenticate header.\n\
             \n\
             Example:\n\
             \n\
             policy {\n\
               profile   = \"proxy_challenge\"\n\
               challenge = \"Basic realm=\\\"proxy\\\"\"\n\
             }",
        ),

        ConfigError::InvalidHeaderName { .. } => Some(
            "Header names may only contain token characters (letters, digits, `-`, `_`, ...).",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
