use authgate_core::cli::conf::ConfigCmd;
use authgate_core::conf::{ConfigOverrides, load_config};
use authgate_core::decision::{PolicyProfile, SignalSource};
use authgate_core::logging::init_logging;
use authgate_core::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for configuration problems found before serving.
const EXIT_CONFIG: u8 = 2;
/// Exit code for bind or serve failures.
const EXIT_SERVER: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "authgate",
    version,
    about = "authgate: Envoy ext_authz decision service"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the authorization server (default)
    Run(RunArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Path to an authgate HCL config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// gRPC listen address (host:port); defaults to 0.0.0.0:4000
    #[arg(long = "grpclistener", visible_alias = "listen")]
    listen: Option<String>,

    /// HTTP/2 concurrent stream ceiling per connection; defaults to 10
    #[arg(long)]
    max_concurrent_streams: Option<u32>,

    /// Deny table for the 401/403 signals
    #[arg(long, value_enum)]
    profile: Option<PolicyProfile>,

    /// Where the signal header is read from
    #[arg(long, value_enum)]
    signal_source: Option<SignalSource>,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen.clone(),
            max_concurrent_streams: self.max_concurrent_streams,
            profile: self.profile,
            signal_source: self.signal_source,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => {
            if let Err(e) = authgate_core::cli::conf::run(cmd) {
                eprintln!("config error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }

        Some(Command::Run(args)) => run(args),

        None => run(cli.run),
    }
}

fn run(args: RunArgs) -> ExitCode {
    let cfg = match load_config(args.config.as_deref(), &args.overrides()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("authgate: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    init_logging();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to build Tokio runtime");
            return ExitCode::from(EXIT_SERVER);
        }
    };

    match rt.block_on(server::run(cfg)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // tonic's transport error hides the OS cause in its source chain.
            let e = anyhow::Error::new(e);
            tracing::error!(error = %format!("{e:#}"), "authgate server failed");
            ExitCode::from(EXIT_SERVER)
        }
    }
}
