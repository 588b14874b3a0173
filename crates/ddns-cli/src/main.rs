// # ddns - one-shot DDNS updater
//
// Resolves this host's public address, logs into the chosen DNS provider and
// points every eligible A record of the configured domains at it. Meant to be
// run from cron or a systemd timer; each invocation does one pass and exits.
//
// This binary is a thin integration layer: argument parsing, sink wiring and
// provider selection. The workflow lives in `ddns-core`.
//
// ## Usage
//
// ```bash
// ddns godaddy -l                      # console output, ~/.ddns_godaddyrc
// ddns cloudflare -L -c /etc/ddns.conf # syslog as ddns_cloudflare
// ddns godaddy -l -n                   # dry run
// ```
//
// ## Environment
//
// - `DDNS_LOG_LEVEL`: diagnostic verbosity on stderr
//   (trace, debug, info, warn, error; default warn)

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use ddns_core::reporter::{ConsoleSink, SyslogSink};
use ddns_core::{
    AddressResolver, DdnsConfig, DnsProvider, Error, ProviderKind, Reporter, RunSummary,
    UpdateEngine,
};
use ddns_ip_http::HttpAddressResolver;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Every record is current (or would be, in a dry run)
/// - 1: Any failure; the message has been printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    Success = 0,
    Failure = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let rt = match build_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("fatal error: {:#}", e);
            return DdnsExitCode::Failure.into();
        }
    };

    match rt.block_on(run(args)) {
        Ok(summary) => {
            tracing::info!(
                "Run finished: {} updated, {} unchanged",
                summary.updated(),
                summary.unchanged()
            );
            DdnsExitCode::Success.into()
        }
        Err(e) => {
            eprintln!("{}", fatal_line(&e));
            DdnsExitCode::Failure.into()
        }
    }
}

/// Parse a `DDNS_LOG_LEVEL` value, defaulting to WARN
fn parse_log_level(value: Option<&str>) -> Level {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    }
}

fn init_tracing() {
    let level = parse_log_level(std::env::var("DDNS_LOG_LEVEL").ok().as_deref());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

/// Build the reporter from the output flags
///
/// Syslog that cannot be opened is reported through the remaining sinks and
/// left out.
fn build_reporter(args: &Args, provider: ProviderKind) -> Reporter {
    let mut reporter = Reporter::new();
    if args.log {
        reporter.add_sink(Box::new(ConsoleSink::new()));
    }

    if let Some(ident) = args.syslog_ident(&provider.syslog_ident()) {
        match SyslogSink::open(&ident) {
            Ok(sink) => reporter.add_sink(Box::new(sink)),
            Err(e) => reporter.error(format!("could not open syslog as {}: {}", ident, e)),
        }
    }

    reporter
}

/// Line printed to stderr when a run fails
fn fatal_line(error: &Error) -> String {
    format!("fatal error: {}", error.message())
}

fn build_resolver(args: &Args) -> HttpAddressResolver {
    match &args.ip_url {
        Some(url) => HttpAddressResolver::new(url.clone()),
        None => HttpAddressResolver::default(),
    }
}

/// One full pass for the provider named on the command line
async fn run(args: Args) -> Result<RunSummary, Error> {
    let kind: ProviderKind = args.provider.parse()?;
    let reporter = build_reporter(&args, kind);

    let config = match load_config(&args, kind) {
        Ok(config) => config,
        Err(e) => {
            reporter.error(e.to_string());
            return Err(e);
        }
    };
    tracing::debug!(
        "Loaded {} domain(s) for {}",
        config.domains.len(),
        config.provider
    );

    let resolver: Box<dyn AddressResolver> = Box::new(build_resolver(&args));
    match kind {
        ProviderKind::GoDaddy => run_godaddy(resolver, config, reporter, args.dry_run).await,
        ProviderKind::Cloudflare => {
            run_cloudflare(resolver, config, reporter, args.dry_run).await
        }
    }
}

fn load_config(args: &Args, kind: ProviderKind) -> Result<DdnsConfig, Error> {
    let path = match &args.confpath {
        Some(path) => path.clone(),
        None => kind.default_config_path()?,
    };
    tracing::debug!("Reading configuration from {}", path.display());
    DdnsConfig::load(&path, kind)
}

async fn drive<P: DnsProvider>(
    provider: P,
    resolver: Box<dyn AddressResolver>,
    config: DdnsConfig,
    reporter: Reporter,
    dry_run: bool,
) -> Result<RunSummary, Error> {
    UpdateEngine::new(resolver, provider, config, reporter)
        .with_dry_run(dry_run)
        .run()
        .await
}

#[cfg(not(all(feature = "godaddy", feature = "cloudflare")))]
fn not_built(kind: ProviderKind, reporter: &Reporter) -> Error {
    let err = Error::config(format!(
        "provider {} is not available in this build (enable the `{}` feature)",
        kind, kind
    ));
    reporter.error(err.to_string());
    err
}

#[cfg(feature = "godaddy")]
async fn run_godaddy(
    resolver: Box<dyn AddressResolver>,
    config: DdnsConfig,
    reporter: Reporter,
    dry_run: bool,
) -> Result<RunSummary, Error> {
    let provider = ddns_provider_godaddy::GoDaddyProvider::new();
    drive(provider, resolver, config, reporter, dry_run).await
}

#[cfg(not(feature = "godaddy"))]
async fn run_godaddy(
    _resolver: Box<dyn AddressResolver>,
    _config: DdnsConfig,
    reporter: Reporter,
    _dry_run: bool,
) -> Result<RunSummary, Error> {
    Err(not_built(ProviderKind::GoDaddy, &reporter))
}

#[cfg(feature = "cloudflare")]
async fn run_cloudflare(
    resolver: Box<dyn AddressResolver>,
    config: DdnsConfig,
    reporter: Reporter,
    dry_run: bool,
) -> Result<RunSummary, Error> {
    let provider = ddns_provider_cloudflare::CloudflareProvider::new();
    drive(provider, resolver, config, reporter, dry_run).await
}

#[cfg(not(feature = "cloudflare"))]
async fn run_cloudflare(
    _resolver: Box<dyn AddressResolver>,
    _config: DdnsConfig,
    reporter: Reporter,
    _dry_run: bool,
) -> Result<RunSummary, Error> {
    Err(not_built(ProviderKind::Cloudflare, &reporter))
}
