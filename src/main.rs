use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use remote_autocomplete::source::FetchExecutor;
use remote_autocomplete::terminal::Terminal;
use remote_autocomplete::{
    Autocomplete, AutocompleteConfig, Exit, HttpMatchSource, MatchSource, Runtime, Session,
    StaticMatchSource,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "autocomplete", about = "Type-ahead input backed by a remote suggestion endpoint")]
struct Cli {
    /// Endpoint prefix; the percent-encoded query is appended
    /// [default: http://localhost:3000/countries?matching=]
    #[arg(long)]
    url: Option<String>,

    /// YAML file with widget settings. Flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    debounce_ms: Option<u64>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long)]
    label: Option<String>,

    /// Answer from these names instead of the network.
    #[arg(long = "static", num_args = 1..)]
    static_names: Vec<String>,

    /// Write tracing output here (filtered by RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> remote_autocomplete::Result<AutocompleteConfig> {
        let mut config = match &self.config {
            Some(path) => AutocompleteConfig::load_from(path)?,
            None => AutocompleteConfig::default(),
        };
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.debounce_ms = debounce_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout_ms = Some(timeout_ms);
        }
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(Exit::Submitted(value)) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Ok(Exit::Cancelled) => ExitCode::from(130),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Exit, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = cli.config()?;
    let source: Arc<dyn MatchSource> = if cli.static_names.is_empty() {
        info!(url = %config.url, "querying remote endpoint");
        Arc::new(HttpMatchSource::with_timeout(
            config.url.clone(),
            config.request_timeout(),
        ))
    } else {
        info!(names = cli.static_names.len(), "answering from static list");
        Arc::new(StaticMatchSource::new(cli.static_names.iter().cloned()))
    };

    let session = Session::new(Autocomplete::new(&config), FetchExecutor::new(source));
    let mut runtime = Runtime::new(session, Terminal::new()?);
    Ok(runtime.run()?)
}

fn init_tracing(log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    use std::fs::File;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let file = File::options().create(true).append(true).open(log_path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .try_init()?;

    Ok(())
}
