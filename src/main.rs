use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use histview::settings::Config;
use histview::{console, logging, server};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "histview", version, about = "Brightness histograms for images")]
struct Cli {
    /// JSON config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    /// Parallel image workers (0 = all cores)
    #[arg(long, global = true, env = "HISTVIEW_WORKERS")]
    workers: Option<usize>,

    /// Network fetch timeout in seconds
    #[arg(long, global = true, env = "HISTVIEW_TIMEOUT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve /hist with a histogram for every image in a folder
    Serve {
        #[arg(long, env = "HISTVIEW_HOST")]
        host: Option<String>,
        #[arg(long, env = "HISTVIEW_PORT")]
        port: Option<u16>,
        #[arg(long, env = "HISTVIEW_FOLDER")]
        folder: Option<PathBuf>,
    },
    /// Print the console histogram of one image (file path or URL)
    Plot { source: String },
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("loading configuration")?;

        if let Some(workers) = self.workers {
            config.batch.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.batch.source.fetch_timeout_secs = timeout;
        }
        if let Command::Serve { host, port, folder } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(folder) = folder {
                config.server.folder = folder.clone();
            }
        }

        config.validate().context("validating configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // serve logs its address and requests by default; plot stays quiet
    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        Command::Plot { .. } => "warn",
    };
    logging::init_tracing(cli.debug, default_level);
    let config = cli.resolve_config()?;

    match &cli.command {
        Command::Serve { .. } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("starting async runtime")?;
            runtime
                .block_on(server::serve(&config))
                .with_context(|| format!("serving on {}", config.server.address()))?;
        }
        Command::Plot { source } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            console::run_plot(source, &config.batch.source, &mut out)
                .with_context(|| format!("plotting {}", source))?;
        }
    }

    Ok(())
}
