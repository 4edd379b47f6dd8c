use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::EventStream;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use pulsetop::app::{
    run_consumer, Consumer, ContainerDashboard, InputEvent, ProcessController, SystemDashboard,
};
use pulsetop::cli::{Cli, Commands, ConfigCommands, VERSION_WITH_BUILD};
use pulsetop::core::{
    metric_bus, serve, Collector, DockerSource, MonitorResult, ProcessSource, SystemSource,
};
use pulsetop::screens::{TerminalSink, Theme};
use pulsetop::utils::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.global.config.as_deref())?;
    cli.global.apply(&mut config);

    match cli.command.clone().unwrap_or(Commands::Proc) {
        Commands::Proc => {
            start_logging(&config)?;
            handle_proc(&config).await
        }
        Commands::Container { all } => {
            start_logging(&config)?;
            handle_container(&config, all || config.all_containers).await
        }
        Commands::System { cpuinfo } => {
            start_logging(&config)?;
            handle_system(&config, cpuinfo).await
        }
        Commands::Config { command } => handle_config(&cli, &config, command),
    }
}

fn start_logging(config: &AppConfig) -> Result<()> {
    init_logging(config.log_file.as_deref(), config.log_filter.as_deref())?;
    info!("pulsetop {} starting, refresh {:?}", VERSION_WITH_BUILD, config.refresh_rate());
    Ok(())
}

/// Quit and cancellation end the program normally
fn finish(result: MonitorResult<()>) -> Result<()> {
    match result {
        Err(e) if !e.is_clean_exit() => {
            error!("Monitor stopped: {}", e);
            Err(e.into())
        }
        _ => {
            info!("Monitor stopped");
            Ok(())
        }
    }
}

fn terminal_input() -> impl futures::Stream<Item = std::io::Result<InputEvent>> + Send + Unpin {
    EventStream::new().map(|event| event.map(InputEvent::from))
}

async fn handle_proc(config: &AppConfig) -> Result<()> {
    let source = ProcessSource::new();
    let collector = Collector::new(source.clone(), config.refresh_rate())
        .with_max_concurrency(config.max_concurrency);
    let (tx, rx) = metric_bus();
    let theme = Theme::from(&config.theme);
    let poll_every = config.refresh_rate();

    let ctx = CancellationToken::new();
    let result = serve(
        &ctx,
        move |scope| collector.run(scope, tx),
        move |scope| async move {
            let mut sink = TerminalSink::new(theme)?;
            let mut controller = ProcessController::new(Box::new(source.clone()), Box::new(source));
            let (width, height) = sink.size()?;
            controller.on_resize(width, height);
            run_consumer(scope, controller, rx, terminal_input(), &mut sink, poll_every).await
        },
    )
    .await;

    finish(result)
}

async fn handle_container(config: &AppConfig, all: bool) -> Result<()> {
    let source = DockerSource::connect(all)?;
    if !source.check_docker().await {
        bail!("Docker daemon is not reachable. Is Docker running?");
    }

    let collector = Collector::new(source, config.refresh_rate()).with_max_concurrency(config.max_concurrency);
    let (tx, rx) = metric_bus();
    let theme = Theme::from(&config.theme);
    let poll_every = config.refresh_rate();

    let ctx = CancellationToken::new();
    let result = serve(
        &ctx,
        move |scope| collector.run(scope, tx),
        move |scope| async move {
            let mut sink = TerminalSink::new(theme)?;
            let mut dashboard = ContainerDashboard::new();
            let (width, height) = sink.size()?;
            dashboard.on_resize(width, height);
            run_consumer(scope, dashboard, rx, terminal_input(), &mut sink, poll_every).await
        },
    )
    .await;

    finish(result)
}

async fn handle_system(config: &AppConfig, cpuinfo: bool) -> Result<()> {
    let collector =
        Collector::new(SystemSource::new(), config.refresh_rate()).with_max_concurrency(config.max_concurrency);
    let (tx, rx) = metric_bus();
    let theme = Theme::from(&config.theme);
    let poll_every = config.refresh_rate();

    let ctx = CancellationToken::new();
    let result = serve(
        &ctx,
        move |scope| collector.run(scope, tx),
        move |scope| async move {
            let mut sink = TerminalSink::new(theme)?;
            let mut dashboard = SystemDashboard::new(cpuinfo);
            let (width, height) = sink.size()?;
            dashboard.on_resize(width, height);
            run_consumer(scope, dashboard, rx, terminal_input(), &mut sink, poll_every).await
        },
    )
    .await;

    finish(result)
}

fn handle_config(cli: &Cli, config: &AppConfig, command: ConfigCommands) -> Result<()> {
    let path = match &cli.global.config {
        Some(p) => p.clone(),
        None => AppConfig::config_path()?,
    };

    match command {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("# {}", path.display());
            print!("{}", rendered);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let written = AppConfig::default().save(Some(&path))?;
            println!("✓ Wrote default configuration to {}", written.display());
        }
        ConfigCommands::Path => println!("{}", path.display()),
    }
    Ok(())
}
