use anyhow::{Context, Result};
use cou::cli::output::{create_spinner, format_execution_event, format_reconciliation, style, CHECK, INFO};
use cou::cli::prompt::TerminalPrompter;
use cou::cli::{Cli, LogLevel};
use cou::execution::{dump_plan, ExecutionEngine, ExecutionEvent, Prompter, Unattended};
use cou::juju::{JujuCli, JujuClient};
use cou::{analyze, generate_plan, UpgradeStep, UpgraderConfig};
use indicatif::ProgressBar;
use std::sync::{Arc, Mutex};
use tracing::{error, info, Level};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. An invalid level still installs one at
/// INFO so the error can be logged.
fn setup_logging(log_level: &str) -> Result<()> {
    let parsed = log_level.parse::<LogLevel>();
    let level = parsed.as_ref().map(|l| Level::from(*l)).unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    parsed?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => UpgraderConfig::from_file(path).context("Failed to load configuration")?,
        None => UpgraderConfig::default(),
    };
    if cli.model.is_some() {
        config.juju.model = cli.model.clone();
    }

    let client: Arc<dyn JujuClient> = Arc::new(JujuCli::new(config.client_config()));

    let (observations, reconciliation) = analyze(client.as_ref(), &config.series).await?;
    println!("{}", format_reconciliation(&reconciliation));

    let plan = generate_plan(client.clone(), &config, &observations, &reconciliation);

    if cli.dry_run {
        println!();
        print!("{}", dump_plan(&plan));
        return Ok(());
    }

    let strategy = cli.strategy.into();
    if cli.interactive {
        execute_plan(ExecutionEngine::new(TerminalPrompter::new(), strategy), &plan).await
    } else {
        execute_plan(ExecutionEngine::new(Unattended, strategy), &plan).await
    }
}

async fn execute_plan<P: Prompter>(mut engine: ExecutionEngine<P>, plan: &UpgradeStep) -> Result<()> {
    let spinner: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));

    engine.add_event_handler(move |event| {
        let Ok(mut current) = spinner.lock() else {
            println!("{}", format_execution_event(&event));
            return;
        };

        if let ExecutionEvent::StepStarted { description, .. } = &event {
            if current.is_none() {
                *current = Some(create_spinner(description.clone()));
                return;
            }
        } else if let Some(running) = current.take() {
            running.finish_and_clear();
        }

        println!("{}", format_execution_event(&event));
    });

    println!();
    let report = engine.execute(plan).await?;

    info!(
        "Execution {} took {}s",
        report.execution_id,
        (report.completed_at - report.started_at).num_seconds()
    );
    println!(
        "\n{} Upgrade plan completed {} ({} executed, {} skipped)",
        CHECK,
        style("successfully").green(),
        report.executed,
        report.skipped
    );
    if report.executed == 0 {
        println!("{} No actions were run", INFO);
    }

    Ok(())
}
