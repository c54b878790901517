//! JackBot - Jira sprint reconciliation and Slack burndown bot.

mod webhook;

use anyhow::{Context, Result};
use clap::Parser;
use jackbot_core::BotConfig;
use jackbot_engine::{Dispatcher, EventQueue, Reconciler, Reporter, Scheduler};
use jackbot_jira::{JiraClient, JiraConfig, Tracker};
use jackbot_slack::{Notifier, SlackClient, SlackNotifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "jackbot")]
#[command(about = "Jira sprint reconciliation and Slack burndown bot", long_about = None)]
struct Cli {
    /// Jira server base URL
    #[arg(long, default_value = "https://moblab.atlassian.net")]
    server: String,

    /// Jira account email
    #[arg(long, env = "JIRA_EMAIL")]
    email: String,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_api_token: String,

    /// Project whose issue events are reconciled
    #[arg(long, default_value = "EDU")]
    project: String,

    /// Board the sprints run on
    #[arg(long, default_value = "17")]
    board: u64,

    /// Custom field id the board stores estimates in
    #[arg(long, default_value = "customfield_10016")]
    estimate_field: String,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    slack_webhook_url: String,

    /// Slack web-API token (diagnostic helpers only)
    #[arg(long, env = "SLACK_API_TOKEN", hide_env_values = true)]
    slack_api_token: Option<String>,

    /// Drive the test sprint instead of production sprints
    #[arg(long)]
    test_mode: bool,

    /// Local hour of the weekday burndown report
    #[arg(long, default_value = "9")]
    report_hour: u32,

    /// Listen address of the webhook receiver
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let config = BotConfig {
        server: cli.server.clone(),
        project_key: cli.project,
        board_id: cli.board,
        live: !cli.test_mode,
        report_hour: cli.report_hour,
        ..BotConfig::default()
    };

    let tracker: Arc<dyn Tracker> = Arc::new(JiraClient::new(JiraConfig {
        server: cli.server,
        email: cli.email,
        api_token: cli.jira_api_token,
        board_id: cli.board,
        estimate_field: cli.estimate_field,
    }));
    let notifier: Arc<dyn Notifier> = Arc::new(SlackNotifier::new(
        SlackClient::new(cli.slack_webhook_url, cli.slack_api_token),
        config.clone(),
    ));

    let (queue, rx) = EventQueue::new();
    let reconciler = Reconciler::new(tracker.clone());
    let reporter = Arc::new(Reporter::new(tracker.clone(), notifier, config.clone()));
    let dispatcher = Dispatcher::new(config.clone(), reconciler, reporter.clone(), rx);
    let (stop_tx, stop_rx) = watch::channel(false);
    let scheduler = Scheduler::new(tracker, reporter, config, stop_rx);

    let consumer = tokio::spawn(dispatcher.run());
    let ticker = tokio::spawn(scheduler.run());

    info!("JackBot listening on {}", cli.listen);
    webhook::serve(cli.listen, queue.clone())
        .await
        .context("webhook receiver exited unexpectedly")?;

    // Covers the Ctrl-C path; a second sentinel after /shutdown is
    // simply never consumed.
    queue.shutdown();
    let _ = stop_tx.send(true);
    consumer.await.context("event consumer panicked")?;
    ticker.await.context("scheduler panicked")?;

    info!("JackBot stopped");
    Ok(())
}
