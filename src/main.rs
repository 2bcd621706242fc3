use anyhow::Context;
use clap::Parser;
use clock_agent::config::config_path;
use clock_agent::utils::{logger, validation::Validate};
use clock_agent::{
    AgentConfig, AgentSettings, CliConfig, ClockAgent, ClockEngine, ClockOutcome, KeyringStore,
    NativeDialog, WebDriverBrowser,
};
use std::io::{BufRead, IsTerminal, Write};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger();
    tracing::info!("Starting clock-agent: {:?}", cli);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let exit_code = runtime.block_on(run(&cli));
    pause();
    std::process::exit(exit_code);
}

async fn run(cli: &CliConfig) -> i32 {
    let path = config_path();
    tracing::info!("Loading configuration from: {}", path);

    let config = match AgentConfig::from_file(&path).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            return e.severity().exit_code();
        }
    };

    let settings = AgentSettings {
        dialog_title: config.dialog_title.clone(),
        ..AgentSettings::default()
    };
    let agent = ClockAgent::new(
        config.selectors.clone(),
        WebDriverBrowser::new(config.browser.clone()),
        KeyringStore,
        NativeDialog,
        settings,
    );
    let mut engine = ClockEngine::new(agent);

    match engine.run(cli.direction()).await {
        Ok(ClockOutcome::Clocked) => 0,
        Ok(ClockOutcome::AlreadyDone) => {
            tracing::info!("Nothing to do; the requested state was already set");
            0
        }
        Err(e) => {
            tracing::error!("{} failed: {} (Severity: {:?})", cli.direction(), e, e.severity());
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            e.severity().exit_code()
        }
    }
}

/// Keeps the console window open when launched from a shortcut.
fn pause() {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    print!("Press Enter to continue...");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
