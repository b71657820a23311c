use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::conversation::{
    Conversation, Persona, RunMetadata, StopCause, TurnRecord, write_log,
};
use crate::providers::{OllamaProvider, Provider};
use crate::ui::style;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Route a parsed command line to its subcommand handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            exchanges,
            initial,
            log_dir,
        } => run_conversation(config, exchanges, initial, &log_dir).await,
        Commands::Serve { port, host } => crate::gateway::serve(&host, port, config).await,
        Commands::Models => list_models(&config).await,
    }
}

/// Terminal conversation loop.
///
/// CTRL+C cancels cooperatively: the token is observed between turns, the
/// in-flight backend call finishes first, and an interrupted run still exits
/// cleanly. The transcript is written on every stop cause, including a
/// backend failure mid-run.
async fn run_conversation(
    config: Config,
    num_exchanges: u64,
    initial: Option<String>,
    log_dir: &Path,
) -> Result<()> {
    let personas = config.load_personas()?;
    let initial_message = initial.unwrap_or_else(|| config.initial_message.clone());

    let metadata = RunMetadata {
        endpoint: config.endpoint.clone(),
        models: [personas[0].model.clone(), personas[1].model.clone()],
        system_prompts: [
            personas[0].system_prompt.clone(),
            personas[1].system_prompt.clone(),
        ],
        started_at: chrono::Local::now(),
    };

    let provider = Arc::new(OllamaProvider::new(&config.endpoint));
    let mut conversation = Conversation::new(
        provider,
        personas,
        config.token_budget(),
        config.options.clone(),
        initial_message.clone(),
    );

    println!(
        "{}",
        style::success(format!("Starting conversation with: {initial_message}"))
    );
    println!("{}", style::notice("Press CTRL+C to stop the conversation."));
    println!();

    let cancel = CancellationToken::new();
    let signal_guard = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_guard.cancel();
        }
    });

    let outcome = conversation
        .run(num_exchanges, &cancel, |record| {
            print_turn(record);
            println!("{}", style::separator("---"));
            println!();
        })
        .await;

    match &outcome {
        Ok(StopCause::Cancelled) => {
            println!("{}", style::notice("\nConversation stopped by user."));
        }
        Ok(_) => {}
        Err(e) => eprintln!("{}", style::notice(format!("\nConversation aborted: {e}"))),
    }
    println!("{}", style::success("Conversation ended."));

    let path = write_log(log_dir, &metadata, conversation.transcript())?;
    println!("Conversation log saved to {}", path.display());

    outcome?;
    Ok(())
}

fn print_turn(record: &TurnRecord) {
    let text = format!("{}\n", record.formatted);
    match record.persona {
        Persona::One => println!("{}", style::persona_one(text)),
        Persona::Two => println!("{}", style::persona_two(text)),
    }
}

async fn list_models(config: &Config) -> Result<()> {
    let provider = OllamaProvider::new(&config.endpoint);
    let models = provider
        .list_models()
        .await
        .with_context(|| format!("is the model server running at {}?", config.endpoint))?;

    if models.is_empty() {
        println!("No models installed on {}", config.endpoint);
    } else {
        for model in &models {
            println!("{model}");
        }
    }
    Ok(())
}
