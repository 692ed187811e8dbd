use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use genui_bridge_core::config::{BridgeConfig, LoggingConfig};
use genui_bridge_core::{ConversationTree, ModelDescriptor, append_user_message};
use genui_bridge_embed::{EmbedPolicy, RenderMode};
use genui_bridge_relay::{EventRelay, MessageSync, RelayConfig};
use genui_bridge_sync::SyncClient;

mod replay;

#[derive(Parser)]
#[command(
    name = "genui-bridge",
    about = "Inspect, edit, and replay chat histories shared with embedded generative UI components",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the conversation path ending at a message
    Path {
        /// History JSON file
        #[arg(long)]
        history: PathBuf,

        /// Message id (default: the current message)
        #[arg(long)]
        id: Option<String>,
    },

    /// Append a user message to the current branch
    Append {
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        content: String,

        /// Model ids to record on the message (default: from config)
        #[arg(long)]
        model: Vec<String>,
    },

    /// Push edited message content to the chat backend
    Sync {
        /// Chat id (default: from config)
        #[arg(long)]
        chat: Option<String>,

        #[arg(long)]
        message: String,

        #[arg(long)]
        content: String,
    },

    /// Replay newline-delimited host signals against a history file
    Replay {
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        signals: PathBuf,
    },

    /// Show whether a model renders through the generative UI component
    EmbedCheck {
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },
}

fn init_logging(verbose: bool, logging: Option<&LoggingConfig>) {
    let level = if verbose {
        "debug".to_string()
    } else {
        logging
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| "info".into())
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = tracing_subscriber::EnvFilter::new(&level);
        for directive in logging.map(|l| l.filters.as_slice()).unwrap_or_default() {
            match directive.parse::<tracing_subscriber::filter::Directive>() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("Ignoring invalid log filter '{directive}': {e}"),
            }
        }
        filter
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.is_some_and(|l| l.format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(BridgeConfig::default_path);
    let config = BridgeConfig::load(&config_path)?;

    init_logging(cli.verbose, config.logging.as_ref());

    let (warnings, errors) = config.validate();
    for w in &warnings {
        tracing::warn!("{w}");
    }
    if !errors.is_empty() {
        for e in &errors {
            tracing::error!("{e}");
        }
        anyhow::bail!("invalid config at {}", config_path.display());
    }

    match cli.command {
        Commands::Path { history, id } => {
            let tree = ConversationTree::load(&history)?;
            let path = match id.as_deref() {
                Some(id) => tree.path_to(id),
                None => tree.current_path(),
            };
            if path.is_empty() {
                tracing::warn!("No path found");
            }
            for message in path {
                println!("{}\t{:?}\t{}", message.id, message.role, message.content);
            }
        }
        Commands::Append {
            history,
            content,
            model,
        } => {
            let mut tree = ConversationTree::load(&history)?;
            let models = if model.is_empty() { config.models.clone() } else { model };
            let id = append_user_message(&mut tree, &content, &models);
            tree.save(&history)?;
            println!("{id}");
        }
        Commands::Sync {
            chat,
            message,
            content,
        } => {
            let chat_id = chat
                .filter(|c| !c.is_empty())
                .or_else(|| config.chat_id().map(String::from));
            let Some(chat_id) = chat_id else {
                anyhow::bail!("no chat id: pass --chat or set chat_id in the config");
            };
            let Some(token) = config.token() else {
                anyhow::bail!("no API token: set api.token or api.token_env in the config");
            };
            let client = SyncClient::new(&config.api.base_url);
            let ack = client
                .sync_message_edit(&token, &chat_id, &message, &content)
                .await?;
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
        Commands::Replay { history, signals } => {
            let tree = ConversationTree::load(&history)?;
            let raw = std::fs::read_to_string(&signals)?;
            let actions = replay::parse_signals(&raw);

            let shared = tree.shared();
            let sync: Arc<dyn MessageSync> = Arc::new(SyncClient::new(&config.api.base_url));
            let relay = EventRelay::new(
                RelayConfig::from_bridge_config(&config),
                shared.clone(),
                Arc::new(replay::PrintingSender),
                Some(sync),
            );

            let summary = replay::replay(&relay, actions).await;
            shared.read().await.save(&history)?;
            tracing::info!(
                actions = summary.actions,
                updates = summary.history_updates,
                history = %history.display(),
                "History written"
            );
        }
        Commands::EmbedCheck { id, name } => {
            let policy = EmbedPolicy::from_config(&config.embed);
            let model = ModelDescriptor { id, name };
            let label = match policy.render_mode(Some(&model)) {
                RenderMode::GenUi => "genui",
                RenderMode::Markdown => "markdown",
            };
            println!("{label}");
        }
    }

    Ok(())
}
