//! `iam-assist` command line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};
use iam_assist_core::{Context, Fixture, Reply, ResponseGenerator};
use iam_assist_runtime::{
    AsyncResponder, ChatSession, DelayedResponder, RuntimeConfig, SessionError, TypingDelay,
};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Built-in demo account.
const DEMO_FIXTURE: &str = include_str!("../../../fixtures/svc-usr123.yaml");

#[derive(Parser)]
#[command(name = "iam-assist")]
#[command(about = "Keyword-driven assistant for service account compliance questions")]
#[command(version)]
struct Cli {
    /// Emit replies as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Runtime configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct ContextArgs {
    /// Account fixture (YAML or JSON) to answer with
    #[arg(long, conflicts_with = "demo")]
    fixture: Option<PathBuf>,

    /// Use the built-in demo account (svc-usr123)
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message
    Ask {
        message: String,

        #[command(flatten)]
        context: ContextArgs,

        /// Simulate typing delay (optionally overriding it, e.g. "500ms")
        #[arg(long, num_args = 0..=1, default_missing_value = "config", value_name = "DURATION")]
        delay: Option<String>,
    },

    /// Interactive chat over stdin
    Chat {
        #[command(flatten)]
        context: ContextArgs,

        /// Simulate typing delay (optionally overriding it, e.g. "500ms")
        #[arg(long, num_args = 0..=1, default_missing_value = "config", value_name = "DURATION")]
        delay: Option<String>,
    },

    /// Print the rule table in priority order
    Rules,

    /// Validate a fixture and print the context it produces
    Context {
        #[command(flatten)]
        context: ContextArgs,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

fn load_context(args: &ContextArgs) -> Result<Option<Context>> {
    let fixture = if let Some(path) = &args.fixture {
        Fixture::from_file(path).with_context(|| format!("loading fixture {}", path.display()))?
    } else if args.demo {
        Fixture::from_yaml(DEMO_FIXTURE).context("loading built-in demo fixture")?
    } else {
        return Ok(None);
    };

    let context = Context::from(&fixture);
    tracing::debug!(account = ?context.account_id, "Context loaded");
    Ok(Some(context))
}

/// Resolve the `--delay` flag: absent means no delay, bare means the
/// configured delay, a value means a fixed override.
fn resolve_delay(flag: Option<&str>, config: &RuntimeConfig) -> Result<TypingDelay> {
    match flag {
        None => Ok(TypingDelay::none()),
        Some("config") => Ok(config.typing_delay),
        Some(value) => {
            let duration: Duration = humantime::parse_duration(value)
                .with_context(|| format!("invalid --delay value {:?}", value))?;
            Ok(TypingDelay::fixed(duration))
        }
    }
}

fn print_reply(reply: &Reply, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

async fn run_ask(
    message: &str,
    context: Option<Context>,
    delay: TypingDelay,
    json: bool,
) -> Result<()> {
    let responder = DelayedResponder::new(ResponseGenerator::new(), delay);
    let reply = responder.reply(message, context.as_ref()).await;
    print_reply(&reply, json)
}

async fn run_chat(
    context: Option<Context>,
    delay: TypingDelay,
    config: &RuntimeConfig,
    json: bool,
) -> Result<()> {
    let responder = DelayedResponder::new(ResponseGenerator::new(), delay);
    let mut session = ChatSession::new(responder, context, config);

    if let Some(label) = &session.state().context_label {
        eprintln!("Context: {}", label);
    }
    if let Some(greeting) = session.state().messages.first() {
        println!("{}", greeting.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        match session.send(line).await {
            Ok(message) => {
                if json {
                    println!("{}", serde_json::to_string(message)?);
                } else {
                    println!("[{}] {}", message.time_label(), message.text);
                }
            }
            Err(SessionError::EmptyMessage) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn run_rules(json: bool) -> Result<()> {
    let generator = ResponseGenerator::new();

    if json {
        let rules: Vec<_> = generator
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                json!({
                    "priority": i + 1,
                    "id": rule.id,
                    "description": rule.description,
                    "predicate": rule.predicate.to_string(),
                    "requires": rule.requires,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    for (i, rule) in generator.rules().iter().enumerate() {
        let requires = if rule.requires.is_empty() {
            "-".to_string()
        } else {
            rule.requires
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:>2}. {:<22} {}\n    when: {}\n    requires: {}",
            i + 1,
            rule.id,
            rule.description,
            rule.predicate,
            requires
        );
    }
    println!(" -. {:<22} Clarify and list capabilities", "fallback");
    Ok(())
}

fn run_context(args: &ContextArgs) -> Result<()> {
    let context = load_context(args)?
        .context("no fixture given: pass --fixture FILE or --demo")?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Ask {
            message,
            context,
            delay,
        } => {
            let context = load_context(context)?;
            let delay = resolve_delay(delay.as_deref(), &config)?;
            run_ask(message, context, delay, cli.json).await
        }
        Commands::Chat { context, delay } => {
            let context = load_context(context)?;
            let delay = resolve_delay(delay.as_deref(), &config)?;
            run_chat(context, delay, &config, cli.json).await
        }
        Commands::Rules => run_rules(cli.json),
        Commands::Context { context } => run_context(context),
    }
}
