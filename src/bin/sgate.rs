//! sgate: scholargate CLI
//!
//! Ask the study assistant from a terminal and inspect the local quota.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scholargate::{AiGateway, AiKind, AiResponse, GatewayConfig, ScholarGateBuilder};

/// Scholargate CLI
#[derive(Parser)]
#[command(name = "sgate")]
#[command(version)]
#[command(about = "Metered, cached study assistant")]
struct Args {
    /// Config file (default: ~/.scholargate/config.toml)
    #[arg(short, long, env = "SCHOLARGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show remaining uses for today
    Usage,

    /// Explain a homework question
    Explain {
        /// Question (or omit to read from stdin)
        text: Option<String>,
    },

    /// Generate flashcards on a topic
    Flashcards {
        /// Topic (or omit to read from stdin)
        text: Option<String>,
    },

    /// Generate a multiple-choice quiz on a topic
    Quiz {
        /// Topic (or omit to read from stdin)
        text: Option<String>,
    },

    /// Find the formula for a description
    Formula {
        /// Query (or omit to read from stdin)
        text: Option<String>,
    },

    /// Record a watched rewarded ad and grant bonus uses
    Reward {
        /// Uses to grant (default: configured reward amount)
        #[arg(short, long)]
        amount: Option<u32>,
    },

    /// Print a cached answer without calling the service
    Cached {
        /// Request kind: explain, flashcards, quiz or formula
        kind: AiKind,
        /// Prompt exactly as originally asked
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = GatewayConfig::load(args.config.as_deref())?;
    let gateway = ScholarGateBuilder::from_config(&config)?.build()?;

    match args.command {
        Command::Usage => print_usage(&gateway).await?,

        Command::Explain { text } => {
            let text = resolve_text(text, "explain")?;
            print_response(&gateway.call(AiKind::Explain, &text).await?);
        }

        Command::Flashcards { text } => {
            let text = resolve_text(text, "flashcards")?;
            print_response(&gateway.call(AiKind::Flashcards, &text).await?);
        }

        Command::Quiz { text } => {
            let text = resolve_text(text, "quiz")?;
            print_response(&gateway.call(AiKind::Quiz, &text).await?);
        }

        Command::Formula { text } => {
            let text = resolve_text(text, "formula")?;
            print_response(&gateway.call(AiKind::Formula, &text).await?);
        }

        Command::Reward { amount } => {
            match amount {
                Some(n) => gateway.add_bonus_uses(n).await?,
                None => gateway.award_rewarded_ad().await?,
            }
            print_usage(&gateway).await?;
        }

        Command::Cached { kind, prompt } => match gateway.cached_result(kind, &prompt).await {
            Some(response) => print_response(&response),
            None => {
                eprintln!("no cached {kind} answer for that prompt");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}

async fn print_usage(gateway: &AiGateway) -> scholargate::Result<()> {
    let usage = gateway.usage_breakdown().await?;
    println!("daily:     {} of {}", usage.daily, gateway.daily_limit());
    println!("bonus:     {}", usage.bonus);
    println!("remaining: {}", usage.total);
    Ok(())
}

fn print_response(response: &AiResponse) {
    match response {
        AiResponse::Text(result) => println!("{}", result.text),
        AiResponse::Flashcards(set) => {
            for (i, card) in set.cards.iter().enumerate() {
                println!("{}. {}", i + 1, card.front);
                println!("   {}", card.back);
            }
        }
        AiResponse::Quiz(quiz) => {
            for (i, q) in quiz.questions.iter().enumerate() {
                println!("{}. {}", i + 1, q.question);
                for (j, option) in q.options.iter().enumerate() {
                    let marker = if j == usize::from(q.answer) { '*' } else { ' ' };
                    println!("  {marker} {}) {option}", (b'a' + j as u8) as char);
                }
                if !q.explanation.is_empty() {
                    println!("    {}", q.explanation);
                }
            }
        }
    }
}
