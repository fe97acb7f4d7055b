use hr_agent::{ClassifiedIntent, CommandDispatcher, HrConfig, HrStore, IntentKind};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hr-agent")]
#[command(about = "Answer HR requests against flat-file employee and leave records")]
#[command(version)]
struct Args {
    /// Path to the data directory (or set HR_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print replies and records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute raw classifier output, e.g. '{"intent":"get_manager","name":"rina"}'
    Exec {
        /// JSON object with an `intent` field plus slot fields
        classified: String,
    },
    /// Execute an intent given by label
    Ask {
        /// Intent label, e.g. apply_leave
        intent: String,

        /// Slot value as key=value; repeatable
        #[arg(short, long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
    },
    /// List every employee name, or full records with --json
    Employees,
}

fn parse_slot(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = match args.data_dir {
        Some(dir) => HrConfig::with_data_dir(dir),
        None => HrConfig::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?,
    };
    info!("Using data directory {}", config.data_dir.display());

    let store = HrStore::open(&config);

    match args.command {
        Commands::Exec { classified } => {
            let intent = ClassifiedIntent::from_classifier_output(&classified);
            run(store, &intent, args.json)
        }
        Commands::Ask { intent, slots } => {
            let intent = slots.iter().fold(
                ClassifiedIntent::new(IntentKind::from_label(&intent)),
                |acc, (key, value)| acc.with_slot(key, value.as_str()),
            );
            run(store, &intent, args.json)
        }
        Commands::Employees => {
            let directory = &store.directory;
            if args.json {
                let records: Vec<_> = directory
                    .all_names()
                    .into_iter()
                    .filter_map(|name| directory.employee_info(name))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for name in directory.all_names() {
                    println!("{}", name);
                }
            }
            Ok(())
        }
    }
}

fn run(store: HrStore, intent: &ClassifiedIntent, json: bool) -> Result<()> {
    let mut dispatcher = CommandDispatcher::new(store);
    let reply = dispatcher.execute(intent);
    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}
