//! goaltrack CLI - define goals and record progress against them.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use goaltrack_core::{
    Goal, GoalId, GoalKind, OwnerKey, OwnerRecord, Priority, TimeSubtype,
    DEFAULT_ALLOWED_DEVIATION,
};
use goaltrack_storage::{JsonStorage, OwnerStore};
use goaltrack_progress::{
    render_history, render_value, summarize, HistoryAggregator, ProgressInput, ProgressRecorder,
    RecorderConfig, TimeFormat,
};

#[derive(Parser)]
#[command(name = "goaltrack")]
#[command(about = "Track progress toward personal goals", long_about = None)]
struct Cli {
    /// Storage directory
    #[arg(long, global = true, default_value = ".goaltrack")]
    data_dir: PathBuf,

    /// Owner (username) whose goals are used
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Tolerance for time-based goals that do not set one
    #[arg(long, global = true, default_value_t = DEFAULT_ALLOWED_DEVIATION)]
    allowed_deviation_default: u32,

    /// Reject records against goals with a malformed target time
    #[arg(long, global = true)]
    strict_deviation: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Record progress against a goal
    Record {
        /// Goal ID
        goal_id: String,
        /// Reported value (number, or time as HH:MM / MM:SS)
        #[arg(long)]
        value: Option<String>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a goal's progress history
    History {
        /// Goal ID
        goal_id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List stored owners
    Owners,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a new goal
    Add {
        /// Goal title
        title: String,
        /// Measurement kind
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Display unit (quantitative)
        #[arg(long)]
        unit: Option<String>,
        /// Target time (time-based)
        #[arg(long)]
        target_time: Option<String>,
        /// Target format (time-based)
        #[arg(long, value_enum, default_value = "clock")]
        subtype: SubtypeArg,
        /// Allowed deviation in minutes or seconds (time-based)
        #[arg(long)]
        allowed_deviation: Option<u32>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// Category ID
        #[arg(long)]
        category: Option<String>,
    },
    /// List goals
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Binary,
    Quantitative,
    TimeBased,
}

#[derive(Clone, Copy, ValueEnum)]
enum SubtypeArg {
    Clock,
    Interval,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

impl From<SubtypeArg> for TimeSubtype {
    fn from(arg: SubtypeArg) -> Self {
        match arg {
            SubtypeArg::Clock => TimeSubtype::ClockTime,
            SubtypeArg::Interval => TimeSubtype::TimeInterval,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GOALTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let storage: Arc<dyn OwnerStore> = Arc::new(JsonStorage::new(&cli.data_dir).await?);
    let config = RecorderConfig {
        default_allowed_deviation: cli.allowed_deviation_default,
        strict_deviation: cli.strict_deviation,
    };

    match cli.command {
        Commands::Goal { command } => {
            let owner = require_owner(cli.owner)?;
            match command {
                GoalCommands::Add {
                    title,
                    kind,
                    description,
                    unit,
                    target_time,
                    subtype,
                    allowed_deviation,
                    deadline,
                    priority,
                    category,
                } => {
                    let mut goal = match kind {
                        KindArg::Binary => Goal::binary(title, description),
                        KindArg::Quantitative => {
                            Goal::quantitative(title, description, unit.unwrap_or_default())
                        }
                        KindArg::TimeBased => {
                            let target = target_time
                                .ok_or_else(|| anyhow!("--target-time is required for time-based goals"))?;
                            if TimeFormat::detect(&target).is_none() {
                                bail!("Target time {:?} is neither HH:MM nor MM:SS", target);
                            }
                            Goal::time_based(title, description, target, subtype.into(), allowed_deviation)
                        }
                    };
                    goal.deadline = deadline;
                    goal.priority = priority.map(Priority::from);
                    goal.category_id = category;

                    let mut record = storage
                        .load_owner(&owner)
                        .await?
                        .unwrap_or_else(|| OwnerRecord::new(owner.as_str()));
                    let id = record.add_goal(goal);
                    storage.save_owner(&owner, &record).await?;
                    info!("Added goal {} for {}", id, owner);
                    println!("Added goal: {}", id);
                }
                GoalCommands::List => {
                    let Some(record) = storage.load_owner(&owner).await? else {
                        println!("Owner not found");
                        return Ok(());
                    };

                    println!("Goals ({})", record.goals.len());
                    for goal in &record.goals {
                        println!(
                            "  {} | {} | {} | {}",
                            goal.id,
                            goal.goal_type().label(),
                            goal.title,
                            describe_target(&goal.kind, config.default_allowed_deviation),
                        );
                    }
                }
            }
        }
        Commands::Record { goal_id, value, notes } => {
            let owner = require_owner(cli.owner)?;
            let goal_id = parse_goal_id(&goal_id)?;
            let recorder = ProgressRecorder::new(storage).with_config(config);

            let input = ProgressInput { value, notes };
            let progress = recorder.record_progress(&owner, &goal_id, &input).await?;
            println!("Recorded {}: {}", progress.id, render_value(&progress.payload));
        }
        Commands::History { goal_id, json } => {
            let owner = require_owner(cli.owner)?;
            let goal_id = parse_goal_id(&goal_id)?;
            let aggregator = HistoryAggregator::new(storage);

            let history = aggregator.progress_history(&owner, &goal_id).await;
            let entries = render_history(&history);
            let summary = summarize(&history);

            if json {
                let out = serde_json::json!({ "entries": entries, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if entries.is_empty() {
                println!("No progress recorded");
            } else {
                for entry in &entries {
                    println!("  {}", entry);
                }
                println!("{}", summary);
            }
        }
        Commands::Owners => {
            let owners = storage.list_owners().await?;
            println!("Owners ({})", owners.len());
            for owner in owners {
                println!("  {}", owner);
            }
        }
    }

    Ok(())
}

fn require_owner(owner: Option<String>) -> Result<OwnerKey> {
    owner
        .map(OwnerKey::new)
        .ok_or_else(|| anyhow!("--owner is required for this command"))
}

fn parse_goal_id(s: &str) -> Result<GoalId> {
    s.parse::<GoalId>().with_context(|| format!("Invalid goal ID: {}", s))
}

fn describe_target(kind: &GoalKind, default_allowed_deviation: u32) -> String {
    match kind {
        GoalKind::Binary | GoalKind::Habit => "-".to_string(),
        GoalKind::Quantitative { value_unit, current_value } => match current_value {
            Some(value) => format!("current {} {}", value, value_unit),
            None => format!("no value yet ({})", value_unit),
        },
        GoalKind::TimeBased { target_time, subtype, allowed_deviation } => format!(
            "target {} ({}, ±{})",
            target_time,
            subtype.placeholder(),
            allowed_deviation.unwrap_or(default_allowed_deviation)
        ),
    }
}
