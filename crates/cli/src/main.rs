//! studypath CLI - what should I study next?

mod config;

use std::path::PathBuf;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use studypath_core::{Task, TaskStatus, UserProgress};
use studypath_storage::{JsonTaskSource, TaskSource};
use crate::config::StudypathConfig;

#[derive(Parser)]
#[command(name = "studypath")]
#[command(about = "Rank study tasks and recommend what to do next", long_about = None)]
struct Cli {
    /// Task JSON file, or a directory of task files
    #[arg(long, global = true, default_value = "tasks.json")]
    tasks: PathBuf,

    /// Configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the progress snapshot
    Progress,
    /// List tasks in priority order
    Rank {
        /// Show the factor breakdown for each task
        #[arg(long)]
        explain: bool,
    },
    /// Show the recommended next task
    Next,
    /// Show the immediate / next / later plan
    Plan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = StudypathConfig::load_or_default(cli.config.as_deref())?;

    let source = JsonTaskSource::open(&cli.tasks)
        .await
        .with_context(|| format!("Cannot open tasks at {}", cli.tasks.display()))?;
    let tasks = source.all_tasks().await?;
    info!("Loaded {} tasks", tasks.len());

    let progress = config.progress_builder().build(&tasks);
    let engine = config.engine();

    match cli.command {
        Commands::Progress => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                print_progress(&progress, &tasks);
            }
        }
        Commands::Rank { explain } => {
            let ranked = engine.rank_with_scores(&tasks, &progress);
            if cli.json {
                let scores: Vec<_> = ranked.iter().map(|(_, score)| score).collect();
                println!("{}", serde_json::to_string_pretty(&scores)?);
                return Ok(());
            }

            println!("Ranked tasks ({})", ranked.len());
            for (i, (task, score)) in ranked.iter().enumerate() {
                println!("  {:>2}. {:.3}  {}", i + 1, score.score, describe(task));
                if explain {
                    for (name, value) in score.breakdown.factors() {
                        println!("        {:<17}{:.3}", name, value);
                    }
                }
            }
        }
        Commands::Next => {
            let next = engine.recommend_next(&tasks, &progress);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&next)?);
                return Ok(());
            }
            match next {
                Some(task) => println!("Next: {}", describe(&task)),
                None => println!("Nothing is ready to start"),
            }
        }
        Commands::Plan => {
            let groups = engine.group_by_horizon(&tasks, &progress);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }
            for (label, section) in [
                ("Immediate", &groups.immediate),
                ("Next", &groups.next),
                ("Later", &groups.later),
            ] {
                println!("{} ({})", label, section.len());
                for task in section {
                    println!("  {}", describe(task));
                }
            }
        }
    }

    Ok(())
}

fn print_progress(progress: &UserProgress, tasks: &[Task]) {
    println!("Progress");
    println!("  Completed: {}", progress.completed_task_ids.len());
    println!("  In progress: {}", progress.in_progress_task_ids.len());
    println!("  Average session: {:.0} min", progress.average_session_time);
    println!("  Preferred difficulty: {}", progress.preferred_difficulty);
    println!("  Mastery");
    for (category, mastery) in progress.category_mastery.iter() {
        println!("    {:<18}{:>5.1}%", category, mastery);
    }

    let now = Utc::now();
    for task in tasks.iter().filter(|t| t.status == TaskStatus::InProgress) {
        let last = task.time_tracking.as_ref().and_then(|t| t.last_session_at);
        match last {
            Some(at) => println!(
                "  Studying {} (last session {}h ago)",
                task.id,
                (now - at).num_hours()
            ),
            None => println!("  Studying {}", task.id),
        }
    }
}

fn describe(task: &Task) -> String {
    let title = if task.title.is_empty() {
        task.id.as_str()
    } else {
        task.title.as_str()
    };
    format!(
        "{} [{} | {} | {} min | {}]",
        title, task.category, task.difficulty, task.estimated_time, task.status
    )
}
