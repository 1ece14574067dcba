use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use specflow::commands::discovery::ArtifactKind;
use specflow::commands::{common, dep, discovery, prioritize, repair, transition, unit};
use specflow::fs::Workspace;
use specflow::graph::RelationKind;
use specflow::models::{WorkStatus, WorkUnitType};
use specflow::prioritize::Placement;
use specflow::validation::{clap_prefix, clap_work_unit_id};

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "SPECFLOW_LOG";

#[derive(Parser)]
#[command(name = "specflow")]
#[command(about = "Work-unit workflow: states, relationships and priorities", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root (defaults to the nearest directory containing spec/)
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a work unit in the backlog
    Create {
        /// Id prefix, 2-6 uppercase letters (e.g. AUTH)
        #[arg(value_parser = clap_prefix)]
        prefix: String,

        title: String,

        /// story, bug or task
        #[arg(short = 't', long = "type", default_value = "story")]
        unit_type: WorkUnitType,

        #[arg(short, long)]
        description: Option<String>,

        /// Nest the new unit under this parent
        #[arg(short, long, value_parser = clap_work_unit_id)]
        parent: Option<String>,
    },

    /// Show a work unit
    Show {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },

    /// List work units by column in priority order
    List {
        #[arg(short, long)]
        status: Option<WorkStatus>,
    },

    /// Move a work unit to another status
    Status {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        status: WorkStatus,

        /// Required when moving to blocked
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Manage relationships between work units
    Dep {
        #[command(subcommand)]
        command: DepCommands,
    },

    /// Set or clear a work unit's parent
    Parent {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        #[arg(value_parser = clap_work_unit_id, required_unless_present = "clear")]
        parent: Option<String>,

        #[arg(long, conflicts_with = "parent")]
        clear: bool,
    },

    /// Reorder a work unit within its column
    Prioritize {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        /// top, bottom, a position (0-based), before:ID or after:ID
        position: Placement,
    },

    /// Manage discovery questions
    Question {
        #[command(subcommand)]
        command: QuestionCommands,
    },

    /// Manage business rules
    Rule {
        #[command(subcommand)]
        command: EntryCommands,
    },

    /// Manage concrete examples
    Example {
        #[command(subcommand)]
        command: EntryCommands,
    },

    /// Link a feature file to a work unit
    Link {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        /// Feature name, with or without the .feature extension
        feature: String,

        /// Unlink instead
        #[arg(long)]
        remove: bool,
    },

    /// Set a work unit's estimate in story points
    Estimate {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,

        points: u32,
    },

    /// Delete a work unit that has no children
    Delete {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
    },

    /// Check the document for consistency problems
    Validate,

    /// Fix the consistency problems that are safe to fix automatically
    Repair,

    /// Unfinished units that block others, by impact
    Bottlenecks,

    /// Unfinished units with no hierarchy or relations
    Orphans,
}

#[derive(Subcommand)]
enum DepCommands {
    /// Add a relation: <from> <blocks|blockedBy|dependsOn|relatesTo> <to>
    Add {
        #[arg(value_parser = clap_work_unit_id)]
        from: String,
        kind: RelationKind,
        #[arg(value_parser = clap_work_unit_id)]
        to: String,
    },

    /// Remove a relation and its inverse
    Remove {
        #[arg(value_parser = clap_work_unit_id)]
        from: String,
        kind: RelationKind,
        #[arg(value_parser = clap_work_unit_id)]
        to: String,
    },

    /// Show every relation of a work unit
    Show {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
    },
}

#[derive(Subcommand)]
enum QuestionCommands {
    Add {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        text: String,
    },

    Answer {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        question: u32,
        answer: String,

        /// Also record the answer as a rule
        #[arg(long)]
        add_rule: bool,
    },

    Remove {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        question: u32,
    },

    Restore {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        question: u32,
    },
}

#[derive(Subcommand)]
enum EntryCommands {
    Add {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        text: String,
    },

    Remove {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        entry: u32,
    },

    Restore {
        #[arg(value_parser = clap_work_unit_id)]
        id: String,
        entry: u32,
    },
}

fn entry_command(workspace: &Workspace, kind: ArtifactKind, command: EntryCommands) -> Result<()> {
    match command {
        EntryCommands::Add { id, text } => discovery::add(workspace, kind, id, text),
        EntryCommands::Remove { id, entry } => discovery::remove(workspace, kind, id, entry),
        EntryCommands::Restore { id, entry } => discovery::restore(workspace, kind, id, entry),
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = common::project_root(cli.dir)?;
    let workspace = Workspace::open(&root)?;
    tracing::debug!(document = %workspace.document_path().display(), "opened workspace");

    match cli.command {
        Commands::Create {
            prefix,
            title,
            unit_type,
            description,
            parent,
        } => unit::create(&workspace, prefix, title, unit_type, description, parent),
        Commands::Show { id, json } => unit::show(&workspace, id, json),
        Commands::List { status } => unit::list(&workspace, status),
        Commands::Status { id, status, reason } => {
            transition::execute(&workspace, id, status, reason)
        }
        Commands::Dep { command } => match command {
            DepCommands::Add { from, kind, to } => dep::add(&workspace, from, kind, to),
            DepCommands::Remove { from, kind, to } => dep::remove(&workspace, from, kind, to),
            DepCommands::Show { id } => dep::show(&workspace, id),
        },
        Commands::Parent { id, parent, clear } => {
            unit::parent(&workspace, id, if clear { None } else { parent })
        }
        Commands::Prioritize { id, position } => prioritize::execute(&workspace, id, position),
        Commands::Question { command } => match command {
            QuestionCommands::Add { id, text } => {
                discovery::add(&workspace, ArtifactKind::Question, id, text)
            }
            QuestionCommands::Answer {
                id,
                question,
                answer,
                add_rule,
            } => discovery::answer(&workspace, id, question, answer, add_rule),
            QuestionCommands::Remove { id, question } => {
                discovery::remove(&workspace, ArtifactKind::Question, id, question)
            }
            QuestionCommands::Restore { id, question } => {
                discovery::restore(&workspace, ArtifactKind::Question, id, question)
            }
        },
        Commands::Rule { command } => entry_command(&workspace, ArtifactKind::Rule, command),
        Commands::Example { command } => entry_command(&workspace, ArtifactKind::Example, command),
        Commands::Link {
            id,
            feature,
            remove,
        } => unit::link(&workspace, id, feature, remove),
        Commands::Estimate { id, points } => unit::estimate(&workspace, id, points),
        Commands::Delete { id } => unit::delete(&workspace, id),
        Commands::Validate => repair::validate(&workspace),
        Commands::Repair => repair::repair(&workspace),
        Commands::Bottlenecks => dep::bottlenecks(&workspace),
        Commands::Orphans => dep::orphans(&workspace),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // DataIntegrity errors carry their own hint to run `specflow repair`
            eprintln!("{} {err:#}", "✗".red().bold());
            ExitCode::FAILURE
        }
    }
}
