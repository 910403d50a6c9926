//! focusplan - interval timer and weekly planner for the terminal
//!
//! - Run work/break sessions from saved templates
//! - Plan the week in hour blocks grouped by category
//! - Export and import everything as one JSON backup

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use tracing::debug;

use focusplan::cli::{
    run_interactive, CategoryCommand, Cli, Commands, Display, PlannerCommand, RunArgs,
    SessionOptions, TemplateCommand,
};
use focusplan::config::{resolve_data_dir, AppConfig};
use focusplan::planner::{ActivityDraft, ActivityUpdate, CategoryUpdate, DropTarget, Planner};
use focusplan::store::{backup, JsonStore, TemplateStore};
use focusplan::template::TemplateBuilder;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = if verbose { "focusplan=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir);
    debug!("Data directory: {}", data_dir.display());

    match cli.command {
        Some(Commands::Run(args)) => run(&data_dir, args).await?,
        Some(Commands::Template(command)) => template(&data_dir, command)?,
        Some(Commands::Planner(command)) => planner(&data_dir, command)?,
        Some(Commands::Category(command)) => category(&data_dir, command)?,
        Some(Commands::Export { output }) => export(&data_dir, output)?,
        Some(Commands::Import { path }) => import(&data_dir, &path)?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

// ============================================================================
// Session
// ============================================================================

async fn run(data_dir: &Path, args: RunArgs) -> Result<()> {
    let config = AppConfig::load(data_dir)?;
    let templates = TemplateStore::open(JsonStore::open(data_dir)?)?;

    let Some(template) = templates.find(&args.template).cloned() else {
        bail!(
            "no template matches '{}' (see `focusplan template list`)",
            args.template
        );
    };

    let options = SessionOptions {
        sound_enabled: config.sound.enabled && !args.no_sound,
        volume: config.sound.volume,
        autostart: args.autostart,
        exit_on_complete: args.exit_on_complete,
        tick_interval: args
            .tick_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.tick_interval()),
    };

    run_interactive(template, templates.list().to_vec(), options).await;
    Ok(())
}

// ============================================================================
// Templates
// ============================================================================

fn template(data_dir: &Path, command: TemplateCommand) -> Result<()> {
    let mut templates = TemplateStore::open(JsonStore::open(data_dir)?)?;

    match command {
        TemplateCommand::List => Display::show_template_list(templates.list()),
        TemplateCommand::Show { template } => {
            let found = templates
                .find(&template)
                .with_context(|| format!("no template matches '{template}'"))?;
            Display::show_template(found);
        }
        TemplateCommand::Create { name, intervals } => {
            let created = intervals
                .into_iter()
                .fold(TemplateBuilder::new(name), TemplateBuilder::spec)
                .build_now()?;
            templates.add(created.clone())?;
            Display::show_template_created(&created);
        }
        TemplateCommand::Delete { template } => {
            let id = templates
                .find(&template)
                .map(|t| t.id.clone())
                .with_context(|| format!("no template matches '{template}'"))?;
            if let Some(removed) = templates.remove(&id)? {
                Display::show_template_deleted(&removed);
            }
        }
    }
    Ok(())
}

// ============================================================================
// Planner
// ============================================================================

/// Resolves an exact activity id or a unique id prefix.
fn resolve_activity_id(planner: &Planner, query: &str) -> Result<String> {
    if planner.activity(query).is_some() {
        return Ok(query.to_string());
    }
    let matches: Vec<&str> = planner
        .activities()
        .iter()
        .filter(|a| a.id.starts_with(query))
        .map(|a| a.id.as_str())
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => bail!("no activity matches '{query}'"),
        _ => bail!(
            "'{query}' matches {} activities, use more characters",
            matches.len()
        ),
    }
}

fn resolve_category_id(planner: &Planner, query: &str) -> Result<String> {
    planner
        .find_category(query)
        .map(|c| c.id.clone())
        .with_context(|| format!("no category matches '{query}'"))
}

fn planner(data_dir: &Path, command: PlannerCommand) -> Result<()> {
    let mut planner = Planner::open(JsonStore::open(data_dir)?)?;

    match command {
        PlannerCommand::Show { day: Some(day) } => Display::show_day(&planner, day),
        PlannerCommand::Show { day: None } => Display::show_week(&planner),
        PlannerCommand::Add(args) => {
            let category_id = resolve_category_id(&planner, &args.category)?;
            let activity = planner.add_activity(ActivityDraft {
                title: args.title,
                category_id,
                day_index: args.day,
                start_hour: args.start_hour,
                duration: args.duration,
            })?;
            Display::show_activity_saved("Added", activity);
        }
        PlannerCommand::Edit {
            id,
            title,
            category,
            day,
            start_hour,
            duration,
        } => {
            let id = resolve_activity_id(&planner, &id)?;
            let category_id = category
                .map(|c| resolve_category_id(&planner, &c))
                .transpose()?;
            let activity = planner.update_activity(
                &id,
                ActivityUpdate {
                    title,
                    category_id,
                    day_index: day,
                    start_hour,
                    duration,
                },
            )?;
            Display::show_activity_saved("Updated", activity);
        }
        PlannerCommand::Move { id, day, hour } => {
            let id = resolve_activity_id(&planner, &id)?;
            let activity = planner.move_activity(
                &id,
                DropTarget {
                    day_index: day,
                    hour,
                },
            )?;
            Display::show_activity_saved("Moved", activity);
        }
        PlannerCommand::Remove { id } => {
            let id = resolve_activity_id(&planner, &id)?;
            let removed = planner.remove_activity(&id)?;
            Display::show_activity_removed(&removed);
        }
    }
    Ok(())
}

fn category(data_dir: &Path, command: CategoryCommand) -> Result<()> {
    let mut planner = Planner::open(JsonStore::open(data_dir)?)?;

    match command {
        CategoryCommand::List => Display::show_categories(planner.categories()),
        CategoryCommand::Add { name, color } => {
            let category = planner.add_category(&name, &color)?;
            Display::show_category_saved("Added", category);
        }
        CategoryCommand::Edit {
            category,
            name,
            color,
        } => {
            let id = resolve_category_id(&planner, &category)?;
            let updated = planner.update_category(&id, CategoryUpdate { name, color })?;
            Display::show_category_saved("Updated", updated);
        }
        CategoryCommand::Remove { category } => {
            let id = resolve_category_id(&planner, &category)?;
            let (removed, activities) = planner.remove_category(&id)?;
            Display::show_category_removed(&removed, activities);
        }
    }
    Ok(())
}

// ============================================================================
// Backup
// ============================================================================

fn export(data_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let store = JsonStore::open(data_dir)?;
    let templates = TemplateStore::open(store.clone())?;
    let planner = Planner::open(store)?;

    let now = Utc::now();
    let data = backup::export(templates.list(), planner.state(), now);
    let path =
        output.unwrap_or_else(|| PathBuf::from(backup::default_file_name(now.date_naive())));

    fs::write(&path, backup::to_json(&data)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Display::show_export_success(&path, &data);
    Ok(())
}

fn import(data_dir: &Path, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let data = backup::parse_backup(&text)?;

    let store = JsonStore::open(data_dir)?;
    let mut templates = TemplateStore::open(store.clone())?;
    let mut planner = Planner::open(store)?;
    backup::apply_import(data.clone(), &mut templates, &mut planner)?;

    Display::show_import_success(&data);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
