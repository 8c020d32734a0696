//! Command-line front-end for the people/task roster.
//!
//! # Responsibility
//! - Build a `ClientConfig` from defaults, an optional TOML file and flags.
//! - Drive one sync-controller operation per invocation and print the
//!   reloaded list as `<id>\t<name>` lines.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskroster_core::{
    core_version, default_log_level, init_logging, ClientConfig, HttpSyncController,
    LoggingOptions, MutationOutcome, Person, Task,
};

#[derive(Debug, Parser)]
#[command(name = "taskroster", about = "Manage people and their tasks over GraphQL")]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ClientArgs {
    /// TOML file with client settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint URL.
    #[arg(long, global = true, env = "TASKROSTER_ENDPOINT")]
    endpoint: Option<String>,

    /// Value for the X-Parse-Application-Id header.
    #[arg(long = "app-id", global = true, env = "TASKROSTER_APP_ID")]
    app_id: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (`trace|debug|info|warn|error`). Only valid with `--log-dir`.
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage people.
    #[command(subcommand)]
    People(PeopleCommand),
    /// Manage the tasks of one person.
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Print the core version.
    Version,
}

#[derive(Debug, Subcommand)]
enum PeopleCommand {
    List,
    Add { name: String },
    Rename { id: String, name: String },
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
enum TasksCommand {
    List { person_id: String },
    Add { person_id: String, name: String },
    Rename {
        person_id: String,
        task_id: String,
        name: String,
    },
    Remove { person_id: String, task_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        println!("taskroster {}", core_version());
        return Ok(());
    }

    init_cli_logging(&cli.client)?;
    let config = build_config(&cli.client)?;
    log::info!(
        "event=cli_start module=cli status=ok endpoint={} timeout_s={}",
        config.endpoint,
        config.timeout_seconds
    );
    let controller = HttpSyncController::connect(&config)
        .with_context(|| format!("invalid client configuration for `{}`", config.endpoint))?;

    match cli.command {
        Command::People(command) => run_people(&controller, command).await,
        Command::Tasks(command) => run_tasks(&controller, command).await,
        Command::Version => Ok(()),
    }
}

fn init_cli_logging(args: &ClientArgs) -> Result<()> {
    let Some(log_dir) = &args.log_dir else {
        return Ok(());
    };
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let mut options = LoggingOptions::new(level, log_dir);
    options.echo_warnings = true;
    init_logging(&options).context("failed to initialize logging")
}

fn build_config(args: &ClientArgs) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_toml_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(app_id) = &args.app_id {
        config.application_id = app_id.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_seconds = timeout;
    }
    config.validate()?;
    Ok(config)
}

async fn run_people(controller: &HttpSyncController, command: PeopleCommand) -> Result<()> {
    match command {
        PeopleCommand::List => {
            controller.load_people().await?;
        }
        PeopleCommand::Add { name } => {
            controller.set_new_person_input(name);
            report(controller.submit_new_person().await?);
        }
        PeopleCommand::Rename { id, name } => {
            controller.load_people().await?;
            let person = find_person(controller, &id)?;
            controller.begin_edit_person(person);
            controller.set_edit_person_input(name);
            report(controller.save_edit_person().await?);
        }
        PeopleCommand::Remove { id } => {
            report(controller.delete_person(&id).await?);
        }
    }
    print_people(&controller.people());
    Ok(())
}

async fn run_tasks(controller: &HttpSyncController, command: TasksCommand) -> Result<()> {
    let person_id = match &command {
        TasksCommand::List { person_id }
        | TasksCommand::Add { person_id, .. }
        | TasksCommand::Rename { person_id, .. }
        | TasksCommand::Remove { person_id, .. } => person_id.clone(),
    };

    controller.load_people().await?;
    let person = find_person(controller, &person_id)?;
    controller.select_person(person);

    match command {
        TasksCommand::List { .. } => {
            controller.load_tasks(&person_id).await?;
        }
        TasksCommand::Add { name, .. } => {
            controller.set_new_task_input(name);
            report(controller.submit_new_task().await?);
        }
        TasksCommand::Rename { task_id, name, .. } => {
            controller.load_tasks(&person_id).await?;
            let task = controller
                .tasks()
                .into_iter()
                .find(|task| task.id == task_id)
                .ok_or_else(|| anyhow!("task `{task_id}` not found for person `{person_id}`"))?;
            controller.begin_edit_task(task);
            controller.set_edit_task_input(name);
            report(controller.save_edit_task().await?);
        }
        TasksCommand::Remove { task_id, .. } => {
            report(controller.delete_task(&task_id).await?);
        }
    }
    print_tasks(&controller.tasks());
    Ok(())
}

fn find_person(controller: &HttpSyncController, id: &str) -> Result<Person> {
    controller
        .people()
        .into_iter()
        .find(|person| person.id == id)
        .ok_or_else(|| anyhow!("person `{id}` not found"))
}

fn report(outcome: MutationOutcome) {
    eprintln!("ok: {} ({:?})", outcome.id, outcome.reload);
}

fn print_people(people: &[Person]) {
    for person in people {
        println!("{}\t{}", person.id, person.name);
    }
}

fn print_tasks(tasks: &[Task]) {
    for task in tasks {
        println!("{}\t{}", task.id, task.name);
    }
}
