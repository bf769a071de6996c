use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::commands::porcelain::log::LogOptions;
use twig::errors::RepositoryError;
use twig::render;

const LOG_ENV: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal version control system",
    long_about = "twig keeps snapshots of files in a content-addressable object store. \
    Files are staged with `add`, recorded with `commit`, and inspected with `log` and `show`.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path. \
        Running it in an existing repository changes nothing."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stores the content of each file and stages it under its path. \
        Staging a path again replaces its previous entry."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged files as a new commit on top of HEAD and clears the staging area."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command lists commits reachable from HEAD, or from the given revision, newest first."
    )]
    Log {
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
        #[arg(short = 'n', long = "max-count", help = "Limit the number of commits shown")]
        max_count: Option<usize>,
        #[arg(index = 1, help = "The revision to start from")]
        revision: Option<String>,
    },
    #[command(
        name = "show",
        about = "Show a commit",
        long_about = "This command prints a commit's metadata and, for every file it captured, \
        the line diff against the parent commit's version."
    )]
    Show {
        #[arg(index = 1, default_value = "HEAD", help = "The revision to show")]
        revision: String,
    },
    #[command(
        name = "status",
        about = "Show the staging area",
        long_about = "This command lists the staged files and whether each one is new or modified relative to HEAD."
    )]
    Status,
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command prints the object ID of a file's content and can store the content in the object database."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the raw bytes of an object in the repository. \
        It accepts a full object ID, an abbreviated one, or a revision such as HEAD."
    )]
    CatFile {
        #[arg(index = 1, help = "The object to print")]
        revision: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<RepositoryError>()
                .map(RepositoryError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            std::fs::create_dir_all(&path)?;
            let repository = Repository::new(path)?;

            render::init(&mut stdout, &repository.init().await?)?;
        }
        Commands::Add { paths } => {
            let repository = open_repository()?;

            for path in paths {
                repository.add(path).await?;
            }
        }
        Commands::Commit { message } => {
            let repository = open_repository()?;

            render::commit(&mut stdout, &repository.commit(&message).await?)?;
        }
        Commands::Log {
            oneline,
            max_count,
            revision,
        } => {
            let repository = open_repository()?;
            let options = LogOptions {
                start: revision,
                max_count,
            };

            render::log(&mut stdout, &repository.log_with(&options).await?, oneline)?;
        }
        Commands::Show { revision } => {
            let repository = open_repository()?;

            render::show(&mut stdout, &repository.show(&revision).await?)?;
        }
        Commands::Status => {
            let repository = open_repository()?;

            render::status(&mut stdout, &repository.status().await?)?;
        }
        Commands::HashObject { write, file } => {
            let repository = open_repository()?;

            writeln!(stdout, "{}", repository.hash_object(file, write).await?)?;
        }
        Commands::CatFile { revision } => {
            let repository = open_repository()?;

            stdout.write_all(&repository.cat_file(&revision).await?)?;
        }
    }

    stdout.flush()?;
    Ok(())
}

fn open_repository() -> Result<Repository> {
    Ok(Repository::new(std::env::current_dir()?)?)
}
