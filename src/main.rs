use anyhow::Result;
use bitstate::areas::repository::Repository;
use bitstate::artifacts::objects::hash_object::DigestAlgorithm;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bitstate",
    version = "0.1.0",
    about = "Content-addressed directory snapshots",
    long_about = "Hashes files as blobs, snapshots directories as trees in the binary \
    index layout and chains commits on top, all in an in-memory object store. \
    Nothing is written to disk.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "sha1",
        help = "Digest algorithm used to name objects (sha1 or sha256)"
    )]
    digest: DigestAlgorithm,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "hash-object",
        about = "Print the blob ID of a file",
        long_about = "This command hashes a file as a blob and prints its object ID. \
        The path is resolved against the current directory."
    )]
    HashObject {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "write-tree",
        about = "Snapshot a directory and print the root tree ID",
        long_about = "This command builds the nested trees for a directory (the current one by default) \
        and prints the ID of the root tree."
    )]
    WriteTree {
        #[arg(index = 1, help = "The directory to snapshot")]
        path: Option<String>,
    },
    #[command(
        name = "ls-tree",
        about = "List the children of the root tree",
        long_about = "This command builds the trees for a directory and prints one line per root child: \
        mode, type, object ID and path."
    )]
    LsTree {
        #[arg(index = 1, help = "The directory to snapshot")]
        path: Option<String>,
    },
    #[command(
        name = "commit",
        about = "Snapshot a directory and commit it with the specified message",
        long_about = "This command builds the trees for a directory and commits the root tree. \
        The author is read from GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and GIT_AUTHOR_DATE."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(index = 1, help = "The directory to snapshot")]
        path: Option<String>,
    },
    #[command(
        name = "export",
        about = "Print every stored object as JSON",
        long_about = "This command builds the trees for a directory, commits them when a message is given, \
        and prints the object store as JSON with hex-encoded data."
    )]
    Export {
        #[arg(short, long, help = "Commit the snapshot with this message first")]
        message: Option<String>,
        #[arg(index = 1, help = "The directory to snapshot")]
        path: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn open_repository(path: Option<&str>, digest: DigestAlgorithm) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, digest, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), digest, Box::new(std::io::stdout()))
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::HashObject { file } => {
            let mut repository = open_repository(None, cli.digest)?;

            repository.hash_object(file)?
        }
        Commands::WriteTree { path } => {
            let mut repository = open_repository(path.as_deref(), cli.digest)?;

            repository.write_tree()?
        }
        Commands::LsTree { path } => {
            let mut repository = open_repository(path.as_deref(), cli.digest)?;

            repository.ls_tree()?
        }
        Commands::Commit { message, path } => {
            let mut repository = open_repository(path.as_deref(), cli.digest)?;

            repository.commit(message)?
        }
        Commands::Export { message, path } => {
            let mut repository = open_repository(path.as_deref(), cli.digest)?;

            repository.export(message.as_deref())?
        }
    }

    Ok(())
}
