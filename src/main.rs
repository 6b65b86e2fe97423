//! tern CLI - local snapshot store command line interface

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tern::ops::{checkout, commit, history, materialize_tree, tag, write_worktree};
use tern::{get_object, hash_file, head, list_tags, resolve_ref, Repo};

#[derive(Parser)]
#[command(name = "tern")]
#[command(about = "local content-addressed snapshot store")]
#[command(version)]
struct Cli {
    /// working directory root
    #[arg(short = 'C', long, global = true, default_value = ".", env = "TERN_DIR")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a repository in the working directory
    Init,

    /// store a file as a blob and print its oid
    HashObject {
        /// file to store, relative to the working directory root
        path: PathBuf,
    },

    /// print the payload of an object
    CatFile {
        /// object oid, ref or tag
        object: String,
    },

    /// snapshot the working directory as a tree and print its oid
    WriteTree,

    /// replace the working directory with a tree, leaving HEAD alone
    ReadTree {
        /// tree oid
        tree: String,
    },

    /// snapshot the working directory as a new commit on HEAD
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// show history from HEAD
    Log {
        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// restore a commit into the working directory and move HEAD to it
    Checkout {
        /// commit oid, ref or tag
        commit: String,
    },

    /// name a commit
    Tag {
        /// tag name
        name: String,

        /// commit oid, ref or tag (defaults to HEAD)
        commit: Option<String>,
    },

    /// list tag names
    Tags,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> tern::Result<()> {
    match cli.command {
        Commands::Init => {
            let repo = Repo::init(&cli.dir)?;
            println!("initialized tern repository at {}", repo.path().display());
        }

        Commands::HashObject { path } => {
            let repo = Repo::open(&cli.dir)?;
            // join keeps absolute paths unchanged
            println!("{}", hash_file(&repo, &cli.dir.join(path))?);
        }

        Commands::CatFile { object } => {
            let repo = Repo::open(&cli.dir)?;
            let oid = resolve_ref(&repo, &object)?;
            let (_, payload) = get_object(&repo, &oid, None)?;
            write_stdout(&payload)?;
        }

        Commands::WriteTree => {
            let repo = Repo::open(&cli.dir)?;
            println!("{}", write_worktree(&repo)?);
        }

        Commands::ReadTree { tree } => {
            let repo = Repo::open(&cli.dir)?;
            let oid = resolve_ref(&repo, &tree)?;
            materialize_tree(&repo, &oid)?;
        }

        Commands::Commit { message } => {
            let repo = Repo::open(&cli.dir)?;
            println!("{}", commit(&repo, &message)?);
        }

        Commands::Log { max_count } => {
            let repo = Repo::open(&cli.dir)?;
            let walk = history(&repo, head(&repo)?);
            for entry in walk.take(max_count.unwrap_or(usize::MAX)) {
                println!("{}", entry?);
            }
        }

        Commands::Checkout { commit } => {
            let repo = Repo::open(&cli.dir)?;
            let oid = resolve_ref(&repo, &commit)?;
            checkout(&repo, &oid)?;
        }

        Commands::Tag { name, commit } => {
            let repo = Repo::open(&cli.dir)?;
            let oid = commit.map(|c| resolve_ref(&repo, &c)).transpose()?;
            let target = tag(&repo, &name, oid)?;
            println!("{} {}", target, name);
        }

        Commands::Tags => {
            let repo = Repo::open(&cli.dir)?;
            for name in list_tags(&repo)? {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn write_stdout(data: &[u8]) -> tern::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(data)
        .and_then(|_| stdout.flush())
        .map_err(|e| tern::Error::Io {
            path: "stdout".into(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hash_object_path_is_relative_to_dir() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("data.txt"), "payload").unwrap();

        let cli = Cli {
            dir: dir.path().to_path_buf(),
            command: Commands::HashObject {
                path: PathBuf::from("data.txt"),
            },
        };
        run(cli).unwrap();

        let oid = tern::compute_oid(repo.object_format(), tern::ObjectType::Blob, b"payload");
        assert!(tern::object_exists(&repo, &oid));
    }
}
