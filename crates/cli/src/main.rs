mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-builder")]
#[command(version, about = "Single-page blog generator and packager", long_about = None)]
struct Cli {
    /// Global config file [default: ~/.blog-builder/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new blog project
    Init {
        /// Path to create blog project in
        path: PathBuf,

        /// Blog title
        #[arg(long)]
        title: Option<String>,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Template id (clean, dark, magazine)
        #[arg(long, default_value = "clean")]
        template: String,
    },

    /// Build site into a directory
    Build {
        /// Path to blog project
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build site and write it as a ZIP archive
    Package {
        /// Path to blog project
        path: PathBuf,

        /// Archive file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a blog from a one-sentence description, no project needed
    Quick {
        /// Description, e.g. "a dark tech blog, author: ann"
        prompt: String,

        /// Archive file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the bare HTML page here
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Ask the content service to write a blog, then package it
    Generate {
        /// What the blog should be about
        prompt: String,

        /// Template id (clean, dark, magazine)
        #[arg(long)]
        template: Option<String>,

        /// Writing style hint
        #[arg(long)]
        style: Option<String>,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Archive file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Upload the archive to configured storage
        #[arg(long)]
        publish: bool,
    },

    /// Package a blog project and upload it
    Publish {
        /// Path to blog project
        path: PathBuf,

        /// Write into a local directory instead of configured storage
        #[arg(long)]
        to_dir: Option<PathBuf>,
    },

    /// Delete an uploaded archive
    Unpublish {
        /// Object key printed by publish
        key: String,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Configure storage and content service credentials
    Configure,

    /// Preview site locally with live reload
    Preview {
        /// Path to blog project
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Command::Init {
            path,
            title,
            author,
            template,
        } => commands::init::run(path, title, author, template).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Package { path, output } => commands::build::package(path, output).await,
        Command::Quick {
            prompt,
            output,
            html,
        } => commands::quick::run(prompt, output, html).await,
        Command::Generate {
            prompt,
            template,
            style,
            author,
            output,
            publish,
        } => {
            commands::generate::run(
                config,
                commands::generate::GenerateArgs {
                    prompt,
                    template,
                    style,
                    author,
                    output,
                    publish,
                },
            )
            .await
        }
        Command::Publish { path, to_dir } => commands::publish::publish(config, path, to_dir).await,
        Command::Unpublish { key, force } => commands::publish::unpublish(config, key, force).await,
        Command::Configure => commands::publish::configure(config).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-builder", &mut io::stdout());
            Ok(())
        }
    }
}
