//! CLI entry point for quire

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::Site;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A file-backed article store with an authoring API", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new article
    New {
        /// Slug of the new article
        slug: String,

        /// Title of the new article
        #[arg(short, long)]
        title: String,

        /// Publication date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Read the body from this file
        #[arg(short, long)]
        body: Option<PathBuf>,
    },

    /// List articles, newest first
    #[command(alias = "ls")]
    List {
        /// Include body excerpts
        #[arg(short, long)]
        excerpts: bool,
    },

    /// Print an article
    Show {
        slug: String,
    },

    /// Render an article body
    Render {
        slug: String,

        /// Output format (json, html)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Delete an article
    Delete {
        slug: String,
    },

    /// Store an image in the upload directory and print its URL
    Upload {
        file: PathBuf,
    },

    /// Generate static article output
    #[command(alias = "g")]
    Generate,

    /// Start the server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.host)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Remove generated output
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            quire::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            slug,
            title,
            date,
            body,
        } => {
            let site = Site::new(&base_dir)?;
            quire::commands::new::create_article(
                &site,
                &slug,
                &title,
                date.as_deref(),
                body.as_deref(),
            )?;
        }

        Commands::List { excerpts } => {
            let site = Site::new(&base_dir)?;
            quire::commands::list::run(&site, excerpts)?;
        }

        Commands::Show { slug } => {
            let site = Site::new(&base_dir)?;
            quire::commands::show::run(&site, &slug)?;
        }

        Commands::Render { slug, format } => {
            let site = Site::new(&base_dir)?;
            quire::commands::render::run(&site, &slug, &format)?;
        }

        Commands::Delete { slug } => {
            let site = Site::new(&base_dir)?;
            quire::commands::delete::run(&site, &slug)?;
        }

        Commands::Upload { file } => {
            let site = Site::new(&base_dir)?;
            quire::commands::upload::run(&site, &file)?;
        }

        Commands::Generate => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating article output...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.host.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            quire::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning generated output...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("quire version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
