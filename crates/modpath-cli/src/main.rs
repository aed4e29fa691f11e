#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use modpath_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modpath")]
#[command(author, version, about = "Classify JVM artifacts onto the module path or classpath", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Read settings from a JSON config file
    #[arg(long, global = true, value_name = "FILE", env = "MODPATH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Split candidate artifacts into module path and classpath
    Resolve {
        /// Main module: module-info.java, module-info.class, or a directory/JAR/JMOD
        #[arg(long, value_name = "PATH")]
        main: Option<PathBuf>,

        /// Follow `requires static` of every module, not only the main one
        #[arg(long)]
        include_static: bool,

        /// Add every module providing a service used in the closure
        #[arg(long)]
        include_all_providers: bool,

        /// Extra root modules
        #[arg(long, value_delimiter = ',', value_name = "MODULES")]
        add_modules: Vec<String>,

        /// Java release used for multi-release JARs
        #[arg(long)]
        release: Option<u16>,

        /// Size of a dedicated scan pool
        #[arg(long)]
        threads: Option<usize>,

        /// Directories, JARs and JMODs to classify
        candidates: Vec<PathBuf>,
    },

    /// Show the module descriptor of a single artifact
    Describe {
        /// Java release used for multi-release JARs
        #[arg(long)]
        release: Option<u16>,

        /// Directory, JAR, JMOD, module-info.class or module-info.java
        path: PathBuf,
    },

    /// Print the class-file version of a .class file
    ClassfileVersion {
        /// The class file
        file: PathBuf,
    },

    /// Expand braces in module source path segments
    Expand {
        /// Segments such as `src/{main,test}/java`
        #[arg(required = true)]
        segments: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config: file settings first, flags on top
    let base = match &cli.config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                cwd.join(path)
            };
            Config {
                cwd: cwd.clone(),
                ..Config::load(&path).into_diagnostic()?
            }
        }
        None => Config::new(cwd.clone()),
    };
    let config = Config {
        verbosity: base.verbosity.max(cli.verbose),
        json_logs: base.json_logs || cli.json,
        ..base
    };

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Resolve {
            main,
            include_static,
            include_all_providers,
            add_modules,
            release,
            threads,
            candidates,
        }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            let args = commands::resolve::ResolveArgs {
                main,
                candidates,
                include_static,
                include_all_providers,
                add_modules,
                release,
                threads,
            };
            commands::resolve::run(&config, args, cli.json)
        }
        Some(Commands::Describe { release, path }) => {
            let span = tracing::info_span!("describe", cmd = "describe", cwd = %cwd.display());
            let _guard = span.enter();
            commands::describe::run(&config, &path, release, cli.json)
        }
        Some(Commands::ClassfileVersion { file }) => {
            commands::classfile_version::run(&config, &file, cli.json)
        }
        Some(Commands::Expand { segments }) => commands::expand::run(&segments, cli.json),
    }
}
