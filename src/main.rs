use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use topiclens::{bundle::ResultBundle, config::Config, loader, serve, vis};

#[derive(Parser, Debug)]
#[command(name = "topiclens")]
#[command(author, version, about = "Dashboard for pre-computed LDA topic-modeling results")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the dashboard server
    Serve {
        /// Port to listen on (default from config, else 3217)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load the result bundle and print a validation summary
    Check,

    /// Write the interactive visualization document to disk
    Export {
        /// Output file (default: lda_visualization.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or_else(|| Config::load().server.port);
            if let Err(e) = serve::start(port) {
                eprintln!("{} {}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        }
        Command::Check => run_check(),
        Command::Export { output } => run_export(output),
        Command::Completion { shell } => {
            generate(shell, &mut Cli::command(), "topiclens", &mut io::stdout());
        }
    }
}

fn load_or_exit() -> &'static ResultBundle {
    match loader::load() {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_check() {
    let path = loader::bundle_path();
    let bundle = load_or_exit();
    let stats = bundle.stats();

    println!("{} {}", "Bundle loaded:".green().bold(), path.display());
    println!("  Documents:     {}", stats.document_count);
    println!("  Topics:        {}", stats.num_topics);
    println!("  Vocabulary:    {}", stats.vocabulary_size);
    println!("  Alpha sweep:   {} rows", bundle.alpha_results.len());
    println!("  Beta sweep:    {} rows", bundle.beta_results.len());

    match vis::prepared(bundle) {
        Ok(_) => println!("  Visualization: {}", "ok".green()),
        // Not fatal: the dashboard still serves without the visualization.
        Err(e) => println!("  Visualization: {} ({})", "unavailable".yellow(), e),
    }
}

fn run_export(output: Option<PathBuf>) {
    let bundle = load_or_exit();

    let html = match vis::prepared(bundle) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("{} failed to build visualization: {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let path = output.unwrap_or_else(|| PathBuf::from(serve::DOWNLOAD_FILE_NAME));
    if let Err(e) = std::fs::write(&path, html) {
        eprintln!("{} failed to write {}: {}", "error:".red().bold(), path.display(), e);
        std::process::exit(1);
    }
    println!("{} {}", "Visualization saved:".green().bold(), path.display());
}
