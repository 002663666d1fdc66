use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use unspool::{
    ExtractOptions, ExtractionRequest, Extractor, FrameDescriptor, HttpTransport,
    ProgressCallback, ProgressInfo,
};

const CLI_AFTER_HELP: &str = "Examples:\n  unspool extract animation.webp --out frames\n  unspool extract https://example.com/animation.gif --out frames --progress --verbose\n  unspool extract animation.png --out frames --json\n  unspool completions zsh > _unspool";

#[derive(Debug, Parser)]
#[command(
    name = "unspool",
    version,
    about = "Extract every frame of an animated WebP, GIF, or APNG as still images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional output (one line per written frame).
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while frames are written.
    #[arg(long)]
    progress: bool,

    /// Allow writing into an output directory that already exists.
    #[arg(long)]
    overwrite: bool,

    /// Whole-request timeout in seconds for remote inputs.
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract all frames to an output directory.
    #[command(
        about = "Extract all frames to an output directory",
        after_help = "Examples:\n  unspool extract animation.webp --out frames\n  unspool extract https://example.com/animation.gif --out frames --json"
    )]
    Extract {
        /// Input image: local path, file:// URI, or http(s):// URI.
        input: String,

        /// Output directory (created if missing).
        #[arg(long, default_value = "frames")]
        out: PathBuf,

        /// Print the frame list as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    #[command(about = "Generate shell completions")]
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template(
            "{spinner:.green} {pos} frame(s) written",
        )?);
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.current);
    }
}

fn frame_payload(frame: &FrameDescriptor) -> serde_json::Value {
    json!({
        "path": frame.path.display().to_string(),
        "duration": frame.duration_ms,
        "width": frame.width,
        "height": frame.height,
    })
}

fn build_extractor(global: &GlobalOptions) -> Extractor {
    let mut transport = HttpTransport::new();
    if let Some(seconds) = global.timeout {
        transport = transport.with_timeout(Duration::from_secs(seconds));
    }
    Extractor::new().with_transport(Arc::new(transport))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, out, json } => {
            if out.exists() && !cli.global.overwrite {
                return Err(format!(
                    "output directory already exists: {} (use --overwrite)",
                    out.display()
                )
                .into());
            }

            let mut options = ExtractOptions::new();
            let progress_bar = if cli.global.progress {
                let progress = Arc::new(TerminalProgress::new()?);
                options = options.with_progress(progress.clone());
                Some(progress)
            } else {
                None
            };

            let extractor = build_extractor(&cli.global);
            let request = ExtractionRequest::new(input, out);
            let frames = match extractor.extract_with_options(&request, &options) {
                Ok(frames) => frames,
                Err(error) => {
                    if let Some(progress) = &progress_bar {
                        progress.finish();
                    }
                    return Err(format!("[{}] {error}", error.code()).into());
                }
            };

            if let Some(progress) = progress_bar {
                progress.finish();
            }

            if cli.global.verbose {
                for frame in &frames {
                    eprintln!(
                        "saved {} ({} ms, {}x{})",
                        frame.path.display(),
                        frame.duration_ms,
                        frame.width,
                        frame.height,
                    );
                }
            }

            if json {
                let payload = json!({
                    "count": frames.len(),
                    "frames": frames.iter().map(frame_payload).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Extracted {} frame(s) to {}",
                        frames.len(),
                        request.output_dir.display()
                    )
                    .green()
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "unspool", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
