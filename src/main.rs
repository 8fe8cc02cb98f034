use clap::{Parser, Subcommand};
use media_squeeze::imaging::{Dimensions, MagickBackend, derive_sizes};
use media_squeeze::{config, explore, output, publish, recipes, select};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Format toggles for the explore command.
#[derive(clap::Args, Clone)]
struct FormatArgs {
    /// Skip JPEG candidates
    #[arg(short = 'j', long)]
    skip_jpg: bool,

    /// Skip PNG candidates
    #[arg(short = 'p', long)]
    skip_png: bool,

    /// Skip WebP candidates
    #[arg(short = 'w', long)]
    skip_webp: bool,

    /// Only recompress the full-size image, no resized variants
    #[arg(short = 'f', long)]
    fullsize_only: bool,
}

impl FormatArgs {
    fn apply(&self, formats: &mut config::FormatsConfig) {
        formats.jpg &= !self.skip_jpg;
        formats.png &= !self.skip_png;
        formats.webp &= !self.skip_webp;
        formats.fullsize_only |= self.fullsize_only;
    }
}

#[derive(Parser)]
#[command(name = "media-squeeze")]
#[command(about = "Find the smallest encoding for a WordPress image and all its sizes")]
#[command(long_about = "\
Find the smallest encoding for a WordPress image and all its sizes

WordPress stores every uploaded image together with resized copies named
<stem>-<w>x<h>.<ext>. This tool predicts exactly which copies exist, rebuilds
the image and every copy under many compression profiles, and lets you pick
the smallest one that still looks right.

Work directory layout:

  tmp/
  ├── candidates.json              # Source, derived sizes, candidates by size
  ├── webp_q70_inc_resize/         # One directory per compression profile
  │   ├── dawn.webp                # Full size
  │   ├── dawn-300x118.webp        # One per derived size
  │   └── dawn-768x302.webp
  └── png_q16_aft_resize/

Profiles: PNG palettes resized with or after quantisation, JPEG and WebP
quality levels. The thumbnail is never rebuilt.

Set RUST_LOG=debug to see every ImageMagick command.
Run 'media-squeeze gen-config' to generate a documented media-squeeze.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sizes WordPress generates for an image or a WxH pair
    Sizes {
        /// Image file, or dimensions such as 1080x424
        source: String,
        /// Fold the thumbnail into a single sorted list
        #[arg(long)]
        combined: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate candidates, choose one, and print the replacement plan
    Explore {
        /// Source image (png, jpg, jpeg or webp)
        image: PathBuf,
        #[command(flatten)]
        formats: FormatArgs,
        /// Keep every candidate directory after choosing
        #[arg(long)]
        keep_all: bool,
        /// File name stem of the image on the server (defaults to the source stem)
        #[arg(long)]
        remote_stem: Option<String>,
    },
    /// Print a stock media-squeeze.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Sizes {
            source,
            combined,
            json,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let (dimensions, derived) = match source.parse::<Dimensions>() {
                Ok(dimensions) => (dimensions, derive_sizes(dimensions, &cfg.sizes)),
                Err(_) => {
                    let backend = MagickBackend::new();
                    let inspected =
                        explore::inspect_source(&backend, Path::new(&source), &cfg.sizes)?;
                    (inspected.dimensions, inspected.derived)
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&derived)?);
            } else {
                output::print_sizes(&source, dimensions, &derived, combined);
            }
        }
        Command::Explore {
            image,
            formats,
            keep_all,
            remote_stem,
        } => {
            let mut cfg = config::load_config(&cli.config)?;
            formats.apply(&mut cfg.formats);
            cfg.validate()?;
            init_thread_pool(&cfg.processing);

            let backend = MagickBackend::new();
            let source = explore::inspect_source(&backend, &image, &cfg.sizes)?;
            let recipes = recipes::build_recipes(&cfg.formats, &cfg.quality);
            for line in output::format_explore_header(&source, recipes.len(), &cfg.work_dir) {
                println!("{}", line);
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_explore_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let exploration = explore::explore(&backend, source, &recipes, &cfg.work_dir, Some(tx))?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            let manifest_path = cfg.work_dir.join("candidates.json");
            let json = serde_json::to_string_pretty(&exploration)?;
            std::fs::write(&manifest_path, json)?;

            println!();
            output::print_review(&select::review_entries(&exploration));
            println!();

            let stdin = std::io::stdin();
            let choice = select::choose_candidate(
                &exploration.candidates,
                &mut stdin.lock(),
                &mut std::io::stdout(),
            )?;
            let chosen = &exploration.candidates[choice];

            let removed = if keep_all {
                Vec::new()
            } else {
                select::discard_others(&exploration.candidates, choice)?
            };
            for line in output::format_discarded(&removed, &exploration.work_dir) {
                println!("{}", line);
            }

            let remote_stem = remote_stem.unwrap_or_else(|| exploration.source.stem.clone());
            let plan = publish::plan_replacement(chosen, &exploration.source, &remote_stem)?;
            output::print_plan(chosen, &plan, plan.total_bytes()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
