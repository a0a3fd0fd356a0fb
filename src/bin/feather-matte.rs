use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use feather_matte::{
    default_output_path, is_supported_image, load_mask, save_matte, FeatherConfig, FeatherEngine,
};

#[derive(Parser)]
#[command(
    name = "feather-matte",
    about = "Turn binary segmentation masks into smooth anti-aliased opacity mattes",
    version,
    after_help = "Simple usage: feather-matte mask.png  (writes mask_matte.png)\n\n\
                  Input images are thresholded at 50% luma; the output is an\n\
                  8-bit grayscale matte (0 = transparent, 255 = opaque)."
)]
struct Cli {
    /// Input mask image or directory of masks
    input: String,

    /// Output file or directory (default: {name}_matte.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Feathering method: none, linear, exponential, cosine, sigmoid,
    /// ease_out_power, ease_out_exp
    #[arg(short, long, default_value = "ease_out_power")]
    method: String,

    /// Feather width in pixels
    #[arg(short, long, default_value = "10.0")]
    width: f32,

    /// Boundary cleanup radius in pixels (0 disables cleanup)
    #[arg(short = 'r', long, default_value = "4")]
    clean_radius: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

struct FileResult {
    path: PathBuf,
    outcome: Result<PathBuf, String>,
}

fn main() {
    let cli = Cli::parse();

    let config = FeatherConfig {
        method: cli.method,
        width: cli.width,
        clean_radius: cli.clean_radius,
    };

    let engine = FeatherEngine::new();
    if let Err(e) = engine.registry().lookup(&config.method) {
        eprintln!("Error: {e}");
        eprintln!(
            "Available methods: {}",
            engine.registry().method_ids().join(", ")
        );
        process::exit(1);
    }
    if !(config.width.is_finite() && config.width > 0.0) {
        eprintln!("Error: Feather width must be a positive number");
        process::exit(1);
    }

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if cli.verbose && !cli.quiet {
        eprintln!(
            "Feathering with method={}, width={}px, cleanup radius={}px",
            config.method, config.width, config.clean_radius
        );
    }

    let results = if input_path.is_dir() {
        let Some(output_dir) = cli.output.as_deref().map(PathBuf::from) else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: feather-matte <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(&engine, &config, input_path, &output_dir)
    } else {
        let output_path = cli
            .output
            .as_deref()
            .map_or_else(|| default_output_path(input_path), PathBuf::from);
        vec![process_file(&engine, &config, input_path, &output_path)]
    };

    let mut ok_count = 0u32;
    let mut fail_count = 0u32;
    for r in &results {
        let filename = r.path.file_name().map_or_else(
            || r.path.display().to_string(),
            |f| f.to_string_lossy().to_string(),
        );
        match &r.outcome {
            Ok(out) => {
                ok_count += 1;
                if !cli.quiet {
                    eprintln!("[OK] {filename} -> {}", out.display());
                }
            }
            Err(msg) => {
                fail_count += 1;
                eprintln!("[FAIL] {filename}: {msg}");
            }
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprintln!(
            "[Summary] Processed: {ok_count}, Failed: {fail_count} (Total: {})",
            results.len()
        );
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn process_file(
    engine: &FeatherEngine,
    config: &FeatherConfig,
    input: &Path,
    output: &Path,
) -> FileResult {
    FileResult {
        path: input.to_path_buf(),
        outcome: feather_file(engine, config, input, output),
    }
}

fn feather_file(
    engine: &FeatherEngine,
    config: &FeatherConfig,
    input: &Path,
    output: &Path,
) -> Result<PathBuf, String> {
    let mask = load_mask(input).map_err(|e| format!("Failed to load: {e}"))?;
    let matte = engine
        .generate_alpha(&mask, config)
        .map_err(|e| e.to_string())?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create output directory: {e}"))?;
        }
    }
    save_matte(&matte, output).map_err(|e| format!("Failed to save: {e}"))?;
    Ok(output.to_path_buf())
}

fn process_directory(
    engine: &FeatherEngine,
    config: &FeatherConfig,
    input_dir: &Path,
    output_dir: &Path,
) -> Vec<FileResult> {
    use rayon::prelude::*;

    let entries: Vec<_> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|e| is_supported_image(e.path().as_path()))
            .collect(),
        Err(e) => {
            return vec![FileResult {
                path: input_dir.to_path_buf(),
                outcome: Err(format!("Failed to read directory: {e}")),
            }];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![FileResult {
                path: output_dir.to_path_buf(),
                outcome: Err(format!("Failed to create output directory: {e}")),
            }];
        }
    }

    entries
        .par_iter()
        .map(|entry| {
            let input_path = entry.path();
            let output_path = output_dir.join(default_output_path(&input_path).file_name().unwrap());
            process_file(engine, config, &input_path, &output_path)
        })
        .collect()
}
