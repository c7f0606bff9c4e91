use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::LevelFilter;

use card_unmatte::{
    default_output_path, process_directory, process_file, OutputFormat, ProcessOptions,
    ProcessResult,
};

#[derive(Parser)]
#[command(
    name = "card-unmatte",
    about = "Turn white card backgrounds into alpha transparency",
    version,
    after_help = "Directory usage: card-unmatte <input_dir> -o <output_dir>\n\
                  Only files whose name before the first '.' has two characters \
                  (e.g. AS.webp, 10.png) are converted."
)]
struct Cli {
    /// Input image file or directory of card images
    input: String,

    /// Output file or directory (default for files: {name}_transparent.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Output container format
    #[arg(long, value_enum, default_value_t = OutputFormat::WebP)]
    format: OutputFormat,

    /// Stop at the first file that fails to convert
    #[arg(long)]
    fail_fast: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let opts = ProcessOptions {
        format: cli.format,
        fail_fast: cli.fail_fast,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: card-unmatte <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path, opts.format),
        };
        vec![process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if input_path.is_dir() && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Converted: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if !result.success {
        eprintln!("[FAIL] {filename}: {}", result.message);
        return;
    }
    if opts.quiet {
        return;
    }

    match &result.output {
        Some(out) if opts.verbose => eprintln!("[OK] {filename} -> {}", out.display()),
        _ => eprintln!("[OK] {filename}"),
    }
}
