use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prodpaths::{manifest, ConflictPolicy, MatchOptions, PathIndex, ProductRecord, Registry};
use std::path::{Path, PathBuf};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "prodpaths")]
#[command(version, about = "Find which registered product directory owns a file path")]
struct Cli {
    /// Increase logging verbosity (use together with RUST_LOG for fine control).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Compare paths case-insensitively.
    #[arg(long, global = true)]
    ignore_case: bool,

    /// Path separator used for boundary checks.
    #[arg(long, default_value_t = prodpaths::DEFAULT_SEPARATOR, global = true)]
    separator: char,

    /// On a path conflict keep the newly registered product instead of a placeholder.
    #[arg(long, global = true)]
    keep_new: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register the built-in sample products and run the sample lookups
    Demo,

    /// Print registered paths, longest first
    List {
        /// Registration list (KEY|NAME|VERSION|PATH per line)
        #[arg(long)]
        manifest: PathBuf,
    },

    /// Find the owning product for each path
    Find {
        /// Registration list (KEY|NAME|VERSION|PATH per line)
        #[arg(long)]
        manifest: PathBuf,

        /// One or more file paths to look up
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

const DEMO_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("AAAA", "Product 1", "1.00.0000", r"C:\Program Files"),
    ("BBBB", "Another Product", "2.1.1", r"C:\RootFolder\TestProduct"),
    ("CCCC", "Test 3", "3.0.11", r"C:\Program Files\My Company\My Product\"),
    ("DDDD", "Product 4", "4.0.0", r"C:\Program Files"),
];

const DEMO_LOOKUPS: &[&str] = &[
    r"C:\NotFound\test0.exe",
    r"C:\Program Files\My Company\My Product\test1.exe",
    r"C:\RootFolder\TestProduct\bin\test.exe",
    r"C:\Program Files\Hello World\bin\test2.exe",
    r"C:\Program Files\unknown path\test3.exe",
];

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let options = MatchOptions::default()
        .ignore_case(cli.ignore_case)
        .with_separator(cli.separator);
    let policy = ConflictPolicy::from_placeholder_flag(!cli.keep_new);
    let registry = Registry::with_options(options).conflict_policy(policy);

    tracing::debug!(?options, ?policy, "registry configured");

    match cli.cmd {
        Command::Demo => {
            let index = load_demo(registry)?;
            print_entries(&index);
            for path in DEMO_LOOKUPS {
                print_lookup(&index, path);
            }
            Ok(())
        }

        Command::List { manifest } => {
            let index = load_manifest(registry, &manifest)?;
            print_entries(&index);
            Ok(())
        }

        Command::Find { manifest, paths } => {
            let index = load_manifest(registry, &manifest)?;
            for path in &paths {
                print_lookup(&index, path);
            }
            Ok(())
        }
    }
}

fn load_demo(mut registry: Registry) -> Result<PathIndex> {
    for &(key, name, version, path) in DEMO_PRODUCTS {
        registry
            .insert(ProductRecord::new(key, name, version), path)
            .with_context(|| format!("Failed to register {key} at {path}"))?;
    }
    Ok(registry.finalize())
}

fn load_manifest(mut registry: Registry, path: &Path) -> Result<PathIndex> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let conflicts = manifest::load_into(&mut registry, &text)
        .with_context(|| format!("Invalid manifest {}", path.display()))?;

    tracing::info!(
        manifest = %path.display(),
        entries = registry.len(),
        conflicts,
        "manifest loaded"
    );

    Ok(registry.finalize())
}

fn print_entries(index: &PathIndex) {
    for e in index.entries() {
        println!("Entry path: {}, has multiple: {}", e.path(), e.has_conflict());
    }
}

fn print_lookup(index: &PathIndex, path: &str) {
    match index.find(path) {
        Some(m) => println!("Found: {}, has multiple: {}", m.product.key(), m.has_conflict),
        None => println!("Nothing found for '{}'", path),
    }
}
