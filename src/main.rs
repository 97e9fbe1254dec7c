use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use blend::{
    merge_for_output, OsFileSystem, Resource, SearchConfiguration, SearchMode, SearchResolver,
};
use clap::Parser;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rustc_hash::FxHashMap;
use tracing_subscriber::EnvFilter;

/// Merges the files named by `require` directives into the files that require them.
///
/// Without FILES, every script and stylesheet under the search paths that
/// requires something is merged.
#[derive(Debug, Parser)]
#[command(name = "blend", version)]
struct Cli {
    /// Directory searched for required files; repeat to search several, in order.
    #[arg(short, long = "environment", env = "BLEND_ENVIRONMENT", value_delimiter = ',')]
    environment: Vec<PathBuf>,

    /// Do not search the current directory after the other search paths.
    #[arg(short, long)]
    skip_cwd: bool,

    /// Where merged files are written. Never searched for inputs.
    #[arg(short, long, env = "BLEND_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Look up "local" requirements only below the requiring file's directory.
    #[arg(long)]
    subtree_local: bool,

    /// More logging; repeat for more. RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    files: Vec<PathBuf>,
}

impl Cli {
    fn search_configuration(&self) -> anyhow::Result<SearchConfiguration> {
        let mut roots = self.environment.clone();
        if !self.skip_cwd {
            roots.push(env::current_dir().context("reading the current directory")?);
        }
        let mode = if self.subtree_local {
            SearchMode::Subtree
        } else {
            SearchMode::Ranked
        };
        Ok(SearchConfiguration::new(roots)
            .with_output_dir(&self.output)
            .with_mode(mode))
    }
}

fn init_logging(verbose: u8) {
    let filter = if env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every root merged.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let resolver = SearchResolver::new(OsFileSystem::default(), cli.search_configuration()?);
    let roots = if cli.files.is_empty() {
        resolver.find_all_processable()
    } else {
        cli.files
            .iter()
            .map(|path| resolver.open(path))
            .collect::<Result<Vec<_>, _>>()?
    };
    let roots = roots
        .into_iter()
        .filter(|resource| resource.has_requirements())
        .collect::<Vec<_>>();
    tracing::info!(count = roots.len(), "merging resources");
    for name in colliding_output_names(&roots) {
        tracing::warn!(
            output = %cli.output.join(name).display(),
            "several resources share this output file, only one merge will remain"
        );
    }

    let failures = roots
        .par_iter()
        .filter_map(|resource| match write_merged(resource, &resolver, &cli.output) {
            Ok(()) => None,
            Err(err) => {
                eprintln!("error: {}: {err:#}", resource.path().display());
                Some(())
            }
        })
        .count();
    Ok(failures == 0)
}

fn write_merged(
    resource: &Arc<Resource>,
    resolver: &SearchResolver<OsFileSystem>,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let merged = merge_for_output(resource, resolver)?;
    let file_name = resource
        .path()
        .file_name()
        .context("resource path has no file name")?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let output_path = output_dir.join(file_name);
    fs::write(&output_path, &merged)
        .with_context(|| format!("writing {}", output_path.display()))?;
    tracing::info!("{}", size_summary(&output_path, &merged));
    Ok(())
}

/// File names written by more than one root, sorted.
fn colliding_output_names(roots: &[Arc<Resource>]) -> Vec<&OsStr> {
    let file_names = || roots.iter().filter_map(|resource| resource.path().file_name());
    let mut counts = FxHashMap::<&OsStr, usize>::default();
    for file_name in file_names() {
        *counts.entry(file_name).or_default() += 1;
    }
    let mut colliding = file_names()
        .filter(|file_name| counts[file_name] > 1)
        .collect::<Vec<_>>();
    colliding.sort_unstable();
    colliding.dedup();
    colliding
}

fn size_summary(path: &Path, content: &str) -> String {
    let lines = content.split('\n').count();
    let characters = content.chars().filter(|&c| c != '\n').count();
    format!(
        "{}: {characters} characters in {lines} {} for {} bytes",
        path.display(),
        if lines == 1 { "line" } else { "lines" },
        content.len()
    )
}
