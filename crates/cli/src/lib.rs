use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use flatscript_composer::{CSharpDocument, GeneratorConfig, ScriptGenerator, UnstitchedPolicy};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod scanner;

use scanner::expand_inputs;

#[derive(Parser)]
#[command(name = "flatscript")]
#[command(about = "Flatten C# sources into a single script file", long_about = None)]
#[command(version)]
struct Cli {
    /// Source files or directories; directories contribute their *.cs files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write the script here instead of stdout (a directory with --each)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Class whose members form the script body
    #[arg(long)]
    program_class: Option<String>,

    /// Visual width of a tab when measuring indentation
    #[arg(long)]
    tab_width: Option<usize>,

    /// Handling of extension content that cannot be stitched
    #[arg(long, value_enum)]
    unstitched: Option<UnstitchedArg>,

    /// Do not fold adjacent comments into declarations
    #[arg(long)]
    no_comments: bool,

    /// Treat every input as a separate document
    #[arg(long, requires = "output")]
    each: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnstitchedArg {
    Drop,
    Fail,
    Append,
}

impl From<UnstitchedArg> for UnstitchedPolicy {
    fn from(arg: UnstitchedArg) -> Self {
        match arg {
            UnstitchedArg::Drop => Self::Drop,
            UnstitchedArg::Fail => Self::Fail,
            UnstitchedArg::Append => Self::Append,
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(&cli)?;
    let generator = Arc::new(ScriptGenerator::new(config)?);

    if cli.each {
        run_each(&cli, generator).await
    } else {
        run_single(&cli, &generator).await
    }
}

fn resolve_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(name) = &cli.program_class {
        config.program_class = name.clone();
    }
    if let Some(width) = cli.tab_width {
        config.tab_width = width;
    }
    if let Some(policy) = cli.unstitched {
        config.unstitched_extension = policy.into();
    }

    Ok(config)
}

fn load_document(inputs: &[PathBuf], attach_comments: bool) -> Result<CSharpDocument> {
    let paths = expand_inputs(inputs);
    if paths.is_empty() {
        bail!("No C# sources found in the given inputs");
    }

    let doc = CSharpDocument::from_paths(&paths)
        .context("Failed to read sources")?
        .with_comments(attach_comments);
    log::info!("Flattening {} fragment(s)", doc.fragments().len());
    Ok(doc)
}

async fn run_single(cli: &Cli, generator: &ScriptGenerator) -> Result<()> {
    let doc = load_document(&cli.inputs, !cli.no_comments)?;
    let script = generator.generate(&doc).await?;

    match &cli.output {
        Some(path) => write_script(path, &script),
        None => print_stdout(&script),
    }
}

async fn run_each(cli: &Cli, generator: Arc<ScriptGenerator>) -> Result<()> {
    let Some(out_dir) = cli.output.clone() else {
        bail!("--each requires --output <DIR>");
    };
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut tasks = Vec::with_capacity(cli.inputs.len());
    for input in &cli.inputs {
        let doc = load_document(std::slice::from_ref(input), !cli.no_comments)?;
        let target = out_dir.join(script_file_name(input));
        let generator = Arc::clone(&generator);
        let input = input.clone();

        tasks.push(tokio::spawn(async move {
            let script = generator
                .generate(&doc)
                .await
                .with_context(|| format!("Failed to flatten {}", input.display()))?;
            write_script(&target, &script)
        }));
    }

    for task in tasks {
        task.await.context("Generation task panicked")??;
    }

    Ok(())
}

/// `<stem>.script.cs` for a file, `<dir name>.script.cs` for a directory
fn script_file_name(input: &Path) -> String {
    let stem = if input.is_dir() {
        input.file_name()
    } else {
        input.file_stem()
    };
    let stem = stem
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "script".to_string());
    format!("{stem}.script.cs")
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    fs::write(path, script).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), script.len());
    Ok(())
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}
