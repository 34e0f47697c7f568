//! pdfsmith - Merge, split, convert and lock PDF files.
//!
//! Command-line front end over the pdfsmith library.

mod cli;

use std::io::Write;
use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use pdfsmith::config::{Config, OutputFormat, OverwriteMode};
use pdfsmith::error::{PdfSmithError, Result};
use pdfsmith::io::{PdfWriter, load_inputs};
use pdfsmith::ops::{self, OperationKind};
use pdfsmith::output::{
    Destination, OutputFormatter, OutputReport, Presenter, TextPresenter, create_presenter,
};
use pdfsmith::request::{
    Credential, DeleteRequest, EncryptRequest, ExtractRequest, ImagesRequest, InputFile,
    MergeRequest, Request,
};
use pdfsmith::selection::PageSelection;
use pdfsmith::utils::collect_paths_for_patterns;
use pdfsmith::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", TextPresenter::default().render_error(&err));
            process::exit(err.exit_code());
        }
    };
    let presenter = create_presenter(&config);

    if let Err(err) = run(cli.command, &config, presenter.as_ref()).await {
        eprintln!("{}", presenter.render_error(&err));
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Status lines share stdout with JSON and streamed documents, so they are
/// silenced whenever stdout carries data.
fn status_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::new(
        config.quiet || config.to_stdout || config.format == OutputFormat::Json,
        config.verbose,
    )
}

fn emit(rendered: String) {
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

/// Main application logic.
async fn run(command: Command, config: &Config, presenter: &dyn Presenter) -> Result<()> {
    let formatter = status_formatter(config);

    match command {
        Command::List => {
            emit(presenter.list_operations(&OperationKind::ALL));
            Ok(())
        }
        Command::Info { inputs } => {
            let validator = Validator::new();
            let paths = collect_paths_for_patterns(&inputs)?;
            validator.validate_paths(&paths, OperationKind::Merge).await?;

            for file in load_inputs(&paths, config.effective_jobs()).await? {
                emit(presenter.render_input(&validator.inspect(&file)?));
            }
            Ok(())
        }
        command => {
            let request = build_request(command, config).await?;
            run_operation(request, config, presenter, &formatter).await
        }
    }
}

/// Validate arguments and read inputs into a request.
///
/// Everything the user can get wrong without touching a file (empty
/// password, malformed page list) is rejected before any input is read.
async fn build_request(command: Command, config: &Config) -> Result<Request> {
    let validator = Validator::new();
    let jobs = config.effective_jobs();

    match command {
        Command::Merge { inputs } => {
            let paths = collect_paths_for_patterns(&inputs)?;
            validator.validate_paths(&paths, OperationKind::Merge).await?;
            let files = load_inputs(&paths, jobs).await?;
            Ok(Request::Merge(MergeRequest { files }))
        }
        Command::Extract { input, pages } => {
            let selection = PageSelection::parse(&pages)?;
            validator.validate_path(&input, OperationKind::Extract).await?;
            let file = InputFile::from_path(&input).await?;
            Ok(Request::Extract(ExtractRequest { file, selection }))
        }
        Command::Delete { input, pages } => {
            let selection = PageSelection::parse(&pages)?;
            validator.validate_path(&input, OperationKind::Delete).await?;
            let file = InputFile::from_path(&input).await?;
            Ok(Request::Delete(DeleteRequest { file, selection }))
        }
        Command::Images { inputs } => {
            let paths = collect_paths_for_patterns(&inputs)?;
            validator.validate_paths(&paths, OperationKind::Images).await?;
            let images = load_inputs(&paths, jobs).await?;
            Ok(Request::Images(ImagesRequest { images }))
        }
        Command::Lock { input, password } => {
            let credential = resolve_credential(password, prompt_password)?;
            validator.validate_path(&input, OperationKind::Encrypt).await?;
            let file = InputFile::from_path(&input).await?;
            Ok(Request::Encrypt(EncryptRequest { file, credential }))
        }
        Command::List | Command::Info { .. } => Err(PdfSmithError::invalid_config(
            "This command does not produce a document",
        )),
    }
}

async fn run_operation(
    request: Request,
    config: &Config,
    presenter: &dyn Presenter,
    formatter: &OutputFormatter,
) -> Result<()> {
    let kind = request.kind();
    let output_path = config.output_path(kind);
    let writer = PdfWriter::new();

    if !config.dry_run && !config.to_stdout {
        writer.can_write(&output_path).await?;
        handle_output_overwrite(
            &output_path,
            config.overwrite_mode,
            config.quiet,
            confirm_overwrite,
        )
        .await?;
    }

    formatter.info(&format!(
        "{}: {} input file(s)...",
        kind.title(),
        request.files().len()
    ));

    let artifact = ops::execute_blocking(request, config.write_options()).await?;

    let destination = if config.dry_run {
        Destination::None
    } else if config.to_stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&artifact.bytes)
            .and_then(|()| stdout.flush())
            .map_err(|source| PdfSmithError::Io { source })?;
        Destination::Stdout
    } else {
        let stats = writer.save(&artifact, config.output_dir()).await?;
        formatter.detail(
            "Write time",
            &format!("{:.2}s", stats.write_time.as_secs_f64()),
        );
        Destination::File {
            path: stats.output_path,
        }
    };

    emit(presenter.render_output(&OutputReport::new(&artifact, destination)));
    Ok(())
}

/// Handle output file overwrite scenarios.
///
/// `quiet` comes from the config, not the status formatter: JSON output
/// silences status lines but the prompt still goes to stderr.
async fn handle_output_overwrite<F>(
    output: &Path,
    mode: OverwriteMode,
    quiet: bool,
    confirm: F,
) -> Result<()>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    if !PdfWriter::new().exists(output).await {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfSmithError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask; treat as no-clobber
            if quiet {
                return Err(PdfSmithError::output_exists(output.to_path_buf()));
            }

            if confirm(output)? {
                Ok(())
            } else {
                Err(PdfSmithError::Cancelled)
            }
        }
    }
}

/// Ask on stderr whether `output` may be replaced.
fn confirm_overwrite(output: &Path) -> Result<bool> {
    eprint!(
        "Output file already exists: {}\nOverwrite? [y/N]: ",
        output.display()
    );
    std::io::stderr().flush().ok();

    let mut response = String::new();
    std::io::stdin()
        .read_line(&mut response)
        .map_err(|err| PdfSmithError::other(format!("Failed to read input: {err}")))?;

    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Use the supplied password, or ask for one with echo off.
fn resolve_credential<F>(supplied: Option<String>, prompt: F) -> Result<Credential>
where
    F: FnOnce() -> std::io::Result<String>,
{
    let password = match supplied {
        Some(password) => password,
        None => prompt()
            .map_err(|err| PdfSmithError::other(format!("Failed to read password: {err}")))?,
    };
    Credential::new(password)
}

fn prompt_password() -> std::io::Result<String> {
    rpassword::prompt_password("Password: ")
}
