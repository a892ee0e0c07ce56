//! pdfmerge - Merge PDF files into a single document from the command line.

use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tokio::runtime::Handle;

use pdfmerge::cli::Cli;
use pdfmerge::config::{Config, OverwriteMode};
use pdfmerge::merge::{JobEvent, JobFailure, Merger};
use pdfmerge::output::{OutputFormatter, ProgressBar, ProgressStyle, display_plan, display_report};
use pdfmerge::utils::open_in_default_app;
use pdfmerge::{Error, Session};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if let Err(err) = run(cli).await {
        OutputFormatter::default().error(&format!("Error: {err}"));
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), JobFailure> {
    cli.validate()?;

    let inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(inputs)?;
    let formatter = OutputFormatter::from_config(&config);

    let mut session = Session::new(Handle::current());
    session.add_files(config.inputs.iter().cloned())?;
    if config.sort {
        session.sort_by_path()?;
    }
    log::debug!("{}", session.status());

    if config.dry_run {
        return dry_run(&config, &formatter, &session).await;
    }

    handle_output_overwrite(&config, &formatter)?;

    let total = session.files().len();
    formatter.info(&format!("Merging {total} PDF files..."));

    // Per-file details replace the bar in verbose mode
    let mut progress = if config.should_print() && !formatter.is_verbose() {
        ProgressBar::new(total, ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };
    let details = formatter.clone();

    let handle = session.start_merge(&config.output, move |event| match event {
        JobEvent::Started { .. } => {}
        JobEvent::Progress(p) => {
            details.debug(&format!(
                "[{}/{}] {} ({} pages)",
                p.index,
                p.total,
                p.path.display(),
                p.pages
            ));
            progress.set_message(p.display_name());
            progress.update(p.index);
        }
        JobEvent::Writing => {
            progress.finish();
            details.debug("Writing merged PDF...");
        }
        JobEvent::Finished(job) => {
            if job.failure().is_some() {
                progress.clear();
            }
        }
    })?;

    let job = handle.wait().await;
    session.record(job.clone());
    let report = job.into_result()?;

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| Error::io(&config.output, io::Error::from(e)))?;
        println!("{json}");
    } else {
        display_report(&formatter, &report);
    }

    if config.open_after
        && let Err(err) = open_in_default_app(&report.output_path)
    {
        formatter.warning(&format!(
            "Could not open {}: {err}",
            report.output_path.display()
        ));
    }

    Ok(())
}

/// Check every input and print the plan without writing anything.
async fn dry_run(
    config: &Config,
    formatter: &OutputFormatter,
    session: &Session,
) -> Result<(), JobFailure> {
    formatter.info("DRY RUN MODE - No files will be created");

    let paths = session.files().paths();
    let plan = tokio::task::spawn_blocking(move || Merger::new().plan(&paths))
        .await
        .map_err(|e| Error::io(&config.output, io::Error::other(e)))??;

    if config.json {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| Error::io(&config.output, io::Error::from(e)))?;
        println!("{json}");
        return Ok(());
    }

    display_plan(formatter, &plan);
    formatter.success("Dry run completed successfully");
    formatter.info(&format!("  Output would be: {}", config.output.display()));
    formatter.info("  Run without --dry-run to create the merged PDF");

    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<(), Error> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(Error::output_exists(&config.output)),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode
            if formatter.is_quiet() {
                return Err(Error::output_exists(&config.output));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));
            if confirm("Overwrite? [y/N]: ")? {
                Ok(())
            } else {
                Err(Error::Cancelled)
            }
        }
    }
}

fn confirm(prompt: &str) -> Result<bool, Error> {
    print!("{prompt}");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|e| Error::io(Path::new("<stdin>"), e))?;

    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
