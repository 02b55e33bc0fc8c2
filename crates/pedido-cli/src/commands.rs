//! Command handlers

use crate::cli::{Cli, Commands};
use crate::logging::init_logging;
use crate::output::{output_batch, print_failures};
use indicatif::{ProgressBar, ProgressStyle};
use pedido_app::app::extract_batch;
use pedido_app::config::Config;
use pedido_app::export::export_batch;
use pedido_app::scanner::collect_inputs;
use pedido_domain::service::BatchExtraction;
use pedido_infra::XmlOrderLoader;
use pedido_types::{ExportFormat, OutputFormat, Result};
use std::path::PathBuf;
use tracing::info;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // A broken config file must not block `config --reset`
    let config = match Config::load() {
        Ok(config) => config,
        Err(_) if matches!(cli.command, Commands::Config { reset: true, .. }) => Config::default(),
        Err(e) => return Err(e),
    };
    init_logging(&config.log_level, cli.verbose);

    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Extract {
            inputs,
            output,
            export,
            no_export,
            tag,
        } => {
            let export_format = export.unwrap_or(config.export_format);
            let output_path = output.unwrap_or_else(|| config.default_export_path(export_format));
            let target = if no_export {
                None
            } else {
                Some((export_format, output_path))
            };
            cmd_extract(&config, &inputs, tag, export_format, target, output_format)
        }

        Commands::Summary { inputs, tag } => cmd_summary(&config, &inputs, tag, output_format),

        Commands::Config {
            show,
            set_order_tag,
            set_export,
            set_output,
            set_output_dir,
            set_delimiter,
            reset,
        } => cmd_config(
            config,
            show,
            set_order_tag,
            set_export,
            set_output,
            set_output_dir,
            set_delimiter,
            reset,
        ),
    }
}

/// Scan inputs and run every file through the loader
fn run_batch(
    config: &Config,
    inputs: &[PathBuf],
    tag: Option<String>,
    output_format: OutputFormat,
) -> Result<BatchExtraction> {
    let files = collect_inputs(inputs)?;
    let loader = XmlOrderLoader::new(tag.unwrap_or_else(|| config.order_tag.clone()));
    info!(files = files.len(), order_tag = loader.order_tag(), "starting batch");

    // Progress only for interactive multi-file runs
    let pb = if files.len() > 1 && output_format == OutputFormat::Table {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let batch = extract_batch(&loader, &files, |path| {
        if let Some(ref pb) = pb {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            pb.set_message(filename);
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    print_failures(&batch.failures);
    Ok(batch)
}

fn cmd_extract(
    config: &Config,
    inputs: &[PathBuf],
    tag: Option<String>,
    layout: ExportFormat,
    target: Option<(ExportFormat, PathBuf)>,
    output_format: OutputFormat,
) -> Result<()> {
    let batch = run_batch(config, inputs, tag, output_format)?;

    output_batch(output_format, &batch, layout, true)?;
    if !batch.has_data() {
        return Ok(());
    }

    if let Some((export_format, path)) = target {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        export_batch(&batch, export_format, &path, config.csv_delimiter_byte())?;
        info!(path = %path.display(), format = %export_format, "export written");
        eprintln!("Exported to: {}", path.display());
    }

    Ok(())
}

fn cmd_summary(
    config: &Config,
    inputs: &[PathBuf],
    tag: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let batch = run_batch(config, inputs, tag, output_format)?;
    output_batch(output_format, &batch, config.export_format, false)
}

fn cmd_config(
    mut config: Config,
    show: bool,
    set_order_tag: Option<String>,
    set_export: Option<ExportFormat>,
    set_output: Option<OutputFormat>,
    set_output_dir: Option<PathBuf>,
    set_delimiter: Option<char>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut modified = false;

    if let Some(order_tag) = set_order_tag {
        config.order_tag = order_tag;
        modified = true;
    }

    if let Some(export_format) = set_export {
        config.export_format = export_format;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(output_dir) = set_output_dir {
        config.output_dir = Some(output_dir);
        modified = true;
    }

    if let Some(delimiter) = set_delimiter {
        config.csv_delimiter = delimiter;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
