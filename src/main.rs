//! Stagehand CLI - client library synthesis runner
//!
//! Usage: stagehand <COMMAND>
//!
//! Commands:
//!   postprocess  Detach staged generator output and apply repo templates
//!   generate     Run the generator for the configured service, then fix up

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use stagehand::config::{Config, ConfigWarning};
use stagehand::generator::{BazelGenerator, ClientGenerator, GeneratorRequest};
use stagehand::staging::StagingArea;
use stagehand::templates::TemplateSet;
use stagehand::{metadata, StagehandError};

/// Stagehand - client library synthesis runner and staging post-processor
#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detach staged generator output into the repo and apply templates
    Postprocess {
        /// Repository root to act on
        #[arg(short, long, default_value = ".")]
        repo_root: PathBuf,

        /// Template source directory (overrides config)
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,
    },

    /// Build the configured service client, apply templates, relocate metadata
    Generate {
        /// Repository root to act on
        #[arg(short, long, default_value = ".")]
        repo_root: PathBuf,

        /// Template source directory (overrides config)
        #[arg(long)]
        templates: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Postprocess {
            ref repo_root,
            ref templates,
            dry_run,
        } => cmd_postprocess(repo_root, templates.as_deref(), dry_run, cli.json, cli.verbose),
        Commands::Generate {
            ref repo_root,
            ref templates,
        } => cmd_generate(repo_root, templates.as_deref(), cli.json, cli.verbose),
    }
}

fn print_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            let event = serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "file": warning.file.display().to_string(),
            });
            println!("{}", event);
        } else {
            eprintln!(
                "⚠ Unknown config key '{}' in {}",
                warning.key,
                warning.file.display()
            );
        }
    }
}

/// Resolve the template source directory against the repo root.
fn template_source(repo_root: &Path, configured: &Path, override_: Option<&Path>) -> PathBuf {
    let source = override_.unwrap_or(configured);
    if source.is_absolute() {
        source.to_path_buf()
    } else {
        repo_root.join(source)
    }
}

fn cmd_postprocess(
    repo_root: &Path,
    templates: Option<&Path>,
    dry_run: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let (config, warnings) = Config::load_or_default(repo_root)?;
    print_config_warnings(&warnings, json);

    if !json {
        println!("📦 Stagehand Postprocess");
        println!("Repo: {}", repo_root.display());
        if dry_run {
            println!("Mode: Dry run");
        }
    }

    let area = StagingArea::new(repo_root.join(&config.staging.root));
    let libraries = area.libraries()?;

    if !json {
        println!(
            "\n✓ Found {} staged libraries in {}",
            libraries.len(),
            config.staging.root.display()
        );
        if verbose > 0 {
            for library in &libraries {
                println!("  - {}/{}", library.version, library.name);
            }
        }
    }

    let detached = area.detach(repo_root, &config.staging.stray_files, dry_run)?;

    if !json {
        for path in &detached.stray_removed {
            println!("  ✗ Removed stray file: {}", path.display());
        }
        for (name, dest) in &detached.moved {
            println!("  → {} => {}", name, dest.display());
        }
    }

    let source = template_source(repo_root, &config.templates.source, templates);
    let set = TemplateSet::load(&source, &config.postprocess.excludes)?;
    let applied = set.apply(repo_root, dry_run)?;

    if json {
        let event = serde_json::json!({
            "event": "postprocess",
            "status": "success",
            "dry_run": dry_run,
            "moved": detached.moved.len(),
            "stray_removed": detached.stray_removed.len(),
            "templates_written": applied.written.len(),
            "templates_unchanged": applied.unchanged.len(),
            "templates_excluded": applied.excluded.len(),
        });
        println!("{}", event);
    } else {
        println!("\n📊 Postprocess Results:");
        println!("  ✓ Moved: {} libraries", detached.moved.len());
        println!(
            "  ✓ Templates: {} written, {} unchanged, {} excluded",
            applied.written.len(),
            applied.unchanged.len(),
            applied.excluded.len()
        );
        if verbose > 0 {
            for path in &applied.written {
                println!("    + {}", path.display());
            }
            for path in &applied.excluded {
                println!("    - {} (excluded)", path.display());
            }
        }
        println!();
    }

    Ok(())
}

fn cmd_generate(
    repo_root: &Path,
    templates: Option<&Path>,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let (config, warnings) = Config::load_or_default(repo_root)?;
    print_config_warnings(&warnings, json);

    let request = GeneratorRequest::from_config(&config.generate);

    if !json {
        println!("🛠 Stagehand Generate");
        println!("Repo: {}", repo_root.display());
        println!("Service: {} {}", request.service, request.version);
        println!("Proto path: {}", request.proto_path);
        if verbose > 0 {
            println!("Target: {}", request.bazel_target);
        }
    }

    let generator = BazelGenerator::new(&config.generate.command).quiet(json);
    if !generator.is_available() {
        return Err(StagehandError::GeneratorUnavailable {
            command: config.generate.command.clone(),
        }
        .into());
    }

    generator.generate(repo_root, &request)?;

    let expected = repo_root.join(&config.generate.expected_output);
    if !expected.is_dir() {
        return Err(StagehandError::MissingOutput { path: expected }.into());
    }

    if !json {
        println!("\n✓ Generated {}", config.generate.expected_output.display());
    }

    let source = template_source(repo_root, &config.templates.source, templates);
    let set = TemplateSet::load(&source, &config.generate.excludes)?;
    let applied = set.apply(repo_root, false)?;

    let metadata_dest = metadata::relocate_service_metadata(
        repo_root,
        &config.generate.metadata.source,
        &config.generate.metadata.resources_dir,
    )?;

    if json {
        let event = serde_json::json!({
            "event": "generate",
            "status": "success",
            "service": request.service,
            "version": request.version,
            "templates_written": applied.written.len(),
            "templates_unchanged": applied.unchanged.len(),
            "templates_excluded": applied.excluded.len(),
            "metadata": metadata_dest.display().to_string(),
        });
        println!("{}", event);
    } else {
        println!("\n📊 Generate Results:");
        println!(
            "  ✓ Templates: {} written, {} unchanged, {} excluded",
            applied.written.len(),
            applied.unchanged.len(),
            applied.excluded.len()
        );
        println!("  ✓ Metadata: {}", metadata_dest.display());
        println!();
    }

    Ok(())
}
