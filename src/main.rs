// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Panorama CLI entrypoint.
//!
//! Runs the saved-views panel against a views folder (`panorama-views.json` inside
//! `<views-dir>`), or against a built-in in-memory demo tree with `--demo`.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use panorama::manager::ManagerConfig;
use panorama::model::{DiagramId, OwnerId};
use panorama::store::{ViewFolder, WriteDurability};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIAGRAM_ID: &str = "main";
const DEFAULT_OWNER_ID: &str = "local";
const DEFAULT_LOG_FILE_NAME: &str = "panorama.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<views-dir>] [--diagram <id>] [--owner <id>] [--durable-writes] [--log-file <path>]\n  {program} [--views <dir>] [--diagram <id>] [--owner <id>] [--durable-writes] [--log-file <path>]\n  {program} --demo [--log-file <path>]\n\nIf views-dir/--views is omitted, the current working directory is used.\n--diagram and --owner select whose views are shown (defaults: {DEFAULT_DIAGRAM_ID}, {DEFAULT_OWNER_ID}).\n--demo uses a built-in in-memory view tree and cannot be combined with views-dir/--views.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--log-file selects the log destination (default: <tmp>/{DEFAULT_LOG_FILE_NAME}); RUST_LOG filters it."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    views_dir: Option<String>,
    diagram_id: Option<String>,
    owner_id: Option<String>,
    durable_writes: bool,
    log_file: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--views" => {
                if options.views_dir.is_some() {
                    return Err(());
                }
                options.views_dir = Some(args.next().ok_or(())?);
            }
            "--diagram" => {
                if options.diagram_id.is_some() {
                    return Err(());
                }
                options.diagram_id = Some(args.next().ok_or(())?);
            }
            "--owner" => {
                if options.owner_id.is_some() {
                    return Err(());
                }
                options.owner_id = Some(args.next().ok_or(())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.views_dir.is_some() {
                    return Err(());
                }
                options.views_dir = Some(arg);
            }
        }
    }

    if options.demo
        && (options.views_dir.is_some()
            || options.diagram_id.is_some()
            || options.owner_id.is_some())
    {
        return Err(());
    }

    Ok(options)
}

fn init_logging(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let log_file = std::fs::File::create(&path)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(log_file)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()?;
    tracing::info!(log_file = %path.display(), "panorama starting");
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "panorama".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let log_path = options
            .log_file
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME));
        init_logging(log_path)?;

        if options.demo {
            return panorama::tui::run_demo();
        }

        let dir = options.views_dir.unwrap_or_else(|| ".".to_owned());
        let folder = if options.durable_writes {
            ViewFolder::new(dir).with_durability(WriteDurability::Durable)
        } else {
            ViewFolder::new(dir)
        };
        let diagram_id =
            DiagramId::new(options.diagram_id.unwrap_or_else(|| DEFAULT_DIAGRAM_ID.to_owned()))?;
        let owner_id =
            OwnerId::new(options.owner_id.unwrap_or_else(|| DEFAULT_OWNER_ID.to_owned()))?;

        panorama::tui::run(folder, diagram_id, owner_id, ManagerConfig::default())
    })();

    if let Err(err) = result {
        tracing::error!(error = %err, "panorama exited with an error");
        eprintln!("panorama: {err}");
        std::process::exit(1);
    }
}
