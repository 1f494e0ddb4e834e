//! `amity` command line entry point.
//!
//! Parses arguments, resolves configuration and forwards each command to one
//! `Facility` handle.

mod commands;
mod render;

use amity_core::{init_logging, Facility, FacilityConfig, FacilityError};
use anyhow::{bail, Context};
use commands::{CommandLine, Commands};
use log::info;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<FacilityError>()
                .map_or("error", FacilityError::code);
            eprintln!("{code}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let config = resolve_config(&commands)?;

    if let Some(dir) = &config.log_dir {
        let Some(dir) = dir.to_str() else {
            bail!("log directory is not valid UTF-8");
        };
        if let Err(err) = init_logging(config.log_level, dir) {
            bail!("failed to start logging: {err}");
        }
    }

    let mut facility = Facility::from_config(&config)
        .with_context(|| format!("cannot open {}", config.db_path.display()))?;

    info!(
        "event=cli_command module=cli status=start command={}",
        commands.command.label()
    );

    match commands.command {
        Commands::CreateRoom { kind, names } => {
            let ids = facility.create_rooms(&kind, &names)?;
            println!("created {} room(s)", ids.len());
        }
        Commands::AddPerson {
            name,
            role,
            wants_accommodation,
        } => {
            let admission = facility.add_person(&name, &role, wants_accommodation)?;
            print!("{}", render::admission(&admission));
        }
        Commands::LoadPeople { file } => {
            let report = facility.load_people(&file)?;
            print!("{}", render::batch(&report));
        }
        Commands::Reallocate { person, room } => {
            let moved = facility.reallocate(&person, &room)?;
            print!("{}", render::reallocation(&moved));
        }
        Commands::PrintAllocations { output, json } => {
            let rooms = facility.allocations()?;
            let text = if json {
                to_json(&rooms)?
            } else {
                render::allocations(&rooms)
            };
            emit(&text, output.as_deref())?;
        }
        Commands::PrintUnallocated { output, json } => {
            let report = facility.unallocated()?;
            let text = if json {
                to_json(&report)?
            } else {
                render::unallocated(&report)
            };
            emit(&text, output.as_deref())?;
        }
        Commands::PrintRoom { name, json } => {
            let view = facility.room_detail(&name)?;
            let text = if json {
                to_json(&view)?
            } else {
                render::room(&view)
            };
            emit(&text, None)?;
        }
        Commands::AllocatePending => {
            let placements = facility.allocate_unallocated()?;
            print!("{}", render::placements(&placements));
        }
    }

    Ok(())
}

fn resolve_config(commands: &CommandLine) -> anyhow::Result<FacilityConfig> {
    let mut config = FacilityConfig::from_env()?;
    if let Some(db) = &commands.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &commands.log_level {
        config.set_log_level(level)?;
    }
    if let Some(dir) = &commands.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(seed) = commands.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
