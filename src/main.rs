// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

mod cli;
mod config;
mod exit_codes;
mod export;
mod logging;
mod midi;
mod music;
mod player;

use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use cli::{Command, PlayArgs};
use config::AppConfig;
use export::NoteExporter;
use midi::PortSelector;
use music::NoteRequest;
use tracing::{error, info};

/// Program name as the user typed it, without directories
fn app_name(argv0: Option<&OsString>) -> String {
    argv0
        .and_then(|a| Path::new(a).file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "one-note-midi".to_string())
}

fn play(args: &PlayArgs, config: &AppConfig, request: &NoteRequest) -> Result<()> {
    if let Some(path) = &args.output_file {
        NoteExporter::new(*request)
            .with_name(format!("Instrument {}", request.instrument))
            .export(path)
            .with_context(|| format!("Failed to write MIDI file: {:?}", path))?;
        println!("Wrote {} to {}", request, path.display());
        info!("Exported note to {:?}", path);
        return Ok(());
    }

    println!("Playing {}", request);

    let port = args
        .port
        .as_deref()
        .map(PortSelector::parse)
        .unwrap_or_else(|| config.output.port_selector());
    let mut output = midi::open_output(config.output.backend, &port)?;
    player::play_note(output.as_mut(), request, thread::sleep)
}

fn run(args: Vec<OsString>) -> i32 {
    let app_name = app_name(args.first());

    let command = match cli::utf8_args(args.into_iter().skip(1)).and_then(cli::parse) {
        Ok(command) => command,
        Err(e) => {
            println!("Flag Error: {}", e);
            print!("{}", cli::help_text(&app_name));
            return exit_codes::USAGE;
        }
    };

    let play_args = match command {
        Command::Help => {
            print!("{}", cli::help_text(&app_name));
            return exit_codes::OK;
        }
        Command::ListPorts => {
            return match midi::print_ports() {
                Ok(()) => exit_codes::OK,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    exit_codes::FAILURE
                }
            };
        }
        Command::Play(play_args) => play_args,
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::FAILURE;
        }
    };

    let request = match play_args.resolve(&config.defaults.to_raw()) {
        Ok(request) => request,
        Err(e) => {
            println!("Flag Limit Error: {}", e);
            print!("{}", cli::help_text(&app_name));
            return exit_codes::USAGE;
        }
    };

    match play(&play_args, &config, &request) {
        Ok(()) => exit_codes::OK,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            exit_codes::FAILURE
        }
    }
}

fn main() {
    logging::init();
    let code = run(env::args_os().collect());
    std::process::exit(code);
}
