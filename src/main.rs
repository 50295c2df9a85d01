// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use prog::analyze::{analyze, NoteRecord};
use prog::engine::{generate, ChordRequest};
use prog::pattern::RhythmAlgo;
use prog::rng::Dice;
use prog::voicing::VoicingKind;

fn print_usage() {
    println!("PROG - Chord Progression Engine");
    println!();
    println!("Usage: prog [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  generate <request.yaml>   Generate a chord clip from a request record");
    println!("  analyze <notes.yaml>      Infer pattern and subdivision from recorded notes");
    println!("  rhythm <algo> [pattern]   Run a rhythm algorithm (see list-rhythms)");
    println!("  list-rhythms              List rhythm algorithms with descriptions");
    println!("  list-voicings             List voicings with descriptions");
    println!();
    println!("Options:");
    println!("  --seed <N>                Seed the random source for repeatable output");
    println!("  --help                    Show this help message");
}

fn run_generate(path: &str, dice: &mut Dice) -> Result<()> {
    let request = ChordRequest::load(path)?;
    let (steps, names) = generate(&request, dice)?;

    let blob = serde_json::json!({
        "steps": steps,
        "chordNames": names,
    });
    println!("{}", serde_json::to_string_pretty(&blob)?);
    Ok(())
}

fn run_analyze(path: &str) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note record: {}", path))?;
    let record: NoteRecord =
        serde_yaml::from_str(&contents).context("Failed to parse note record")?;

    match analyze(&record) {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("{{}}"),
    }
    Ok(())
}

fn run_rhythm(algo: &str, pattern: &str, dice: &mut Dice) -> Result<()> {
    let algo = RhythmAlgo::parse(algo)?;
    println!("{}", algo.apply(pattern, dice));
    Ok(())
}

fn list_rhythms() {
    for algo in RhythmAlgo::ALL {
        println!("{:18} {}", algo.name(), algo.description());
    }
}

fn list_voicings() {
    for kind in VoicingKind::ALL {
        println!("{:22} {}", kind.name(), kind.description());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut dice = match args.iter().position(|a| a == "--seed") {
        Some(at) => {
            if at + 1 >= args.len() {
                eprintln!("Error: --seed requires a number");
                std::process::exit(1);
            }
            let seed: u64 = args[at + 1]
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid seed: {}", args[at + 1]))?;
            args.drain(at..=at + 1);
            Dice::from_seed(seed)
        }
        None => Dice::from_entropy(),
    };

    if args.is_empty() {
        println!("PROG - Chord Progression Engine");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[0].as_str() {
        "generate" => {
            if args.len() < 2 {
                eprintln!("Error: generate requires a request file");
                std::process::exit(1);
            }
            run_generate(&args[1], &mut dice)?;
        }
        "analyze" => {
            if args.len() < 2 {
                eprintln!("Error: analyze requires a note record file");
                std::process::exit(1);
            }
            run_analyze(&args[1])?;
        }
        "rhythm" => {
            if args.len() < 2 {
                eprintln!("Error: rhythm requires an algorithm name");
                eprintln!("Use list-rhythms to see available algorithms");
                std::process::exit(1);
            }
            let pattern = args.get(2).map(String::as_str).unwrap_or("");
            run_rhythm(&args[1], pattern, &mut dice)?;
        }
        "list-rhythms" => {
            list_rhythms();
        }
        "list-voicings" => {
            list_voicings();
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown command: {}", args[0]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
