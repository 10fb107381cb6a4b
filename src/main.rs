use std::env;
use std::fs;
use std::process;

use moments::{Moment, Performance};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let json = args.iter().any(|a| a == "--json");
    let paths: Vec<&String> = args.iter().filter(|a| *a != "--json").collect();

    if paths.is_empty() || paths.len() > 2 {
        eprintln!("Usage: moments <score.yaml> [options.yaml] [--json]");
        process::exit(1);
    }

    let score_source = read_or_exit(paths[0]);
    let options_source = paths.get(1).map(|path| read_or_exit(path));

    let performance = match moments::assemble(&score_source, options_source.as_deref()) {
        Ok(performance) => performance,
        Err(e) => {
            eprintln!("Build error: {}", e);
            process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&performance) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing performance: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_summary(&performance);
    }
}

fn read_or_exit(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn print_summary(performance: &Performance) {
    if performance.is_empty() {
        println!("No voice is performed.");
    }
    print_moments("Performer", &performance.performers_moments);
    print_moments("Assistant", &performance.assistants_moments);

    println!("Time controls:");
    for tc in &performance.time_controls {
        println!(
            "  {:>8}ms  width {:>6}ms  (notated {}ms + {}ms)",
            tc.position, tc.width, tc.notated_start, tc.notated_duration
        );
    }
}

fn print_moments(label: &str, moments: &[Moment]) {
    println!("{} ({} moments):", label, moments.len());
    for (i, moment) in moments.iter().enumerate() {
        let channels: Vec<String> = moment.chords.iter().map(|c| c.channel.to_string()).collect();
        println!(
            "  #{:<4} {:>8}ms  width {:>6}ms  channels [{}]",
            i + 1,
            moment.position,
            moment.width(),
            channels.join(", ")
        );
    }
}
