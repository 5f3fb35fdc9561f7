use std::io::Read;

use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use copresence::{Engine, EngineConfig, PatternLibrary, Turn};

#[derive(Parser)]
#[command(
    name = "copresence",
    about = "Detect collaborative-presence signals in conversational text",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Pattern library JSON (uses the built-in library if omitted)
    #[arg(long)]
    patterns: Option<String>,

    /// Treat input as a `Speaker: text` transcript and run field analysis
    #[arg(long)]
    conversation: bool,
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();

    let library = match &cli.patterns {
        Some(path) => PatternLibrary::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading pattern library {path}: {e}");
            std::process::exit(1);
        }),
        None => PatternLibrary::builtin(),
    };
    let engine = Engine::new(library, EngineConfig::default()).unwrap_or_else(|e| {
        eprintln!("Error constructing engine: {e}");
        std::process::exit(1);
    });

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .expect("Failed to read stdin");
        run(&engine, &input, cli.conversation);
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading {path}: {e}");
                std::process::exit(1);
            });
            run(&engine, &text, cli.conversation);
        }
    }
}

fn run(engine: &Engine, text: &str, conversation: bool) {
    if conversation {
        let turns = parse_transcript(text);
        let result = engine.analyze_conversation(&turns);
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        let result = engine.analyze(text);
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    }
}

/// Split a `Speaker: text` transcript into ordered turns. A line with a
/// `Name:` prefix starts a new turn; other lines continue the current one.
/// Segmentation lives here, in the calling harness, not in the engine.
fn parse_transcript(text: &str) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match split_speaker(line) {
            Some((speaker, rest)) => turns.push(Turn {
                speaker: speaker.to_string(),
                text: rest.to_string(),
                ordinal: turns.len(),
            }),
            None => {
                if let Some(current) = turns.last_mut() {
                    current.text.push(' ');
                    current.text.push_str(line);
                }
            }
        }
    }
    turns
}

fn split_speaker(line: &str) -> Option<(&str, &str)> {
    let (head, rest) = line.split_once(':')?;
    let head = head.trim();
    if head.is_empty()
        || head.len() > 24
        || head.split_whitespace().count() > 2
        || !head.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '_')
    {
        return None;
    }
    Some((head, rest.trim_start()))
}
