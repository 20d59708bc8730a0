use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use sdic_core::persistence::{load_registry_or_new, save_registry};
use sdic_core::{contains, ClassifiedToken, EngineConfig, FingerprintHasher, PrimeRegistry, SdicEngine};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(version, about = "Deterministic SDIC-G translation core", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Engine config file (JSON); flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the cipher table
    #[arg(long, global = true)]
    cipher: Option<PathBuf>,

    /// Path to the prime registry snapshot
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disambiguate and reorder a token sequence
    Translate { tokens: Vec<String> },
    /// Multiplicative fingerprint of a token sequence
    Hash {
        tokens: Vec<String>,
        /// Also test whether this sequence is contained in the first
        #[arg(long, num_args = 1..)]
        contains: Option<Vec<String>>,
    },
    /// Score a candidate translation against its source
    Validate {
        #[arg(long)]
        source: String,
        #[arg(long)]
        translation: String,
    },
    /// Show the per-token classification
    Classify { tokens: Vec<String> },
    /// Extract entity mentions from running text
    Entities { text: String },
    /// Assign primes to tokens in the persistent registry
    Register {
        tokens: Vec<String>,
        /// Lexicon CSV (`sign`/`reading` columns) to start from when no snapshot exists
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
    /// Run the built-in sample batch
    Demo,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(args: &Args) -> sdic_core::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(cipher) = &args.cipher {
        config.cipher_path = cipher.clone();
    }
    if let Some(registry) = &args.registry {
        config.registry_path = registry.clone();
    }
    Ok(config)
}

fn run(command: Command, config: &EngineConfig) -> sdic_core::Result<()> {
    match command {
        Command::Translate { tokens } => {
            let engine = SdicEngine::from_config(config);
            print_translation(&engine, &tokens);
        }
        Command::Hash { tokens, contains: other } => {
            let engine = SdicEngine::from_config(config);
            let fingerprint = engine.fingerprint(&tokens);
            println!("{} {}", "Fingerprint:".bold(), fingerprint);
            if let Some(other) = other {
                let sub = engine.fingerprint(&other);
                println!("{} {}", "Contains:".bold(), contains(&fingerprint, &sub));
            }
        }
        Command::Validate {
            source,
            translation,
        } => {
            let engine = SdicEngine::from_config(config);
            let result = engine.judge(&source, &translation);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Classify { tokens } => {
            let engine = SdicEngine::from_config(config);
            for (token, classified) in tokens.iter().zip(engine.classify(&tokens)) {
                println!("  {:<12} {}", token, describe(&classified));
            }
        }
        Command::Entities { text } => {
            let engine = SdicEngine::from_config(config);
            println!("{}", serde_json::to_string_pretty(&engine.entities(&text))?);
        }
        Command::Register { tokens, lexicon } => {
            let mut registry = match lexicon {
                Some(path) if !config.registry_path.exists() => PrimeRegistry::from_lexicon(&path),
                _ => load_registry_or_new(&config.registry_path)?,
            };
            for token in &tokens {
                println!("  {:<12} {}", token, registry.register(token));
            }
            let fingerprint = FingerprintHasher::new(&registry).fingerprint(&tokens);
            println!("{} {}", "Additive signature:".bold(), registry.additive_signature(&tokens));
            println!("{} {}", "Fingerprint:".bold(), fingerprint);
            save_registry(&registry, &config.registry_path)?;
            println!("Registry saved to '{}' ({} signs)", config.registry_path.display(), registry.len());
        }
        Command::Demo => run_demo(config),
    }
    Ok(())
}

fn run_demo(config: &EngineConfig) {
    let engine = SdicEngine::from_config(config);
    println!("{}", "SDIC-G deterministic translation".bold());
    println!("---------------------------------------------------------------");

    // 1: UD after KÙ, 2: UD after a numeral, 3: damage and an unknown sign
    let cases: Vec<Vec<String>> = [
        vec!["DAM.GÀR", "KÙ", "UD", "ANA", "Enlil"],
        vec!["5", "UD", "DUB", "É.GAL"],
        vec!["DAM.GÀR", "[BROKEN]", "UNK_SIGN"],
    ]
    .iter()
    .map(|case| case.iter().map(|t| t.to_string()).collect())
    .collect();

    for (i, translation) in engine.translate_batch(&cases).iter().enumerate() {
        println!("\n>>> CASE {}: {:?}", i + 1, cases[i]);
        let trace: Vec<&str> = translation.classified.iter().map(ClassifiedToken::gloss).collect();
        println!("    [Trace]:  {:?}", trace);
        println!("    [Output]: {}", translation.text.as_str().green());
        println!("    [Hash]:   {}", translation.fingerprint);
    }
}

fn print_translation(engine: &SdicEngine, tokens: &[String]) {
    let translation = engine.translate(tokens);
    let trace: Vec<&str> = translation.classified.iter().map(ClassifiedToken::gloss).collect();
    println!("{} {:?}", "Trace:".bold(), trace);
    println!("{} {}", "Output:".bold(), translation.text.as_str().green());
    println!("{} {}", "Fingerprint:".bold(), translation.fingerprint);
}

fn describe(token: &ClassifiedToken) -> String {
    match token {
        ClassifiedToken::Numeric { raw } => format!("NUMERIC {}", raw),
        ClassifiedToken::Corrupt { gloss } => format!("{} {}", "CORRUPT".red(), gloss),
        ClassifiedToken::Quarantined { placeholder } => format!("{} {}", "QUARANTINED".yellow(), placeholder),
        ClassifiedToken::Resolved { sense } => format!("{} {}", sense.kind, sense.english),
    }
}
