use clap::{Arg, Command};
use log::LevelFilter;
use mailsift::{report, InputFormat, ScoringPipeline, TriageConfig};
use std::path::Path;
use std::process;

fn main() {
    let matches = Command::new("mailsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Message-archive ingestion and threat triage")
        .long_about(
            "Normalizes heterogeneous message archives (CSV, JSON, EML, MSG, MBOX)\n\
             into one record shape, derives metadata signals, blends them with a\n\
             text-classifier probability, and emits per-message threat scores and\n\
             Low/Medium/High risk buckets.",
        )
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Input file to ingest and score")
                .required_unless_present("generate-config"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Input format (csv, json, eml, msg, mbox); derived from the file extension when omitted"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (YAML)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("alpha")
                .short('a')
                .long("alpha")
                .value_name("FLOAT")
                .help("Classifier-vs-metadata blend factor in [0, 1]; overrides the config default"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .default_value("summary")
                .help("Output format: summary, csv, or json"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = generate_default_config(path) {
            eprintln!("Error generating configuration: {e}");
            process::exit(1);
        }
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match TriageConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {e:#}");
                process::exit(1);
            }
        },
        None => TriageConfig::default(),
    };

    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = matches.get_one::<String>("output").expect("has default");
    let alpha_arg = matches.get_one::<String>("alpha").cloned();

    if let Err(e) = run(&config, input, matches.get_one::<String>("format"), alpha_arg, output) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(
    config: &TriageConfig,
    input: &str,
    format: Option<&String>,
    alpha: Option<String>,
    output: &str,
) -> anyhow::Result<()> {
    let format = match format {
        Some(tag) => InputFormat::from_extension(tag)?,
        None => {
            let ext = Path::new(input)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            InputFormat::from_extension(ext)?
        }
    };

    let alpha = match alpha {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("alpha must be a number in [0, 1], got '{raw}'"))?,
        None => config.alpha,
    };

    let raw = std::fs::read(input)?;
    let pipeline = ScoringPipeline::new(config.clone());
    let scored = pipeline.run(&raw, format, alpha)?;

    match output {
        "csv" => print!("{}", report::to_csv(&scored)),
        "json" => println!("{}", report::to_json(&scored)?),
        "summary" => print!("{}", report::summary(&scored)),
        other => anyhow::bail!("unknown output format: {other} (expected summary, csv, or json)"),
    }
    Ok(())
}

fn generate_default_config(path: &str) -> anyhow::Result<()> {
    let config = TriageConfig::default();
    std::fs::write(path, config.to_yaml()?)?;
    println!("Default configuration written to {path}");
    Ok(())
}
