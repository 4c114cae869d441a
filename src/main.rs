//! Command-line front end for the bank-account prediction form.

use std::path::PathBuf;

use finclusion::config::AppConfig;
use finclusion::encoding::{Field, choices};
use finclusion::features::{FEATURE_NAMES, RawInput, assemble};
use finclusion::logging;
use finclusion::outcome::Language;
use finclusion::predictor::Predictor;
use serde_json::{Map, Value};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    model_path: Option<PathBuf>,
    language: Option<Language>,
    input_path: Option<PathBuf>,
    fields: Map<String, Value>,
    show_vector: bool,
    list_choices: bool,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if options.list_choices {
        print_choices();
        return Ok(());
    }

    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = AppConfig::load().map_err(|err| err.to_string())?;
    if let Some(path) = options.model_path.clone() {
        config.model_path = path;
    }
    if let Some(language) = options.language {
        config.language = language;
    }

    let predictor = Predictor::from_config(&config);
    let handle = predictor.ensure_loaded().map_err(|err| err.to_string())?;
    println!(
        "Model loaded from {} ({} classifier)",
        handle.path().display(),
        handle.model().kind()
    );

    let raw = read_input(&options)?;
    if options.show_vector {
        let vector = assemble(&raw).map_err(|err| err.to_string())?;
        for (name, value) in FEATURE_NAMES.iter().zip(vector.as_slice()) {
            println!("  {name:<24}{value}");
        }
    }
    let result = predictor.predict(&raw).map_err(|err| err.to_string())?;
    println!("Prediction: {result} (p={:.3})", result.probability);
    Ok(())
}

fn read_input(options: &CliOptions) -> Result<RawInput, String> {
    if let Some(path) = &options.input_path {
        if !options.fields.is_empty() {
            return Err("--input cannot be combined with per-field flags".to_string());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
        return serde_json::from_str(&text)
            .map_err(|err| format!("Invalid input {}: {err}", path.display()));
    }
    serde_json::from_value(Value::Object(options.fields.clone()))
        .map_err(|err| format!("Incomplete form: {err}\n\n{}", help_text()))
}

fn print_choices() {
    println!("household_size: integer >= 1");
    println!("age: integer >= 0");
    for field in Field::ALL {
        println!("{field}:");
        for label in choices(field) {
            println!("  {label}");
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        match arg {
            "-h" | "--help" => return Err(help_text()),
            "--choices" => options.list_choices = true,
            "--show-vector" => options.show_vector = true,
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                options.model_path = Some(PathBuf::from(value));
            }
            "--lang" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--lang requires a value".to_string())?;
                options.language = Some(
                    Language::parse(value)
                        .ok_or_else(|| format!("Invalid --lang value: {value}"))?,
                );
            }
            "--input" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--input requires a value".to_string())?;
                options.input_path = Some(PathBuf::from(value));
            }
            "--household-size" | "--age" | "--year" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| format!("{arg} requires a value"))?;
                let number = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid {arg} value: {value}"))?;
                let key = arg.trim_start_matches("--").replace('-', "_");
                options.fields.insert(key, Value::from(number));
            }
            flag if flag.starts_with("--") => {
                let Some(field) = Field::from_key(&flag[2..]) else {
                    return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
                };
                idx += 1;
                let value = args.get(idx).ok_or_else(|| format!("{flag} requires a value"))?;
                options
                    .fields
                    .insert(field.key().to_string(), Value::from(value.as_str()));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "finclusion",
        "",
        "Usage:",
        "  finclusion [--model <model.json>] [--lang <en|fr>] --input <person.json>",
        "  finclusion [--model <model.json>] [--lang <en|fr>] --year <y> --household-size <n> --age <n> \\",
        "      --education <label> --country <label> --location <label> --cellphone <label> \\",
        "      --gender <label> --relationship <label> --marital <label> --job <label>",
        "  finclusion --choices",
        "",
        "Options:",
        "  --model <path>   Model artifact (default: model_path from config.toml).",
        "  --lang <en|fr>   Outcome language (default: language from config.toml).",
        "  --show-vector    Print the encoded feature vector before predicting.",
        "  --choices        List the accepted labels for every field.",
    ]
    .join("\n")
}
