use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use power_align::{
    AlignmentInput, AlignmentOutput, PowerAligner, PowerAlignerBuilder, PowerConfig,
};
use serde::Deserialize;

#[path = "power_align/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "power_align/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    /// REF / HYP / op rows for both alignments.
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "power_align")]
#[command(about = "Align hypothesis transcripts against references with phonetic refinement")]
struct Args {
    /// Pronunciation lexicon (JSON object of word -> pronunciation(s)).
    #[arg(long, env = "POWER_ALIGN_LEXICON")]
    lexicon: PathBuf,
    #[arg(long, requires = "hypothesis", conflicts_with = "cases_file")]
    reference: Option<String>,
    #[arg(long, requires = "reference")]
    hypothesis: Option<String>,
    /// JSON lines of {"id", "reference", "hypothesis"}.
    #[arg(long, env = "POWER_ALIGN_CASES_FILE")]
    cases_file: Option<PathBuf>,
    /// Compare words case-sensitively.
    #[arg(long, default_value_t = false)]
    no_lowercase: bool,
    #[arg(
        long,
        env = "POWER_ALIGN_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    /// Write to this file instead of stdout.
    #[arg(long, env = "POWER_ALIGN_OUT")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct Case {
    id: String,
    reference: String,
    hypothesis: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("power_align: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let cases = match (&args.cases_file, &args.reference, &args.hypothesis) {
        (Some(path), _, _) => load_cases(path)?,
        (None, Some(reference), Some(hypothesis)) => vec![Case {
            id: "cli".to_string(),
            reference: reference.clone(),
            hypothesis: hypothesis.clone(),
        }],
        _ => {
            return Err(
                "Provide either --cases-file or both --reference and --hypothesis.".to_string(),
            )
        }
    };

    let config = PowerConfig {
        lexicon_path: args.lexicon.to_string_lossy().to_string(),
        lowercase: !args.no_lowercase,
        ..PowerConfig::default()
    };
    let aligner = PowerAlignerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build aligner: {err}"))?;

    let results = cases
        .iter()
        .map(|case| align_case(&aligner, case))
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = match args.output_format {
        OutputFormat::Json => json_report_formatter::render(&results)?,
        OutputFormat::Text => text_report_formatter::render(&results),
    };
    match args.out.as_deref() {
        Some(path) => write_output(path, &rendered),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn align_case(aligner: &PowerAligner, case: &Case) -> Result<(String, AlignmentOutput), String> {
    let input = AlignmentInput {
        reference: case.reference.clone(),
        hypothesis: case.hypothesis.clone(),
    };
    let output = aligner
        .align(&input)
        .map_err(|err| format!("{}: align() failed: {err}", case.id))?;
    Ok((case.id.clone(), output))
}

fn load_cases(path: &Path) -> Result<Vec<Case>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;

    let mut cases = Vec::new();
    for (index, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let case: Case = serde_json::from_str(line).map_err(|err| {
            format!(
                "Invalid case on line {} of '{}': {err}",
                index + 1,
                path.display()
            )
        })?;
        cases.push(case);
    }

    if cases.is_empty() {
        return Err(format!("No cases were parsed from '{}'.", path.display()));
    }
    Ok(cases)
}

fn write_output(path: &Path, rendered: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    fs::write(path, rendered)
        .map_err(|err| format!("Failed to write output file '{}': {err}", path.display()))
}
