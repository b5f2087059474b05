use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ledgerlens_analyze::narration::classify_narration;
use ledgerlens_analyze::pipeline::{analyze_document, analyze_tabular_file};
use ledgerlens_core::{AnalysisError, AnalysisResponse};

mod pdf;

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", version, about = "Bank statement extraction and classification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a statement file (.csv/.xlsx/.xls/.pdf) and print the JSON response
    Analyze {
        /// Path to the statement file
        file: PathBuf,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },

    /// Classify a single narration and print its structured facets
    Classify {
        /// Free-text narration, e.g. "UPI/JOHN@BANK/GROCERY/HDFC/123456789012"
        narration: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { file, pretty } => {
            let response = analyze_file(&file);
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{json}");
        }

        Command::Classify { narration } => {
            let facets = classify_narration(&narration);
            println!("{}", serde_json::to_string_pretty(&facets)?);
        }
    }

    Ok(())
}

/// Dispatch a statement file to the matching pipeline by extension
fn analyze_file(path: &Path) -> AnalysisResponse {
    if !path.exists() {
        return AnalysisResponse::bad_request("File not found or invalid path.");
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "xlsx" | "xls" => analyze_tabular_file(path),
        "pdf" => match pdf::extract_document(path) {
            Ok(source) => analyze_document(&source),
            Err(err) => AnalysisResponse::from_error(
                AnalysisError::Unexpected(format!("{err:#}")),
                "PDF",
            ),
        },
        _ => AnalysisResponse::bad_request("Unsupported file type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_bad_request() {
        let resp = analyze_file(Path::new("/dev/null"));
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.message, "Unsupported file type");
    }

    #[test]
    fn test_missing_file_is_bad_request() {
        let resp = analyze_file(Path::new("/no/such/statement.csv"));
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.message, "File not found or invalid path.");
    }
}
