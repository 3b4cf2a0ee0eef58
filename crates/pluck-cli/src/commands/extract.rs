use clap::Args;
use pluck_core::error::PluckError;
use pluck_core::extraction::pdftotext::PdftotextExtractor;
use pluck_core::extraction::{PlainTextExtractor, TextExtractor};
use pluck_core::rules::builtin;
use pluck_core::summary::{summarize, Summary};
use pluck_core::{DocumentKind, ExtractOptions, ExtractionResult, Extractor};
use std::path::{Path, PathBuf};

use crate::output;

#[derive(Args)]
pub struct ExtractArgs {
    /// Path to a PDF or plain-text file
    pub input_file: PathBuf,

    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,

    /// Year for dates written without one (default: current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Reject documents longer than this many characters
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Custom JSON sign rule file
    #[arg(short, long = "rules", value_name = "FILE", conflicts_with = "preset")]
    pub rules: Option<PathBuf>,

    /// Predefined sign rules: default, conservative
    #[arg(short, long = "preset", value_name = "NAME", default_value = "default")]
    pub preset: String,

    /// Include the per-match extraction trace
    #[arg(long)]
    pub trace: bool,
}

pub fn run(kind: DocumentKind, args: ExtractArgs, show_summary: bool) -> Result<(), PluckError> {
    let sign_rules = match &args.rules {
        Some(path) => pluck_core::rules::load_ruleset(path)?,
        None => builtin::load_preset(&args.preset)?,
    };
    let options = ExtractOptions {
        default_year: args.year,
        max_chars: args.max_chars,
        ..Default::default()
    };
    let engine = Extractor::new(options, &sign_rules);

    let bytes = std::fs::read(&args.input_file)?;
    let backend = backend_for(&args.input_file);
    tracing::debug!(
        path = %args.input_file.display(),
        backend = backend.backend_name(),
        rules = %sign_rules.name,
        "reading input"
    );
    let extraction = pluck_core::extract_document(&bytes, backend.as_ref(), kind, &engine)?;
    tracing::debug!(
        kind = %extraction.result.kind(),
        records = extraction.result.len(),
        "extraction done"
    );

    let summary: Option<Summary> = match (&extraction.result, show_summary) {
        (ExtractionResult::Transactions(txns), true) => Some(summarize(txns)),
        _ => None,
    };
    let trace = args.trace.then_some(&extraction.trace);

    match args.output.as_str() {
        "json" => output::json::print(&extraction.result, trace, summary.as_ref())?,
        _ => output::table::print(&extraction.result, trace, summary.as_ref()),
    }

    Ok(())
}

/// `.pdf` goes through pdftotext, everything else is read as text.
fn backend_for(path: &Path) -> Box<dyn TextExtractor> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        Box::new(PdftotextExtractor::new())
    } else {
        Box::new(PlainTextExtractor)
    }
}
