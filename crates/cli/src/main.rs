//! CLI tool for converting documents to PDF.

use anyhow::{bail, Context, Result};
use clap::Parser;
use pdfconv_convert::{Dispatcher, SofficeConverter};
use pdfconv_core::{ConversionReport, ConversionRequest, InputKind, PageSize};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert slide decks, word documents, or images into a single PDF.
#[derive(Parser, Debug)]
#[command(name = "pdfconv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input kind: slides, word, or images
    #[arg(short, long)]
    kind: InputKind,

    /// Input file(s); slides and word convert only the first one
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output PDF (default: first input with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page size for slides and images: letter or a4
    #[arg(long, default_value = "letter")]
    page_size: PageSize,

    /// LibreOffice executable used for word documents
    #[arg(long, default_value = SofficeConverter::DEFAULT_PROGRAM)]
    soffice: PathBuf,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let request = ConversionRequest::new(
        args.kind,
        args.input.iter(),
        output_path(&args.input, args.output.as_deref()),
    );

    let report = match prepare(&request) {
        Ok(()) => {
            log::debug!(
                "Converting {} input(s) as {} to {}",
                request.effective_inputs().len(),
                request.input_kind,
                request.output_path.display()
            );
            Dispatcher::new()
                .with_page_size(args.page_size)
                .with_document_converter(Box::new(
                    SofficeConverter::new().with_program(&args.soffice),
                ))
                .run(&request)
        }
        Err(e) => ConversionReport::failed(&request, &format!("Conversion failed. Error: {:#}", e)),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
    } else if report.success {
        println!("{}", report.message);
    } else {
        eprintln!("{}", report.message);
    }

    if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Check the selected inputs and make room for the output.
fn prepare(request: &ConversionRequest) -> Result<()> {
    let rejected: Vec<String> = request
        .input_paths
        .iter()
        .filter(|path| !request.input_kind.accepts(path))
        .map(|path| path.display().to_string())
        .collect();

    if !rejected.is_empty() {
        bail!(
            "{} accepts .{} files, got: {}",
            request.input_kind,
            request.input_kind.extensions().join(", ."),
            rejected.join(", ")
        );
    }

    if let Some(dir) = request.output_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }
    }

    Ok(())
}

/// Determine the output PDF path.
///
/// Without an explicit output the PDF lands next to the first input. A
/// missing `.pdf` extension is appended.
fn output_path(inputs: &[PathBuf], output: Option<&Path>) -> PathBuf {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let first = inputs.first().map(PathBuf::as_path).unwrap_or(Path::new("output"));
            let stem = first
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            match first.parent() {
                Some(parent) => parent.join(stem),
                None => PathBuf::from(stem),
            }
        }
    };
    with_pdf_extension(path)
}

fn with_pdf_extension(path: PathBuf) -> PathBuf {
    let has_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if has_pdf {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_next_to_first_input() {
        let inputs = vec![PathBuf::from("/decks/Kickoff.pptx"), PathBuf::from("/decks/b.pptx")];
        assert_eq!(output_path(&inputs, None), PathBuf::from("/decks/Kickoff.pdf"));
        assert_eq!(
            output_path(&[PathBuf::from("photo.jpeg")], None),
            PathBuf::from("photo.pdf")
        );
    }

    #[test]
    fn test_explicit_output_gets_pdf_extension() {
        let inputs = vec![PathBuf::from("a.png")];
        assert_eq!(
            output_path(&inputs, Some(Path::new("out/album"))),
            PathBuf::from("out/album.pdf")
        );
        assert_eq!(
            output_path(&inputs, Some(Path::new("album.PDF"))),
            PathBuf::from("album.PDF")
        );
        assert_eq!(
            output_path(&inputs, Some(Path::new("notes.v2"))),
            PathBuf::from("notes.v2.pdf")
        );
    }

    #[test]
    fn test_prepare_rejects_wrong_extension() {
        let request = ConversionRequest::new(
            InputKind::Images,
            ["a.png", "b.gif"],
            std::env::temp_dir().join("pdfconv-cli-test.pdf"),
        );
        let err = prepare(&request).unwrap_err().to_string();
        assert!(err.contains("b.gif"));
        assert!(!err.contains("a.png"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "pdfconv", "--kind", "PPT File", "deck.pptx", "-o", "deck", "--page-size", "a4",
        ])
        .unwrap();
        assert_eq!(args.kind, InputKind::Slides);
        assert_eq!(args.page_size, PageSize::A4);
        assert_eq!(args.soffice, PathBuf::from("soffice"));
        assert!(!args.json);

        assert!(Args::try_parse_from(["pdfconv", "--kind", "slides"]).is_err());
        assert!(Args::try_parse_from(["pdfconv", "--kind", "spreadsheet", "x.pptx"]).is_err());
    }
}
