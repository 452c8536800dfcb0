// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lppdf — (L)ine (P)rint PDF.
//
// Entry point. Parses arguments, initialises logging, merges settings and runs
// one conversion. Every failure maps to a distinct non-zero exit status.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use lineprint_core::error::Result;
use lineprint_core::human_errors::humanize_error;
use lineprint_core::{ConversionSettings, LineprintError, Margins, Orientation};
use lineprint_document::{ConversionReport, Converter};

/// Converts plain text files to PDF using the Courier font (A4 by default,
/// portrait or landscape). Lines may end in LF, CR/LF or CR, and form feed
/// characters (0x0c) start a new page.
#[derive(Parser, Debug)]
#[command(name = "lppdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text file to convert, or `-` for standard input (requires --output)
    input: Option<PathBuf>,

    /// Output file [default: the input file with its extension changed to .pdf]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Font size in points [default: 10]
    #[arg(short = 's', long = "font-size")]
    font_size: Option<f32>,

    /// Use the column count, page size and margins to choose the font size
    #[arg(short = 'a', long = "auto-font-size", action = ArgAction::SetTrue)]
    auto_font_size: bool,

    /// Margins as left,right,top,bottom; points unless suffixed mm/cm/pt
    /// [default: 10mm,10mm,10mm,10mm]
    #[arg(short = 'm', long, value_parser = parse_margins)]
    margins: Option<Margins>,

    /// Columns per row; anything further is truncated [default: 80]
    #[arg(short = 'c', long)]
    columns: Option<u32>,

    /// Rows per page [default: 60]
    #[arg(short = 'r', long)]
    rows: Option<u32>,

    /// Ignore form feed characters (0x0c)
    #[arg(short = 'f', long = "no-ff", action = ArgAction::SetTrue)]
    no_form_feed: bool,

    /// Use landscape orientation [default: portrait]
    #[arg(short = 'L', long, action = ArgAction::SetTrue)]
    landscape: bool,

    /// Read settings from a JSON file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long = "print-settings", action = ArgAction::SetTrue)]
    print_settings: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

impl Args {
    /// Defaults, then the settings file, then flags.
    fn settings(&self) -> Result<ConversionSettings> {
        let mut settings = match &self.config {
            Some(path) => ConversionSettings::from_json_file(path)?,
            None => ConversionSettings::default(),
        };

        if let Some(columns) = self.columns {
            settings.columns = columns;
        }
        if let Some(rows) = self.rows {
            settings.rows = rows;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
        if let Some(margins) = self.margins {
            settings.margins = margins;
        }
        if self.landscape {
            settings.orientation = Orientation::Landscape;
        }
        if self.no_form_feed {
            settings.ignore_form_feed = true;
        }
        if self.auto_font_size {
            settings.auto_font_size = true;
        }
        Ok(settings)
    }
}

fn parse_margins(raw: &str) -> std::result::Result<Margins, String> {
    raw.parse::<Margins>().map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(Some(report)) => {
            tracing::debug!(?report, "done");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "conversion failed");
            let human = humanize_error(&err);
            eprintln!("lppdf: {err}");
            eprintln!("  {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Option<ConversionReport>> {
    let settings = args.settings()?;
    if args.print_settings {
        println!("{}", settings.to_json_pretty()?);
        return Ok(None);
    }

    let config = settings.validate()?;
    tracing::info!(?config, "lppdf starting");
    let converter = Converter::new(config);

    let report = match args.input.as_deref() {
        Some(input) if is_stdin(input) => {
            let output = args.output.as_deref().ok_or(LineprintError::NoOutputTarget)?;
            converter.convert_reader(std::io::stdin().lock(), output)?
        }
        input => converter.convert_file(input, args.output.as_deref())?,
    };
    Ok(Some(report))
}

fn is_stdin(input: &Path) -> bool {
    input.as_os_str() == "-"
}
