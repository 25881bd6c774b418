use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use jsonc_tools::{
    apply_edits, format, parse, EolStyle, FormatOptions, ParseErrorCode, ParseOptions,
    ParseVisitor, Span,
};
use log::debug;

/// A formatter and validator for JSONC (JSON with comments).
///
/// jfmt reads JSONC from stdin or files and writes it back with normalized
/// indentation and line endings. Comments and data are preserved exactly;
/// only whitespace changes. With --check it validates instead of formatting.
#[derive(Parser, Debug)]
#[command(name = "jfmt")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file(s). If not specified, reads from stdin.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output file. If not specified, writes to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of spaces per indentation level.
    #[arg(short, long, default_value = "4")]
    indent: usize,

    /// Use tabs instead of spaces for indentation.
    #[arg(short = 't', long)]
    tabs: bool,

    /// Line ending style. Defaults to whatever the input uses.
    #[arg(long, value_enum)]
    eol: Option<EolStyleArg>,

    /// Preserve existing blank lines between values.
    #[arg(long)]
    keep_lines: bool,

    /// Ensure the output ends with a line break.
    #[arg(long)]
    final_newline: bool,

    /// Treat comments as errors (plain JSON input).
    #[arg(long)]
    no_comments: bool,

    /// Allow trailing commas in objects and arrays.
    #[arg(long)]
    trailing_commas: bool,

    /// Validate input without writing formatted output.
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EolStyleArg {
    Lf,
    Crlf,
}

/// Collects parse diagnostics for --check mode.
#[derive(Default)]
struct Diagnostics {
    errors: Vec<(ParseErrorCode, Span)>,
}

impl ParseVisitor for Diagnostics {
    fn on_error(&mut self, code: ParseErrorCode, span: Span) {
        self.errors.push((code, span));
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("jfmt: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let format_options = FormatOptions {
        tab_size: args.indent,
        insert_spaces: !args.tabs,
        eol: args.eol.map(|e| match e {
            EolStyleArg::Lf => EolStyle::Lf,
            EolStyleArg::Crlf => EolStyle::Crlf,
        }),
        keep_lines: args.keep_lines,
        insert_final_newline: args.final_newline,
    };
    let parse_options = ParseOptions {
        allow_comments: !args.no_comments,
        allow_trailing_commas: args.trailing_commas,
        allow_empty_content: false,
    };

    let inputs = read_inputs(&args.files)?;

    if args.check {
        return check(&inputs, &parse_options);
    }

    let mut output = String::new();
    for (name, text) in &inputs {
        let edits = format(text, None, &format_options);
        debug!("{}: {} bytes, {} edits", name, text.len(), edits.len());
        output.push_str(&apply_edits(text, &edits)?);
    }

    if let Some(path) = args.output {
        fs::write(&path, &output)
            .map_err(|e| format!("cannot write '{}': {}", path.display(), e))?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }

    Ok(())
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    if files.is_empty() {
        if io::stdin().is_terminal() {
            return Err("no input files and stdin is a terminal (try 'jfmt --help')".into());
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(vec![("<stdin>".to_string(), buffer)]);
    }

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        inputs.push((path.display().to_string(), content));
    }
    Ok(inputs)
}

fn check(
    inputs: &[(String, String)],
    options: &ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = false;
    for (name, text) in inputs {
        let mut diagnostics = Diagnostics::default();
        parse(text, &mut diagnostics, options);
        debug!("{}: {} diagnostics", name, diagnostics.errors.len());
        for (code, span) in &diagnostics.errors {
            eprintln!(
                "{}:{}:{}: {}",
                name,
                span.line + 1,
                span.column + 1,
                code.description()
            );
            failed = true;
        }
    }
    if failed {
        Err("input is not valid".into())
    } else {
        Ok(())
    }
}
