//! plox
//!
//! Lexical scanner and interactive shell for the Lox scripting language.

mod feedback;
mod frontend;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use feedback::ScanReport;
use frontend::scanner::{ScanOutput, Scanner};
use utils::{Reporter, StderrReporter};

/// Invalid command invocation
const EX_USAGE: i32 = 64;
/// Script contained lexical errors
const EX_DATAERR: i32 = 65;
/// Script could not be read
const EX_NOINPUT: i32 = 66;
/// Reading or writing the terminal failed
const EX_IOERR: i32 = 74;

const BANNER: &str = "plox@v0.1.0 (c) 2021 by Matt Hoiland";

/// plox - Lox scanner
#[derive(Parser, Debug)]
#[command(name = "plox")]
#[command(author = "Matt Hoiland")]
#[command(version = "0.1.0")]
#[command(about = "Scan a Lox script into tokens, or start an interactive prompt")]
struct Cli {
    /// Script to scan. Starts the interactive prompt when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Print a JSON report instead of one token per line
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here, on stdout
            let code = if e.use_stderr() { EX_USAGE } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let code = match &cli.script {
        Some(path) => match run_file(path, OutputFormat::for_file(cli.json)) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EX_IOERR
            }
        },
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            match run_prompt(stdin.lock(), stdout.lock(), OutputFormat::for_prompt(cli.json)) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    EX_IOERR
                }
            }
        }
    };

    process::exit(code);
}

/// How scan results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// One token per line
    Tokens,
    /// Pretty JSON report
    Json,
    /// JSON report on a single line
    JsonLine,
}

impl OutputFormat {
    fn for_file(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Tokens
        }
    }

    /// The prompt keeps one report per input line
    fn for_prompt(json: bool) -> Self {
        if json {
            OutputFormat::JsonLine
        } else {
            OutputFormat::Tokens
        }
    }
}

/// Process exit status for a scanned script
fn exit_code(output: &ScanOutput) -> i32 {
    if output.had_error() {
        EX_DATAERR
    } else {
        0
    }
}

/// Scan a whole script file and print its tokens.
/// An unreadable script is reported here; `Err` means output failed.
fn run_file(path: &Path, format: OutputFormat) -> Result<i32> {
    log::info!("Scanning: {}", path.display());

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: could not read {}: {}", path.display(), e);
            return Ok(EX_NOINPUT);
        }
    };

    let mut reporter = StderrReporter::new();
    let stdout = io::stdout();
    let output = run(
        &path.display().to_string(),
        &source,
        format,
        &mut stdout.lock(),
        &mut reporter,
    )?;

    Ok(exit_code(&output))
}

/// Scan one unit of source and write the result to `out`
fn run<W: Write>(
    name: &str,
    source: &str,
    format: OutputFormat,
    out: &mut W,
    reporter: &mut dyn Reporter,
) -> Result<ScanOutput> {
    let output = Scanner::new(source).scan_tokens(reporter);

    match format {
        OutputFormat::Tokens => {
            for token in &output.tokens {
                writeln!(out, "{}", token)?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", ScanReport::new(name, &output).to_json()?)?;
        }
        OutputFormat::JsonLine => {
            writeln!(out, "{}", ScanReport::new(name, &output).to_json_compact()?)?;
        }
    }

    Ok(output)
}

// ==================== Interactive Prompt ====================

/// Commands understood by the prompt in place of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellCommand {
    Exit,
    Help,
}

impl ShellCommand {
    const ALL: [ShellCommand; 2] = [ShellCommand::Exit, ShellCommand::Help];

    fn parse(line: &str) -> Option<Self> {
        match line {
            ":exit" => Some(ShellCommand::Exit),
            ":help" => Some(ShellCommand::Help),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ShellCommand::Exit => ":exit",
            ShellCommand::Help => ":help",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ShellCommand::Exit => "exits the interactive prompt",
            ShellCommand::Help => "displays this help message",
        }
    }
}

/// Read lines from `input` and scan each one on its own.
/// Errors on one line never carry over to the next.
fn run_prompt<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    format: OutputFormat,
) -> Result<()> {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "Use `:help' for interpreter command list.")?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).context("could not read from stdin")? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let source = line.trim_end_matches(['\n', '\r']);

        match ShellCommand::parse(source.trim()) {
            Some(ShellCommand::Exit) => return Ok(()),
            Some(ShellCommand::Help) => {
                for command in ShellCommand::ALL {
                    writeln!(out, "{}\t{}", command.name(), command.description())?;
                }
            }
            None => {
                let mut reporter = StderrReporter::new();
                let output = run("<stdin>", source, format, &mut out, &mut reporter)?;
                log::debug!("line produced {} errors", reporter.count());
                debug_assert_eq!(output.errors.len(), reporter.count());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CollectingReporter;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn run_to_string(
        source: &str,
        format: OutputFormat,
    ) -> (String, ScanOutput, CollectingReporter) {
        let mut out = Vec::new();
        let mut reporter = CollectingReporter::new();
        let output = run("test.lox", source, format, &mut out, &mut reporter).unwrap();
        (String::from_utf8(out).unwrap(), output, reporter)
    }

    fn prompt_with(input: &str, format: OutputFormat) -> String {
        let mut out = Vec::new();
        run_prompt(Cursor::new(input), &mut out, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn prompt(input: &str) -> String {
        prompt_with(input, OutputFormat::Tokens)
    }

    /// Accepts nothing; every write fails like a closed pipe
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_prints_one_token_per_line() {
        let (text, output, reporter) = run_to_string("var x = 1;", OutputFormat::Tokens);
        assert_eq!(
            text,
            "VAR var null\nIDENTIFIER x null\nEQUAL = null\nNUMBER 1 1.0\n\
             SEMICOLON ; null\nEOF  null\n"
        );
        assert_eq!(exit_code(&output), 0);
        assert!(reporter.reports.is_empty());
    }

    #[test]
    fn test_lexical_errors_exit_65() {
        let (text, output, reporter) = run_to_string("\"No end in sight", OutputFormat::Tokens);
        assert_eq!(text, "EOF  null\n");
        assert_eq!(exit_code(&output), EX_DATAERR);
        assert_eq!(reporter.reports, vec![(1, "Unterminated string.".to_string())]);

        let (_, output, _) = run_to_string("[", OutputFormat::Tokens);
        assert_eq!(output.tokens.len(), 1);
        assert_eq!(exit_code(&output), 65);
    }

    #[test]
    fn test_run_json() {
        let (text, _, _) = run_to_string("#", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["source"], "test.lox");
        assert_eq!(value["diagnostics"][0]["code"], "E0001");
    }

    #[test]
    fn test_prompt_scans_each_line() {
        let text = prompt("print 1;\n!=\n");
        assert_eq!(
            text,
            "plox@v0.1.0 (c) 2021 by Matt Hoiland\nUse `:help' for interpreter command list.\n\
             > PRINT print null\nNUMBER 1 1.0\nSEMICOLON ; null\nEOF  null\n\
             > BANG_EQUAL != null\nEOF  null\n\
             > \n"
        );
    }

    #[test]
    fn test_prompt_lines_are_independent() {
        // The second line starts again at line 1 despite the error before it
        let text = prompt("@\nx\n");
        assert!(text.contains("EOF  null\n> IDENTIFIER x null\nEOF  null\n"));
    }

    #[test]
    fn test_prompt_commands() {
        let text = prompt(":help\n:exit\nvar\n");
        assert!(text.contains(":exit\texits the interactive prompt\n"));
        assert!(text.contains(":help\tdisplays this help message\n"));
        assert!(!text.contains("VAR"));
        assert_eq!(ShellCommand::parse(":quit"), None);
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from(["plox", "script.lox", "--json"]).unwrap();
        assert_eq!(cli.script, Some(PathBuf::from("script.lox")));
        assert!(cli.json);

        let cli = Cli::try_parse_from(["plox"]).unwrap();
        assert_eq!(cli.script, None);

        let err = Cli::try_parse_from(["plox", "a.lox", "b.lox"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_missing_file_exits_66() {
        let code = run_file(Path::new("/nonexistent/plox/script.lox"), OutputFormat::Tokens);
        assert_eq!(code.unwrap(), EX_NOINPUT);
    }

    #[test]
    fn test_write_failure_is_not_a_missing_file() {
        let mut reporter = CollectingReporter::new();
        let err = run("test.lox", "x", OutputFormat::Tokens, &mut BrokenPipe, &mut reporter)
            .unwrap_err();
        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_prompt_json_is_one_line_per_input() {
        let text = prompt_with("1\n@\n", OutputFormat::JsonLine);
        let reports: Vec<serde_json::Value> = text
            .lines()
            .filter_map(|line| line.strip_prefix("> "))
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["success"], true);
        assert_eq!(reports[0]["tokens"][0]["literal"], 1.0);
        assert_eq!(reports[1]["success"], false);
        assert_eq!(reports[1]["diagnostics"][0]["line"], 1);
    }

    #[test]
    fn test_output_formats() {
        assert_eq!(OutputFormat::for_file(true), OutputFormat::Json);
        assert_eq!(OutputFormat::for_prompt(true), OutputFormat::JsonLine);
        assert_eq!(OutputFormat::for_prompt(false), OutputFormat::Tokens);
    }
}
