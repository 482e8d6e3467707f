//! Command-line interface for tailo-rs.

use clap::{Parser, Subcommand, ValueEnum};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::{fs, time};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use tailo::{
    AmbiguousPolicy, ConvertOptions, Dictionary, Mode, OpenCcPool, OutputFormat, Tailo,
    TailoError, UnknownPolicy, contains_hanzi, text_to_ipa,
};

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum CliMode {
    #[default]
    Auto,
    Hanzi,
    Poj,
}

impl From<CliMode> for Mode {
    fn from(cli_mode: CliMode) -> Self {
        match cli_mode {
            CliMode::Auto => Mode::Auto,
            CliMode::Hanzi => Mode::Hanzi,
            CliMode::Poj => Mode::Poj,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum CliAmbiguous {
    #[default]
    First,
    All,
}

impl From<CliAmbiguous> for AmbiguousPolicy {
    fn from(cli: CliAmbiguous) -> Self {
        match cli {
            CliAmbiguous::First => AmbiguousPolicy::First,
            CliAmbiguous::All => AmbiguousPolicy::All,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum CliUnknown {
    #[default]
    Keep,
    Mark,
}

impl From<CliUnknown> for UnknownPolicy {
    fn from(cli: CliUnknown) -> Self {
        match cli {
            CliUnknown::Keep => UnknownPolicy::Keep,
            CliUnknown::Mark => UnknownPolicy::Mark,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum CliOutput {
    #[default]
    Tailo,
    Ipa,
}

impl From<CliOutput> for OutputFormat {
    fn from(cli: CliOutput) -> Self {
        match cli {
            CliOutput::Tailo => OutputFormat::Tailo,
            CliOutput::Ipa => OutputFormat::Ipa,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to open input file '{path}': {source}")]
    InputFileOpen { path: PathBuf, source: io::Error },

    #[error("Failed to create output file '{path}': {source}")]
    OutputFileCreate { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("REPL error: {0}")]
    Repl(#[from] ReadlineError),

    #[error(transparent)]
    Tailo(#[from] TailoError),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert text into Tâi-lô (台羅).")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Direct text input to be converted.
    #[arg(value_name = "TEXT")]
    direct_input: Vec<String>,

    /// Input file path (default: stdin).
    #[arg(short, long, value_name = "FILE")]
    input_filename: Option<PathBuf>,

    /// Output file path (default: stdout).
    #[arg(short, long, value_name = "FILE", global = true)]
    output_filename: Option<PathBuf>,

    /// Path to the pronunciation dictionary (default: ./dict.csv).
    #[arg(long, value_name = "FILE", global = true)]
    dict: Option<PathBuf>,

    /// OpenCC config for Simplified→Traditional conversion.
    #[arg(long, value_name = "CONFIG", default_value = "s2tw", global = true)]
    opencc: String,

    /// Disable Simplified→Traditional conversion.
    #[arg(long, action = clap::ArgAction::SetTrue, global = true)]
    no_opencc: bool,

    /// Skip POJ→Tâi-lô orthography rewrites (tone numbers still convert).
    #[arg(long, action = clap::ArgAction::SetTrue, global = true)]
    no_orthography: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = CliOutput::default(), global = true)]
    output: CliOutput,

    /// Conversion mode.
    #[arg(long, value_enum, default_value_t = CliMode::default())]
    mode: CliMode,

    /// How to render entries with multiple pronunciations.
    #[arg(long, value_enum, default_value_t = CliAmbiguous::default())]
    ambiguous: CliAmbiguous,

    /// How to handle Hanzi absent from the dictionary.
    #[arg(long, value_enum, default_value_t = CliUnknown::default())]
    unknown: CliUnknown,

    /// Convert input lines in parallel.
    #[arg(short = 'p', long = "use-parallel", action = clap::ArgAction::SetTrue)]
    use_parallel: bool,

    /// Run and display a few samples.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    sample: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a Hanzi headword and print its pronunciations.
    Lookup {
        /// Hanzi headword, e.g. 一
        word: String,
    },
}

impl Cli {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            mode: self.mode.into(),
            orthography: !self.no_orthography,
            ambiguous: self.ambiguous.into(),
            unknown: self.unknown.into(),
            output: self.output.into(),
        }
    }

    fn dict_path(&self) -> PathBuf {
        self.dict.clone().unwrap_or_else(|| PathBuf::from("dict.csv"))
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        if is_broken_pipe(&err) {
            return;
        }

        eprintln!("{err}");
        std::process::exit(exit_code(&err));
    }
}

fn is_broken_pipe(err: &CliError) -> bool {
    match err {
        CliError::Io(e) | CliError::Tailo(TailoError::Io(e)) => {
            e.kind() == io::ErrorKind::BrokenPipe
        }
        _ => false,
    }
}

fn exit_code(err: &CliError) -> i32 {
    match err {
        CliError::Tailo(TailoError::SourceNotFound { .. })
        | CliError::Tailo(TailoError::EmptyDictionary { .. }) => 2,
        _ => 1,
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut opencc = OpenCcPool::default();

    if let Some(Command::Lookup { word }) = &cli.command {
        return run_lookup(&cli, word, &mut opencc);
    }

    if cli.direct_input.is_empty()
        && cli.input_filename.is_none()
        && !cli.sample
        && io::stdin().is_terminal()
    {
        return run_repl(&cli, &mut opencc);
    }

    if cli.sample
        && cli.direct_input.is_empty()
        && cli.input_filename.is_none()
        && cli.output_filename.is_none()
    {
        return show_samples();
    }

    let text = read_input(&cli)?;
    let out = convert_text(&cli, &text, &mut opencc)?;

    let mut writer = get_writer(&cli.output_filename)?;
    writeln!(writer, "{out}")?;
    writer.flush()?;

    if cli.sample {
        println!(
            "Note: The --sample option was ignored because input was provided via other flags."
        );
    }

    Ok(())
}

fn read_input(cli: &Cli) -> Result<String, CliError> {
    if !cli.direct_input.is_empty() {
        return Ok(cli.direct_input.join(" "));
    }

    let mut text = String::new();
    match &cli.input_filename {
        Some(path) => {
            let mut file = fs::File::open(path).map_err(|e| CliError::InputFileOpen {
                path: path.clone(),
                source: e,
            })?;
            file.read_to_string(&mut text)?;
        }
        None => {
            io::stdin().read_to_string(&mut text)?;
        }
    }

    // Drop one final newline so the output gains exactly one from writeln.
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Hanzi segmentation (and the S2T step that precedes it) only happens in
/// hanzi mode, or in auto mode once Hanzi is actually present.
fn needs_dictionary(mode: Mode, text: &str) -> bool {
    match mode {
        Mode::Hanzi => true,
        Mode::Auto => contains_hanzi(text),
        Mode::Poj => false,
    }
}

fn load_dictionary(cli: &Cli) -> Result<Dictionary, TailoError> {
    Dictionary::from_csv_path(&cli.dict_path(), !cli.no_orthography)
}

fn maybe_to_traditional(
    cli: &Cli,
    text: &str,
    opencc: &mut OpenCcPool,
) -> Result<String, CliError> {
    if cli.no_opencc {
        return Ok(text.to_string());
    }
    Ok(opencc.convert(text, &cli.opencc)?)
}

fn convert_text(cli: &Cli, text: &str, opencc: &mut OpenCcPool) -> Result<String, CliError> {
    let options = cli.convert_options();

    let (text, converter) = if needs_dictionary(options.mode, text) {
        let text = maybe_to_traditional(cli, text, opencc)?;
        (text, Tailo::with_dictionary(load_dictionary(cli)?, options))
    } else {
        (text.to_string(), Tailo::new(options))
    };

    if cli.use_parallel {
        Ok(converter.convert_parallel(&text)?)
    } else {
        Ok(converter.convert(&text)?)
    }
}

fn run_lookup(cli: &Cli, word: &str, opencc: &mut OpenCcPool) -> Result<(), CliError> {
    let word = if cli.no_opencc {
        word.to_string()
    } else {
        opencc.convert(word, &cli.opencc)?
    };

    let options = ConvertOptions {
        mode: Mode::Hanzi,
        ..cli.convert_options()
    };
    let output: OutputFormat = cli.output.into();
    let converter = Tailo::with_dictionary(load_dictionary(cli)?, options);

    let mut writer = get_writer(&cli.output_filename)?;
    match converter.lookup(&word) {
        Ok(pronunciations) => {
            for pronunciation in pronunciations {
                let line = match output {
                    OutputFormat::Ipa => text_to_ipa(pronunciation),
                    OutputFormat::Tailo => pronunciation.clone(),
                };
                writeln!(writer, "{line}")?;
            }
        }
        Err(TailoError::HeadwordNotFound { .. }) => {
            // Not fatal: note the miss, then segment the headword anyway.
            eprintln!("(not found) {word}");
            let out = converter.convert(&word)?;
            writeln!(writer, "{out}")?;
        }
        Err(e) => return Err(e.into()),
    }
    writer.flush()?;
    Ok(())
}

fn get_writer(path: &Option<PathBuf>) -> Result<Box<dyn Write>, CliError> {
    match path {
        Some(p) => {
            let file = fs::File::create(p).map_err(|e| CliError::OutputFileCreate {
                path: p.clone(),
                source: e,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn convert_repl_line(
    cli: &Cli,
    line: &str,
    converter: &mut Option<Tailo>,
    opencc: &mut OpenCcPool,
) -> Result<String, CliError> {
    let options = cli.convert_options();
    let needs_dict = needs_dictionary(options.mode, line);

    // Build the converter on first use; upgrade it with a dictionary the
    // first time a line actually needs one.
    let needs_rebuild = converter
        .as_ref()
        .map_or(true, |c| needs_dict && c.dictionary().is_none());
    if needs_rebuild {
        *converter = Some(if needs_dict {
            Tailo::with_dictionary(load_dictionary(cli)?, options)
        } else {
            Tailo::new(options)
        });
    }
    let Some(conv) = converter.as_ref() else {
        unreachable!()
    };

    let text = if needs_dict {
        maybe_to_traditional(cli, line, opencc)?
    } else {
        line.to_string()
    };
    Ok(conv.convert(&text)?)
}

fn run_repl(cli: &Cli, opencc: &mut OpenCcPool) -> Result<(), CliError> {
    let mut rl = DefaultEditor::new()?;

    let history_path = || -> Option<PathBuf> {
        let mut path = dirs::cache_dir()?;
        path.push("tailo-rs");
        fs::create_dir_all(&path).ok()?;
        path.push("history.txt");
        Some(path)
    };

    if let Some(path) = history_path()
        && rl.load_history(&path).is_err()
    {}

    let mut converter: Option<Tailo> = None;

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                rl.add_history_entry(&line)?;

                if line.trim() == ":exit" || line.trim() == ":quit" {
                    break;
                }

                if line.trim().is_empty() {
                    continue;
                }

                match convert_repl_line(cli, &line, &mut converter, opencc) {
                    Ok(output) => println!("{output}"),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. To exit, press Ctrl-D or type :exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("REPL Error: {err}");
                break;
            }
        }
    }

    if let Some(path) = history_path()
        && let Err(err) = rl.save_history(&path)
    {
        eprintln!("Warning: could not save history to {path:?}: {err}");
    }

    Ok(())
}

fn show_samples() -> Result<(), CliError> {
    println!("Running sample conversions with tailo-rs:");
    println!("---------------------------------------");

    let samples = [
        "chit8 e5 lang5",
        "goa2 ai3 li2",
        "kiaN2 boe7 toa7",
        "Tai5-oan5 oe7",
        "m7-thang1 kiaN1",
    ];

    let poj = Tailo::new(ConvertOptions {
        mode: Mode::Poj,
        ..ConvertOptions::default()
    });

    let max_width = samples
        .iter()
        .map(|s| UnicodeWidthStr::width(*s))
        .max()
        .unwrap_or(0);
    let mut total_duration_ns: u128 = 0;

    for text in samples.iter() {
        let start = time::Instant::now();
        let tailo = poj.convert(text)?;
        let ipa = text_to_ipa(&tailo);
        total_duration_ns += start.elapsed().as_nanos();

        let padding = " ".repeat(max_width - UnicodeWidthStr::width(*text));
        println!("{text}{padding} -> {tailo}  |  {ipa}");
    }

    println!("---------------------------------------");

    let num_samples = samples.len() as u128;
    if num_samples > 0 {
        let avg_duration_ns = total_duration_ns / num_samples;
        let avg_duration_us = avg_duration_ns as f64 / 1_000.0;
        let avg_duration_ms = avg_duration_us / 1_000.0;

        println!(
            "Avg. processing time: {avg_duration_ms:.3} ms ({avg_duration_us:.1} μs) per sample"
        );
    }

    Ok(())
}
