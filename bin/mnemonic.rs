use std::io::Write;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use slog::{debug, o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

use mnemonic_hash::{
    codegen,
    definition::{parse_definition, ParseError},
    generator::{GenerateError, Generator, SearchConfig},
    resolver, KeywordTable, Mnemonic, Vocabulary,
};

enum Error {
    Argument(String),
    Parse(String),
    Generate(GenerateError),
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<GenerateError> for Error {
    fn from(e: GenerateError) -> Error {
        Error::Generate(e)
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    let definition = Arg::with_name("definition")
        .help("Definition file to read the vocabulary from instead of the builtin one")
        .long("definition")
        .short("d")
        .value_name("FILE")
        .takes_value(true);

    App::new("mnemonic")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility for resolving mnemonics and generating their hash tables")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .help("Enables verbose logging")
                .long("verbose")
                .short("v")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("resolve")
                .about("Resolves words with the builtin table")
                .arg(
                    Arg::with_name("words")
                        .help("Words to resolve")
                        .value_name("WORD")
                        .required(true)
                        .multiple(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("table")
                .about("Generates a table and prints its statistics or source")
                .arg(definition.clone())
                .arg(
                    Arg::with_name("seed")
                        .help("Seed of the search")
                        .long("seed")
                        .value_name("SEED")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("max-weight")
                        .help("Largest association value tried in the first round")
                        .long("max-weight")
                        .value_name("WEIGHT")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("max-span")
                        .help("Largest accepted number of slots")
                        .long("max-span")
                        .value_name("SLOTS")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("rust")
                        .help("Print the table as Rust source")
                        .long("rust"),
                ),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Checks that a vocabulary hashes without collisions and every entry resolves")
                .arg(definition),
        )
        .get_matches()
}

fn create_logger(verbose: bool) -> Logger {
    if verbose {
        let decorator = TermDecorator::new().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!())
    } else {
        Logger::root(Discard, o!())
    }
}

fn main() {
    let args = parse_arguments();
    let logger = create_logger(args.is_present("verbose"));

    let result = match args.subcommand() {
        ("resolve", Some(sub)) => resolve(sub),
        ("table", Some(sub)) => table(sub, &logger),
        ("check", Some(sub)) => check(sub, &logger),
        _ => Ok(()),
    };

    match result {
        Ok(()) => (),
        Err(Error::Argument(msg)) => eprintln!("Argument error: {}", msg),
        Err(Error::Parse(msg)) => eprintln!("Parse error: {}", msg),
        Err(Error::Generate(e)) => eprintln!("Generation error: {}", e),
        Err(Error::IO(io)) => eprintln!("IO error: {}", io),
    }
}

fn resolve(args: &ArgMatches) -> Result<(), Error> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for word in args.values_of("words").into_iter().flatten() {
        match resolver::resolve_str(word) {
            Mnemonic::Invalid => match resolver::suggest(word) {
                Some(suggestion) => writeln!(out, "{}\tinvalid (did you mean '{}'?)", word, suggestion)?,
                None => writeln!(out, "{}\tinvalid", word)?,
            },
            mnemonic => writeln!(out, "{}\t{}", word, mnemonic.code())?,
        }
    }

    Ok(())
}

fn load_vocabulary(args: &ArgMatches) -> Result<Vocabulary<Mnemonic>, Error> {
    let path = match args.value_of("definition") {
        Some(path) => path,
        None => return Ok(Vocabulary::builtin()),
    };

    let source = std::fs::read_to_string(path)?;

    parse_definition(&source).map_err(|e: ParseError| {
        Error::Parse(format!("{}: {}", path, e.verbose(&source)))
    })
}

fn parse_number<T: std::str::FromStr>(args: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match args.value_of(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::Argument(format!("invalid value '{}' for --{}", value, name))),
    }
}

fn table(args: &ArgMatches, logger: &Logger) -> Result<(), Error> {
    let vocabulary = load_vocabulary(args)?;

    let mut config = SearchConfig::default();

    if let Some(seed) = parse_number(args, "seed")? {
        config.seed = seed;
    }

    if let Some(max_weight) = parse_number(args, "max-weight")? {
        config.max_weight = max_weight;
    }

    if let Some(max_span) = parse_number(args, "max-span")? {
        config.max_span = Some(max_span);
    }

    debug!(logger, "generating"; "keywords" => vocabulary.len(), "config" => ?config);

    let table = Generator::with_logger(config, logger.clone()).generate(&vocabulary)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.is_present("rust") {
        codegen::write_rust(&mut out, &table, "Mnemonic")?;
    } else {
        writeln!(out, "{}", table.stats())?;
    }

    Ok(())
}

fn check(args: &ArgMatches, logger: &Logger) -> Result<(), Error> {
    let vocabulary = load_vocabulary(args)?;
    let table: KeywordTable<Mnemonic> =
        Generator::with_logger(SearchConfig::default(), logger.clone()).generate(&vocabulary)?;

    table.verify()?;

    for entry in &vocabulary {
        if table.lookup(entry.text().as_bytes()) != entry.code() {
            return Err(Error::Generate(GenerateError::Unreachable {
                text: entry.text().to_string(),
            }));
        }
    }

    println!(
        "ok: {} keywords in {} slots",
        table.total_keywords(),
        table.max_hash_value() + 1
    );

    Ok(())
}
