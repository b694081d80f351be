use std::{fs::OpenOptions, io::Read, ops::Range, process::ExitCode};

use clap::{command, Arg, ArgAction, ArgMatches, Command};
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use log::{error, info};
use pgn_parsers::{LexError, Lexer, LexerOptions, PgnErr, Scanner};

fn main() -> ExitCode {
    env_logger::init();

    let matches = create_command().get_matches();

    let result = match matches.subcommand() {
        Some(("tokens", args)) => handle_tokens_subcommand(args),
        Some(("render", args)) => handle_render_subcommand(args),
        Some((_, _)) => {
            unreachable!("clap should prevent coming to this branch");
        }
        None => {
            create_command().print_long_help().ok();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn create_command() -> Command {
    command!()
        .subcommand(
            Command::new("tokens")
                .about("tokenize a PGN file and report how many tokens it holds")
                .arg(pgn_file_arg())
                .arg(flag("list", "print every token"))
                .arg(flag("json", "print the tokens as a JSON array instead"))
                .arg(flag("brackets", "emit tokens for the tag pair brackets"))
                .arg(flag("eof", "finish the stream with an EOF token"))
                .arg(flag(
                    "strict",
                    "fail on characters that do not start any PGN construct",
                ))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("JSON file with lexer options, the flags above are added to it"),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("parse a PGN file and print it back in canonical form")
                .arg(pgn_file_arg()),
        )
}

fn pgn_file_arg() -> Arg {
    Arg::new("pgn file").required(true)
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn handle_tokens_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let file_name = args
        .get_one::<String>("pgn file")
        .expect("'pgn file' is required");
    let options = lexer_options(args)?;
    let pgn = read_file(file_name)?;

    let tokens = match Lexer::with_options(Scanner::new(&pgn), options).tokenize() {
        Err(err) => {
            report_lex_error(file_name, &pgn, &err);
            return Err(());
        }
        Ok(tokens) => tokens,
    };
    info!("tokenized {file_name} into {} tokens", tokens.len());

    if args.get_flag("json") {
        match serde_json::to_string_pretty(&tokens) {
            Err(err) => {
                error!("Failed to serialize tokens. Inner error: {err}");
                return Err(());
            }
            Ok(json) => println!("{json}"),
        }
        return Ok(());
    }

    if args.get_flag("list") {
        for token in tokens.iter() {
            println!("{token}");
        }
    }
    println!("Total tokens parsed: {}", tokens.len());
    Ok(())
}

fn handle_render_subcommand(args: &ArgMatches) -> Result<(), ()> {
    let file_name = args
        .get_one::<String>("pgn file")
        .expect("'pgn file' is required");
    let pgn = read_file(file_name)?;

    match pgn_parsers::parse_pgn(&pgn) {
        Err(PgnErr::Lex(err)) => {
            report_lex_error(file_name, &pgn, &err);
            Err(())
        }
        Err(PgnErr::Unmarshal(err)) => {
            let diagnostic = Diagnostic::error()
                .with_message(&format!("{file_name} is not a sequence of games: {err}"));
            emit(file_name, &pgn, &diagnostic);
            Err(())
        }
        Ok(parsed) => {
            info!("parsed {} games from {file_name}", parsed.games.len());
            print!("{parsed}");
            Ok(())
        }
    }
}

fn lexer_options(args: &ArgMatches) -> Result<LexerOptions, ()> {
    let options = match args.get_one::<String>("config") {
        None => LexerOptions::default(),
        Some(config_file) => {
            let config = read_file(config_file)?;
            serde_json::from_str::<LexerOptions>(&config).map_err(|err| {
                error!("Failed to parse lexer options in {config_file}. Inner error: {err}")
            })?
        }
    };

    Ok(options
        .with_tag_pair_brackets(options.tag_pair_brackets || args.get_flag("brackets"))
        .with_eof_token(options.eof_token || args.get_flag("eof"))
        .with_strict(options.strict || args.get_flag("strict")))
}

fn read_file(file_name: &str) -> Result<String, ()> {
    let mut file = match OpenOptions::new().read(true).write(false).open(file_name) {
        Err(err) => {
            error!("Failed to open {file_name}. Inner error: {err}");
            return Err(());
        }
        Ok(file) => file,
    };

    let mut contents = String::new();
    if let Err(err) = file.read_to_string(&mut contents) {
        error!("Failed to read {file_name}. Inner error: {err}");
        return Err(());
    }
    Ok(contents)
}

fn report_lex_error(file_name: &str, pgn: &str, err: &LexError) {
    let diagnostic = Diagnostic::error()
        .with_message(&err.kind().to_string())
        .with_code(err.kind().code())
        .with_label(
            Label::primary(0, char_span(pgn, err.offset()))
                .with_message(&format!("while reading {}", err.rule())),
        )
        .with_notes(vec![format!(
            "{} tokens were read before the error",
            err.partial_tokens().len()
        )]);
    emit(file_name, pgn, &diagnostic);
}

/// Span of the character at `offset`, or of the last character when the
/// input ended there.
fn char_span(pgn: &str, offset: usize) -> Range<usize> {
    let start = offset.min(pgn.len());
    match pgn[start..].chars().next() {
        Some(ch) => start..start + ch.len_utf8(),
        None => match pgn[..start].chars().next_back() {
            Some(ch) => start - ch.len_utf8()..start,
            None => start..start,
        },
    }
}

fn emit(file_name: &str, pgn: &str, diagnostic: &Diagnostic<usize>) {
    let mut files = SimpleFiles::new();
    files.add(file_name, pgn);

    let writer = StandardStream::stderr(ColorChoice::Always);
    let config = codespan_reporting::term::Config::default();
    term::emit(&mut writer.lock(), &config, &files, diagnostic).ok();
}
