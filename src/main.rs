use clap::error::ErrorKind;
use clap::{ArgGroup, ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::process;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use check_json::document::{self, Source};
use check_json::dsl::display;
use check_json::dsl::parsing::{self, RawCheck};
use check_json::dsl::types::{AggregateResult, Severity};
use check_json::{evaluate_checks, select_base};

const PLUGIN_NAME: &str = "JSON API";

/// Monitoring plugin to check JSON APIs and files.
///
/// Values are extracted with JMESPath queries (https://jmespath.org/).
///
/// Examples:
///
///   check_json --file simple_dict.json --check-value "level;level;1;2"
///
///   check_json --file advanced_dict.json --check-text-ok "first_status;results[?component=='first'].status;ok"
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about, verbatim_doc_comment)]
#[clap(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
struct Args {
    /// URL of the JSON API
    #[clap(long, value_parser)]
    url: Option<String>,

    /// JSON file
    #[clap(long, value_parser)]
    file: Option<String>,

    /// Query applied to the document before any check
    #[clap(long, value_parser)]
    base: Option<String>,

    /// <label>;<query>[;<warning>[;<critical>[;<min>[;<max>[;<uom>]]]]]
    #[clap(long = "check-value", value_parser)]
    check_values: Vec<String>,

    /// <label>;<query>;<expected value>
    #[clap(long = "check-text-ok", value_parser)]
    check_text_oks: Vec<String>,

    /// HTTP timeout in seconds
    #[clap(long, value_parser, default_value_t = 10)]
    timeout: u64,

    /// Increase verbosity, may be repeated
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn source(args: &Args) -> Source {
    match (&args.url, &args.file) {
        (Some(url), _) => Source::Url {
            url: url.clone(),
            timeout: Duration::from_secs(args.timeout),
        },
        (None, Some(path)) => Source::File(path.clone()),
        (None, None) => unreachable!("clap requires either --url or --file"),
    }
}

/// Values of a repeatable flag paired with their command-line positions.
fn positioned(matches: &ArgMatches, id: &str) -> Vec<(usize, String)> {
    let indices = matches.indices_of(id).into_iter().flatten();
    let values = matches.get_many::<String>(id).into_iter().flatten().cloned();

    indices.zip(values).collect()
}

fn run(args: &Args, checks: &[RawCheck]) -> AggregateResult {
    let document = match document::load(&source(args)) {
        Ok(document) => document,
        Err(error) => return AggregateResult::fatal(PLUGIN_NAME, error.to_string()),
    };

    let document = match &args.base {
        Some(base) => match select_base(&document, base) {
            Ok(selected) => selected,
            Err(error) => return AggregateResult::fatal("base", error.to_string()),
        },
        None => document,
    };

    let checks = parsing::parse_checks(checks);

    evaluate_checks(&checks, &document)
}

fn argument_error(error: clap::Error) -> ! {
    if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        error.exit()
    }

    println!("{} - {}", Severity::Unknown, error.to_string().trim_end());
    process::exit(Severity::Unknown.exit_code());
}

fn main() {
    let matches = Args::command()
        .try_get_matches()
        .unwrap_or_else(|error| argument_error(error));
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|error| argument_error(error));

    init_logging(args.verbose);

    let checks = parsing::interleave(
        positioned(&matches, "check_values"),
        positioned(&matches, "check_text_oks"),
    );
    let result = run(&args, &checks);

    println!("{}", display::render(&result, args.verbose));
    process::exit(result.severity.exit_code());
}
