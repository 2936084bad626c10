use std::error::Error;
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::exit;

use clap::{crate_name, crate_version, App, Arg, ArgMatches, SubCommand};
use log::{info, warn};

use cedict::config::{Config, OutputFormat};
use cedict::pinyin::{to_tone_marks, to_toneless};
use cedict::tokenizer::{CEDict, CedictErr};

// Subcommand names
const DUMP_SUB_CMD: &str = "dump";
const PINYIN_SUB_CMD: &str = "pinyin";

// Argument names
const FPATH_SETTING_ARG: &str = "fpath_setting";
const FORMAT_ARG: &str = "format";
const IN_FILES_ARG: &str = "in_files";
const PLAIN_ARG: &str = "plain";
const PRINT_ALL_ARG: &str = "print_all";
const QUIET_ARG: &str = "quiet";
const SKIP_INVALID_ARG: &str = "skip_invalid";
const SYLLABLES_ARG: &str = "syllables";
const VERBOSE_ARG: &str = "verbose";

fn unwrap<T, E: Error>(t: Result<T, E>) -> T {
  match t {
    Ok(t) => t,
    Err(e) => {
      eprintln!("{}: error: {}", crate_name!(), e);
      exit(1);
    }
  }
}

struct DumpOptions {
  format: OutputFormat,
  print_all: bool,
  skip_invalid: bool,
}

fn dump_entries<R: BufRead, W: Write>(
  reader: R,
  writer: &mut W,
  options: &DumpOptions,
) -> Result<usize, CedictErr> {
  let mut cedict = CEDict::new(reader);
  let mut count = 0;
  loop {
    match cedict.next_entry() {
      Ok(()) => {
        if let Some(entry) = cedict.entry() {
          match options.format {
            OutputFormat::Tsv => writeln!(writer, "{}", entry.to_string(options.print_all).join("\t"))?,
            OutputFormat::Json => writeln!(writer, "{}", entry.to_json())?,
          }
          count += 1;
        }
      }
      Err(CedictErr::EndOfStream) => return Ok(count),
      Err(e @ CedictErr::ParseEntryErr { .. }) if options.skip_invalid => warn!("{}", e),
      Err(e) => return Err(e),
    }
  }
}

fn dump(args: &ArgMatches) {
  let config = unwrap(Config::setup(args.value_of(FPATH_SETTING_ARG)));
  let options = DumpOptions {
    format: match args.value_of(FORMAT_ARG) {
      Some(format) => unwrap(format.parse::<OutputFormat>()),
      None => unwrap(config.output_format()),
    },
    print_all: args.is_present(PRINT_ALL_ARG) || unwrap(config.print_all()),
    skip_invalid: args.is_present(SKIP_INVALID_ARG) || unwrap(config.skip_invalid_lines()),
  };

  let out = stdout();
  let mut writer = BufWriter::new(out.lock());
  let mut count = 0;
  match args.values_of(IN_FILES_ARG) {
    Some(in_files) => {
      for in_file in in_files {
        info!("reading {}...", in_file);
        let reader = BufReader::new(unwrap(File::open(in_file)));
        count += unwrap(dump_entries(reader, &mut writer, &options));
      }
    }
    None => {
      info!("reading stdin...");
      let input = stdin();
      count += unwrap(dump_entries(input.lock(), &mut writer, &options));
    }
  }
  unwrap(writer.flush());
  info!("{} entries", count);
}

fn pinyin(args: &ArgMatches) {
  let syllables: Vec<&str> = args
    .values_of(SYLLABLES_ARG)
    .map(|v| v.collect())
    .unwrap_or_default();
  let syllables = syllables.join(" ");
  if args.is_present(PLAIN_ARG) {
    println!("{}", to_toneless(&syllables));
  } else {
    println!("{}", to_tone_marks(&syllables));
  }
}

fn in_files_validator(in_file: String) -> Result<(), String> {
  if Path::new(&in_file).is_file() {
    Ok(())
  } else {
    Err(format!(
      "{}: error: {} doesn't exist",
      crate_name!(),
      in_file
    ))
  }
}

fn main() {
  let dump_subcommand = SubCommand::with_name(DUMP_SUB_CMD)
    .about("Parse CC-CEDICT files and print their entries")
    .arg(
      Arg::with_name(FPATH_SETTING_ARG)
        .short("r")
        .takes_value(true)
        .help("the setting file in JSON format"),
    )
    .arg(
      Arg::with_name(FORMAT_ARG)
        .short("f")
        .takes_value(true)
        .possible_values(&["tsv", "json"])
        .help("the output format"),
    )
    .arg(
      Arg::with_name(PRINT_ALL_ARG)
        .short("a")
        .help("also print the tone marked and toneless pinyin"),
    )
    .arg(
      Arg::with_name(SKIP_INVALID_ARG)
        .short("s")
        .help("skip badly formatted lines instead of stopping"),
    )
    .arg(
      Arg::with_name(IN_FILES_ARG)
        .takes_value(true)
        .multiple(true)
        .help("dictionary files written in utf-8 (default: stdin)")
        .validator(in_files_validator),
    );

  let pinyin_subcommand = SubCommand::with_name(PINYIN_SUB_CMD)
    .about("Render numbered pinyin with tone marks")
    .arg(
      Arg::with_name(PLAIN_ARG)
        .short("p")
        .help("print the toneless form instead"),
    )
    .arg(
      Arg::with_name(SYLLABLES_ARG)
        .takes_value(true)
        .multiple(true)
        .required(true)
        .help("syllables such as `yi1 lan3 zi5`"),
    );

  let mut app = App::new("CC-CEDICT reader")
    .version(crate_version!())
    .arg(
      Arg::with_name(VERBOSE_ARG)
        .short("v")
        .multiple(true)
        .global(true)
        .help("increase message verbosity"),
    )
    .arg(
      Arg::with_name(QUIET_ARG)
        .short("q")
        .global(true)
        .help("silence all messages"),
    )
    .subcommand(dump_subcommand)
    .subcommand(pinyin_subcommand);
  let matches = app.clone().get_matches();

  unwrap(
    stderrlog::new()
      .module(module_path!())
      .quiet(matches.is_present(QUIET_ARG))
      .verbosity(1 + matches.occurrences_of(VERBOSE_ARG) as usize)
      .init(),
  );

  match matches.subcommand() {
    (DUMP_SUB_CMD, Some(dump_matches)) => dump(dump_matches),
    (PINYIN_SUB_CMD, Some(pinyin_matches)) => pinyin(pinyin_matches),
    _ => {
      app.print_help().expect("Unable to write help");
      println!();
    }
  }
}
