use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::error;

use xlimage::utils::logger::Logger;
use xlimage::commands::{CommandFactory, XlImageCommandFactory};

fn main() {
    let matches = ClapCommand::new("xlimage")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Extract embedded images from Excel workbooks (xlsx and xls)")
        .arg(
            Arg::new("input")
                .help("Input workbook files ('-' reads from stdin)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Analyze container structure instead of extracting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print analysis results as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("simple")
                .short('s')
                .long("simple")
                .help("Emit only data URIs per image")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output JSON file (defaults to stdout)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("save-dir")
                .long("save-dir")
                .help("Save extracted images into this directory")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("encoding")
                .short('e')
                .long("encoding")
                .help("Input transport encoding (raw, base64, data-uri, json, auto)")
                .value_name("ENCODING")
                .default_value("auto")
                .required(false),
        )
        .arg(
            Arg::new("filename")
                .long("filename")
                .help("Filename hint for format detection of a single input")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (TOML)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("convert")
                .long("convert")
                .help("Convert legacy .xls workbooks with an office suite instead of scanning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("reencode")
                .long("reencode")
                .help("Re-encode every image as this format (png, jpeg, gif, webp, bmp)")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("min-size")
                .long("min-size")
                .help("Minimum size in bytes for scanned images")
                .value_name("BYTES")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file path")
                .value_name("FILE")
                .default_value("xlimage.log")
                .required(false),
        )
        .get_matches();

    let log_file = matches
        .get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or("xlimage.log");
    let verbose = matches.get_flag("verbose");

    if let Err(e) = Logger::init_global_logger(log_file, verbose) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let summary_log = format!("{}.summary", log_file);
    let logger = match Logger::new(&summary_log) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = XlImageCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
