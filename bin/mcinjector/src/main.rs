use mcinjector::inject::{Error, Injector, Settings};
use mcinjector::mappings::MappingTable;

use clap::{value_parser, Arg, ArgMatches, Command};
use std::fs::File;
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = Command::new("MCInjector")
        .version(clap::crate_version!())
        .author("Alec Theriault <alec.theriault@gmail.com>")
        .about("Inject exceptions and parameter names into the classes of a JAR")
        .arg(
            Arg::new("INPUT")
                .help("Input JAR")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("Output JAR (overwritten if it exists)")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("MAPFILE")
                .help("Mapping file with exceptions and parameter names")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(3),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write a full log of the run to this file"),
        )
        .arg(
            Arg::new("outmap")
                .long("outmap")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write the exceptions and parameter names of every method to this file"),
        )
        .arg(
            Arg::new("index")
                .long("index")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .default_value("0")
                .help("First constructor index for generated names (0 turns generation off)"),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .value_name("PREFIX")
                .default_value(Settings::DEFAULT_NAMESPACE)
                .help("Class name prefix of the classes being named"),
        )
        .get_matches();

    if let Err(err) = init_logging(&matches).and_then(|()| run(&matches)) {
        log::error!("{}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}

/// Log to stderr as configured by `RUST_LOG`, or everything to a file if one was given
fn init_logging(matches: &ArgMatches) -> Result<(), Error> {
    match matches.get_one::<PathBuf>("log") {
        None => env_logger::init(),
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                Error::io(format!("Could not open log file: {}", path.display()), err)
            })?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never)
                .init();
        }
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let input = path_arg(matches, "INPUT");
    let output = path_arg(matches, "OUTPUT");
    let map_file = path_arg(matches, "MAPFILE");
    let index = matches.get_one::<u32>("index").copied().unwrap_or(0);

    let mut settings = Settings::new(index);
    if let Some(namespace) = matches.get_one::<String>("namespace") {
        settings.managed_namespace = namespace.clone();
    }

    let mappings = MappingTable::load(&map_file)?;
    if let Some(max_index) = mappings.max_index() {
        if index > 0 && index < max_index {
            log::warn!(
                "Starting index {} is below the max index {} recorded in {}",
                index,
                max_index,
                map_file.display()
            );
        }
    }

    let mut injector = Injector::new(settings, mappings);
    injector.process_jar(&input, &output)?;
    if let Some(out_map) = matches.get_one::<PathBuf>("outmap") {
        injector.save_mappings(out_map)?;
    }

    println!("Processed {}", input.display());
    Ok(())
}

/// Required positional path (clap has already rejected the invocation if it's missing)
fn path_arg(matches: &ArgMatches, name: &str) -> PathBuf {
    matches.get_one::<PathBuf>(name).cloned().unwrap_or_default()
}
