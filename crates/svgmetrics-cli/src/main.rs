use serde::Serialize;
use std::io::Read;
use svgmetrics::{Dimensions, Geometry, MeasureOptions, Measurer, Position, SizeSource};
use svgmetrics_core::Dpi;
use svgmetrics_markup::{LoadOptions, load_str};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Load(svgmetrics_markup::LoadError),
    Measure(svgmetrics::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Load(err) => write!(f, "{err}"),
            CliError::Measure(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgmetrics_markup::LoadError> for CliError {
    fn from(value: svgmetrics_markup::LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<svgmetrics::Error> for CliError {
    fn from(value: svgmetrics::Error) -> Self {
        Self::Measure(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Dimensions,
    Geometry,
    Has,
    Position,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    id: Option<String>,
    dpi: Option<f64>,
    pretty: bool,
}

#[derive(Serialize)]
struct DocumentDimensionsOut {
    width: i32,
    height: i32,
    exact_width: f64,
    exact_height: f64,
    source: SizeSource,
}

#[derive(Serialize)]
struct ElementDimensionsOut<'a> {
    id: &'a str,
    #[serde(flatten)]
    dimensions: Dimensions,
}

#[derive(Serialize)]
struct HasOut<'a> {
    id: &'a str,
    present: bool,
}

#[derive(Serialize)]
struct PositionOut<'a> {
    id: &'a str,
    #[serde(flatten)]
    position: Position,
}

#[derive(Serialize)]
struct GeometryOut<'a> {
    id: Option<&'a str>,
    #[serde(flatten)]
    geometry: Geometry,
}

fn usage() -> &'static str {
    "svgmetrics-cli\n\
\n\
USAGE:\n\
  svgmetrics-cli [dimensions] [--id <id>] [--dpi <n>] [--pretty] [<path>|-]\n\
  svgmetrics-cli geometry [--id <id>] [--dpi <n>] [--pretty] [<path>|-]\n\
  svgmetrics-cli has --id <id> [<path>|-]\n\
  svgmetrics-cli position --id <id> [--dpi <n>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Output is JSON on stdout; set SVGMETRICS_LOG (e.g. debug) for diagnostics on stderr.\n\
  - Exit codes: 0 ok, 1 error, 2 usage, 3 unknown element.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "dimensions" => args.command = Command::Dimensions,
            "geometry" => args.command = Command::Geometry,
            "has" => args.command = Command::Has,
            "position" => args.command = Command::Position,
            "--pretty" => args.pretty = true,
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.id = Some(id.clone());
            }
            "--dpi" => {
                let Some(dpi) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let dpi = dpi.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(dpi.is_finite() && dpi > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.dpi = Some(dpi);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Has | Command::Position) && args.id.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    let mut load_options = LoadOptions::default();
    let mut measure_options = MeasureOptions::default();
    if let Some(dpi) = args.dpi {
        load_options = load_options.with_dpi(Dpi::new(dpi, dpi));
        measure_options = measure_options.with_dpi(Dpi::new(dpi, dpi));
    }

    let document = load_str(&text, &load_options)?;
    let measurer = Measurer::new(&document).with_options(measure_options);
    let id = args.id.as_deref();

    match (args.command, id) {
        (Command::Dimensions, None) => {
            let size = measurer.document_size()?;
            let pixels = size.to_pixels();
            write_json(
                &DocumentDimensionsOut {
                    width: pixels.width,
                    height: pixels.height,
                    exact_width: size.width,
                    exact_height: size.height,
                    source: size.source,
                },
                args.pretty,
            )
        }
        (Command::Dimensions, Some(id)) => write_json(
            &ElementDimensionsOut {
                id,
                dimensions: measurer.element_dimensions(id)?,
            },
            args.pretty,
        ),
        (Command::Geometry, id) => write_json(
            &GeometryOut {
                id,
                geometry: measurer.geometry(id)?,
            },
            args.pretty,
        ),
        (Command::Has, Some(id)) => write_json(
            &HasOut {
                id,
                present: measurer.has_element(id),
            },
            args.pretty,
        ),
        (Command::Position, Some(id)) => write_json(
            &PositionOut {
                id,
                position: measurer.element_position(id)?,
            },
            args.pretty,
        ),
        (Command::Has | Command::Position, None) => Err(CliError::Usage(usage())),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SVGMETRICS_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err @ CliError::Measure(svgmetrics::Error::UnknownElement { .. })) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
