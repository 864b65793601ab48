use serde::Serialize;
use shardmap::render::{
    ForceLayoutEngine, HeadlessError, JsonInputs, PositionedGraph, RenderError,
};
use shardmap::{
    ClusterSnapshot, Filter, FilterKind, Hierarchy, IndexCatalog, LayoutKind, UnknownFilterValue,
    ViewConfig, ViewRequest, filter_snapshot,
};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Shardmap(HeadlessError),
    Json(serde_json::Error),
    EmptyView(UnknownFilterValue),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Shardmap(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::EmptyView(notice) => write!(f, "Empty view: {notice}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Shardmap(value)
    }
}

impl From<shardmap::Error> for CliError {
    fn from(value: shardmap::Error) -> Self {
        Self::Shardmap(value.into())
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Shardmap(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Filter,
    Values,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    definitions: Option<String>,
    config: Option<String>,
    filter_type: Option<String>,
    filter_value: Option<String>,
    layout: Option<String>,
    steps: Option<usize>,
    pretty: bool,
}

#[derive(Serialize)]
struct FilterOut<'a> {
    snapshot: &'a ClusterSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    filter: String,
    graph: &'a PositionedGraph,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

fn usage() -> &'static str {
    "shardmap-cli\n\
\n\
USAGE:\n\
  shardmap-cli [layout] [--filter-type none|rolling|index] [--filter-value all|<name>] [--layout tree|force] [--steps <n>] [--definitions <path>] [--config <path>] [--pretty] [<path>|-]\n\
  shardmap-cli filter [--filter-type none|rolling|index] [--filter-value all|<name>] [--definitions <path>] [--pretty] [<path>|-]\n\
  shardmap-cli values [--filter-type none|rolling|index] [--definitions <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - <path> is a cluster snapshot JSON file; if omitted or '-', it is read from stdin.\n\
  - --definitions reads {\"indices\": {...}, \"sizes\": {...}}; without it, rolling patterns are inferred from index names.\n\
  - --config reads view config overrides (JSON), merged onto the defaults.\n\
  - --steps stops a force layout after <n> ticks instead of running it until it cools down.\n\
  - An unknown filter value prints the (empty) result and exits with status 3.\n\
  - Set RUST_LOG (e.g. RUST_LOG=shardmap_core=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        let mut value = || it.next().cloned().ok_or(CliError::Usage(usage()));
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "filter" => args.command = Command::Filter,
            "values" => args.command = Command::Values,
            "--pretty" => args.pretty = true,
            "--definitions" => args.definitions = Some(value()?),
            "--config" => args.config = Some(value()?),
            "--filter-type" => args.filter_type = Some(value()?),
            "--filter-value" => args.filter_value = Some(value()?),
            "--layout" => args.layout = Some(value()?),
            "--steps" => {
                let steps = value()?
                    .parse::<usize>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.steps = Some(steps);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
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

fn read_optional(path: Option<&str>) -> Result<Option<String>, CliError> {
    path.map(std::fs::read_to_string).transpose().map_err(CliError::from)
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

fn request_from(args: &Args) -> Result<ViewRequest, CliError> {
    let filter = Filter::parse(
        args.filter_type.as_deref().unwrap_or("none"),
        args.filter_value.as_deref().unwrap_or("all"),
    )?;
    let layout = LayoutKind::parse(args.layout.as_deref().unwrap_or("tree"))?;
    Ok(ViewRequest::new(filter, layout))
}

fn load(args: &Args) -> Result<(ClusterSnapshot, IndexCatalog, ViewConfig), CliError> {
    let snapshot = read_input(args.input.as_deref())?;
    let definitions = read_optional(args.definitions.as_deref())?;
    let config = read_optional(args.config.as_deref())?;
    Ok(shardmap::render::load_json(JsonInputs {
        snapshot: &snapshot,
        definitions: definitions.as_deref(),
        config: config.as_deref(),
    })?)
}

fn run(args: Args) -> Result<(), CliError> {
    let (snapshot, catalog, config) = load(&args)?;

    match args.command {
        Command::Values => {
            let kind = FilterKind::parse(args.filter_type.as_deref().unwrap_or("index"))?;
            write_json(&Filter::available_values(kind, &catalog), args.pretty)?;
            Ok(())
        }
        Command::Filter => {
            let request = request_from(&args)?;
            let filtered = filter_snapshot(&snapshot, &request.filter, &catalog);
            let out = FilterOut {
                snapshot: &filtered.snapshot,
                notice: filtered.unknown_value.as_ref().map(ToString::to_string),
            };
            write_json(&out, args.pretty)?;
            filtered.unknown_value.map_or(Ok(()), |n| Err(CliError::EmptyView(n)))
        }
        Command::Layout => {
            let request = request_from(&args)?;
            let (graph, notice) = match (request.layout, args.steps) {
                (LayoutKind::Force, Some(steps)) => {
                    let filtered = filter_snapshot(&snapshot, &request.filter, &catalog);
                    let hierarchy = Hierarchy::from_snapshot(&filtered.snapshot);
                    let mut session = ForceLayoutEngine::start(&hierarchy, &config)?;
                    let mut graph = session.frame();
                    for _ in 0..steps {
                        match session.step() {
                            Some(frame) => graph = frame,
                            None => break,
                        }
                    }
                    tracing::debug!(steps = session.steps(), alpha = session.alpha(), "force stepped");
                    graph.overlay =
                        shardmap::render::rolling_overlay(&graph, &request.filter, &catalog, &config);
                    (graph, filtered.unknown_value)
                }
                _ => {
                    let view = shardmap::render::layout_view(&snapshot, &request, &catalog, &config)?;
                    (view.graph, view.notice)
                }
            };
            let out = LayoutOut {
                filter: request.filter.to_string(),
                graph: &graph,
                notice: notice.as_ref().map(ToString::to_string),
            };
            write_json(&out, args.pretty)?;
            notice.map_or(Ok(()), |n| Err(CliError::EmptyView(n)))
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
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

    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::EmptyView(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
