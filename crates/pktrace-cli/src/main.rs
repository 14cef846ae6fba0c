use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glob::glob;
use pktrace_core::packet::layer;
use pktrace_core::{
    DecoderConfig, FindError, MatchOptions, Matched, Packet, PathSpec, Phase, Trace,
    TraceOptions, find_file,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const VERBOSE_SUMMARY: u8 = 1;
const VERBOSE_LAYERS: u8 = 2;
const VERBOSE_JSON: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "pktrace")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Search and decode NFS/RPC packet captures.",
    long_about = None,
    after_help = "Examples:\n  pktrace match capture.pcap -e 'nfs.op == NFSPROC3_CREATE' --reply\n  pktrace find 'traces/*.pcap' --path DH:0x0102/dir/file\n  pktrace show capture.pcap --index 12 -v 6"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PKTRACE_BUILD_COMMIT"),
    " ",
    env!("PKTRACE_BUILD_DATE"),
    ")"
);

#[derive(Args, Debug)]
struct CommonArgs {
    /// Capture files or glob patterns; several inputs are merged by timestamp
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output mask: 1 summary line, 2 every layer, 4 JSON
    #[arg(short, long, default_value_t = VERBOSE_SUMMARY)]
    verbose: u8,

    /// Reject enumeration values with no known name
    #[arg(long)]
    strict_enums: bool,

    /// Print enumeration values as numbers only
    #[arg(long)]
    numeric_enums: bool,

    /// Report scan progress on stderr
    #[arg(long)]
    showprog: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print packets matching an expression.
    Match {
        #[command(flatten)]
        common: CommonArgs,

        /// Match expression, e.g. "rpc.xid == 0x1234 and nfs.status != 0"
        #[arg(short = 'e', long = "expr")]
        expr: String,

        /// Also print the replies to matched calls
        #[arg(long)]
        reply: bool,

        /// Do not read past this frame index
        #[arg(long)]
        maxindex: Option<u64>,

        /// Stop after this many matches
        #[arg(long)]
        count: Option<usize>,
    },
    /// Follow one file through the trace by path.
    #[command(
        after_help = "Path forms:\n  DH:0x<hex handle>/dir/name   start from a known directory handle\n  name                         match a bare name in any directory"
    )]
    Find {
        #[command(flatten)]
        common: CommonArgs,

        /// File to follow
        #[arg(long)]
        path: String,
    },
    /// Decode and print packets.
    Show {
        #[command(flatten)]
        common: CommonArgs,

        /// Print only the frame with this 1-based index
        #[arg(long)]
        index: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let showprog = match &cli.command {
        Commands::Match { common, .. }
        | Commands::Find { common, .. }
        | Commands::Show { common, .. } => common.showprog,
    };
    init_logging(showprog);

    let result = match cli.command {
        Commands::Match {
            common,
            expr,
            reply,
            maxindex,
            count,
        } => cmd_match(common, &expr, reply, maxindex, count),
        Commands::Find { common, path } => cmd_find(common, &path),
        Commands::Show { common, index } => cmd_show(common, index),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(showprog: bool) {
    let default = if showprog { "warn,pktrace_core=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_match(
    common: CommonArgs,
    expr: &str,
    reply: bool,
    maxindex: Option<u64>,
    count: Option<usize>,
) -> Result<(), CliError> {
    let mut trace = open_trace(&common)?;
    let options = MatchOptions {
        rewind: false,
        reply,
        maxindex,
    };

    let mut found = 0usize;
    while count.is_none_or(|limit| found < limit) {
        let matched = trace.match_expr(expr, options).map_err(|err| match err {
            pktrace_core::TraceError::Match(err) => CliError::new(
                format!("invalid expression: {err}"),
                Some(format!("{expr}\n      {}^", " ".repeat(err.offset()))),
            ),
            other => CliError::from(anyhow::Error::new(other).context("scan failed")),
        })?;
        let Some(matched) = matched else {
            break;
        };
        print_matched(&matched, common.verbose)?;
        found += 1;
    }

    report_skipped(&trace);
    if found == 0 {
        eprintln!("no packets matched");
    }
    debug!(found, position = trace.position(), "match finished");
    Ok(())
}

fn cmd_find(common: CommonArgs, path: &str) -> Result<(), CliError> {
    let spec: PathSpec = path.parse().map_err(|err: FindError| {
        CliError::new(
            err.to_string(),
            Some("use DH:0x<hex handle>/dir/name or a bare name".to_string()),
        )
    })?;
    let mut trace = open_trace(&common)?;
    let report = find_file(&mut trace, &spec)
        .with_context(|| format!("search for {spec} failed"))?;

    for matched in &report.matches {
        print_matched(matched, common.verbose)?;
    }
    report_skipped(&trace);

    if report.suppressed > 0 {
        eprintln!(
            "{} unrelated TEST_STATEID packet(s) suppressed",
            report.suppressed
        );
    }
    if report.phase != Phase::Tracking {
        let stage = match report.phase {
            Phase::DirectoryLookup => "a directory component",
            _ => "the file name",
        };
        return Err(CliError::new(
            format!("{spec} not found in trace"),
            Some(format!(
                "no successful reply resolved {stage}; check the path or the directory handle"
            )),
        ));
    }
    Ok(())
}

fn cmd_show(common: CommonArgs, index: Option<u64>) -> Result<(), CliError> {
    let mut trace = open_trace(&common)?;

    if let Some(index) = index {
        let packet = trace
            .get(index)
            .with_context(|| format!("failed to decode frame {index}"))?
            .ok_or_else(|| {
                CliError::new(
                    format!("frame {index} is not in the trace"),
                    Some("frame indexes start at 1".to_string()),
                )
            })?;
        return print_packet(&packet, common.verbose, None);
    }

    while let Some(packet) = trace.next_packet().context("read failed")? {
        print_packet(&packet, common.verbose, None)?;
    }
    report_skipped(&trace);
    Ok(())
}

fn open_trace(common: &CommonArgs) -> Result<Trace, CliError> {
    if common.verbose == 0 || common.verbose > VERBOSE_SUMMARY | VERBOSE_LAYERS | VERBOSE_JSON {
        return Err(CliError::new(
            format!("invalid verbose mask {}", common.verbose),
            Some("combine 1 (summary), 2 (layers) and 4 (JSON), e.g. -v 3".to_string()),
        ));
    }
    if common.strict_enums && common.numeric_enums {
        return Err(CliError::new(
            "cannot use --strict-enums and --numeric-enums together",
            Some("choose one enumeration mode".to_string()),
        ));
    }

    let mut paths = Vec::new();
    for input in &common.inputs {
        paths.extend(resolve_input_paths(input)?);
    }
    let options = TraceOptions {
        decoder: DecoderConfig {
            strict_enums: common.strict_enums,
            numeric_enums: common.numeric_enums,
        },
        showprog: common.showprog,
    };
    let trace = Trace::open(&paths, options).map_err(|err| {
        CliError::new(
            format!("cannot open trace: {err}"),
            Some("inputs must be .pcap or .pcapng captures".to_string()),
        )
    })?;
    debug!(files = paths.len(), "trace opened");
    Ok(trace)
}

fn report_skipped(trace: &Trace) {
    if trace.skipped() > 0 {
        warn!(skipped = trace.skipped(), "frames could not be decoded");
    }
}

fn print_matched(matched: &Matched, verbose: u8) -> Result<(), CliError> {
    let call = match (&matched.call, matched.reply_matched) {
        (Some(call), true) => Some(call.index),
        _ => None,
    };
    print_packet(&matched.packet, verbose, call)
}

fn print_packet(packet: &Packet, verbose: u8, call: Option<u64>) -> Result<(), CliError> {
    if verbose & VERBOSE_SUMMARY != 0 {
        let mut line = summary_line(packet);
        if let Some(call) = call {
            line.push_str(&format!(" (reply to {call})"));
        }
        println!("{line}");
    }
    if verbose & VERBOSE_LAYERS != 0 {
        for layer in packet.layers() {
            println!("    {}: {}", layer.name(), layer.record());
        }
    }
    if verbose & VERBOSE_JSON != 0 {
        let json = serde_json::to_string_pretty(packet).context("JSON serialization failed")?;
        println!("{json}");
    }
    Ok(())
}

fn summary_line(packet: &Packet) -> String {
    let mut line = format!("{} {}", packet.index, format_timestamp(packet.timestamp));
    if let (Some(src), Some(dst)) = (packet.get("ip.src"), packet.get("ip.dst")) {
        line.push_str(&format!(" {src} -> {dst}"));
    }

    if let (Some(proc), Some(xid)) = (packet.get("rpcordma.proc"), packet.get("rpcordma.xid")) {
        let xid = xid.as_u64().unwrap_or_default();
        line.push_str(&format!(" RPCoRDMA {proc} xid=0x{xid:08x}"));
        if !packet.has_layer(layer::RPC) {
            return line;
        }
    }

    let Some(xid) = packet.xid() else {
        let names: Vec<_> = packet.layers().iter().map(|layer| layer.name()).collect();
        line.push_str(&format!(" {}", names.join("/")));
        return line;
    };
    let kind = if packet.is_call() { "call" } else { "reply" };
    line.push_str(&format!(" RPC {kind} xid=0x{xid:08x}"));

    for name in [layer::NFS, layer::NLM] {
        if !packet.has_layer(name) {
            continue;
        }
        let version = packet
            .get("rpc.version")
            .map(|v| v.to_string())
            .unwrap_or_default();
        line.push_str(&format!(" {}v{version}", name.to_uppercase()));
        let ops: Vec<_> = if packet.is_call() {
            packet.lookup(&format!("{name}.op"))
        } else {
            let results = packet.lookup(&format!("{name}.resop"));
            if results.is_empty() {
                packet.lookup(&format!("{name}.op"))
            } else {
                results
            }
        };
        if !ops.is_empty() {
            let ops: Vec<_> = ops.iter().map(|op| op.to_string()).collect();
            line.push_str(&format!(" {}", ops.join(",")));
        }
        if let Some(status) = packet.get(&format!("{name}.status")) {
            line.push_str(&format!(" {status}"));
        }
    }
    line
}

fn format_timestamp(timestamp: f64) -> String {
    let nanos = (timestamp * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{timestamp:.6}"))
}

fn resolve_input_paths(input: &PathBuf) -> Result<Vec<PathBuf>, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        if !input.exists() {
            return Err(CliError::new(
                format!("input file not found: {}", input.display()),
                Some("use a .pcap or .pcapng file".to_string()),
            ));
        }
        if !input.is_file() {
            return Err(CliError::new(
                format!("input is not a file: {}", input.display()),
                Some("use a .pcap or .pcapng file".to_string()),
            ));
        }
        return Ok(vec![input.clone()]);
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    matches.sort();
    debug!(pattern = %pattern, files = matches.len(), "expanded input pattern");
    Ok(matches)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
