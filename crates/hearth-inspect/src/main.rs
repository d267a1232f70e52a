//! hearth-inspect — command-line viewer for BIF resource archives.
//!
//! Lists the resource table of an archive, as text or JSON, and extracts
//! single resources by index.
//!
//! ```text
//! hearth-inspect data/templates.bif
//! hearth-inspect data/templates.bif --json --raw-ids
//! hearth-inspect data/templates.bif --extract 12 --output door.utd
//! ```
//!
//! Set `RUST_LOG` (or pass `--verbose`) for loader diagnostics.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use hearth::archive::{BifFile, BifVersion};
use serde::Serialize;

// ── Options ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hearth-inspect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "List and extract resources from BIF archives", long_about = None)]
struct Cli {
    /// BIF archive to read
    archive: PathBuf,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,

    /// Keep and show each entry's on-disk resource ID
    #[arg(long)]
    raw_ids: bool,

    /// Extract the resource at INDEX instead of listing
    #[arg(short = 'x', long, value_name = "INDEX", requires = "output")]
    extract: Option<usize>,

    /// Where to write the extracted resource
    #[arg(short, long, value_name = "PATH", requires = "extract")]
    output: Option<PathBuf>,

    /// Log loader diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

// ── Output types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Listing {
    version: Option<BifVersion>,
    resources: Vec<Row>,
}

#[derive(Serialize)]
struct Row {
    index: usize,
    offset: u32,
    size: u32,
    file_type: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_id: Option<u32>,
}

impl Listing {
    fn new(bif: &BifFile) -> Self {
        let resources = bif
            .resources()
            .iter()
            .enumerate()
            .map(|(index, res)| Row {
                index,
                offset: res.offset,
                size: res.size,
                file_type: res.file_type.raw(),
                extension: res.file_type.extension(),
                raw_id: res.raw_id,
            })
            .collect();
        Self {
            version: bif.version(),
            resources,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut bif = BifFile::new().with_raw_ids(cli.raw_ids);
    bif.load_path(&cli.archive)
        .with_context(|| format!("cannot read archive '{}'", cli.archive.display()))?;

    if let (Some(index), Some(output)) = (cli.extract, cli.output.as_deref()) {
        return extract(&bif, &cli.archive, index, output);
    }

    let listing = Listing::new(&bif);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &listing)?;
        writeln!(out)?;
    } else {
        print_table(&mut out, &listing, cli.raw_ids)?;
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn extract(bif: &BifFile, archive: &Path, index: usize, output: &Path) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("cannot reopen '{}'", archive.display()))?;
    let data = bif
        .read_resource(&mut BufReader::new(file), index)
        .with_context(|| format!("cannot read resource {index}"))?;
    fs::write(output, &data)
        .with_context(|| format!("cannot write '{}'", output.display()))?;
    log::info!("Extracted resource {index} ({} bytes) to {}", data.len(), output.display());
    Ok(())
}

fn print_table(out: &mut impl Write, listing: &Listing, raw_ids: bool) -> io::Result<()> {
    if raw_ids {
        writeln!(out, "{:>6}  {:>10}  {:>10}  {:>10}  type", "index", "id", "offset", "size")?;
    } else {
        writeln!(out, "{:>6}  {:>10}  {:>10}  type", "index", "offset", "size")?;
    }

    for row in &listing.resources {
        let ty = match row.extension {
            Some(ext) => format!("{ext} ({})", row.file_type),
            None => row.file_type.to_string(),
        };
        if raw_ids {
            let id = row.raw_id.map_or_else(|| "-".to_string(), |id| format!("{id:#010x}"));
            writeln!(out, "{:>6}  {:>10}  {:>10}  {:>10}  {ty}", row.index, id, row.offset, row.size)?;
        } else {
            writeln!(out, "{:>6}  {:>10}  {:>10}  {ty}", row.index, row.offset, row.size)?;
        }
    }

    let version = match listing.version {
        Some(BifVersion::V1) => "V1",
        Some(BifVersion::V11) => "V1.1",
        None => "?",
    };
    writeln!(out, "\n{} resources, BIF {version}", listing.resources.len())
}
