use clap::{Parser, Subcommand};
use media_iiif::iiif::{self, IiifObject};
use media_iiif::service::IiifService;
use media_iiif::{catalog, config, export, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "media-iiif")]
#[command(about = "IIIF Presentation 2.0 manifests for a course media library")]
#[command(long_about = "\
IIIF Presentation 2.0 manifests for a course media library

Every collection of the catalog becomes a manifest; courses become
sc:Collection listings. Documents are printed as JSON, or exported as a
static tree any web server can host:

  dist/
  ├── index.json                   # {\"collections\": ...}
  ├── collections.json             # one sc:Collection per course
  ├── collection/1.json            # one sc:Manifest member per collection
  └── manifest/9.json              # the manifest of collection 9

Object URLs inside a manifest follow the routes:

  manifest/{id}
  manifest/{id}/{sequence|canvas|annotation|resource}/{object_id}

Run 'media-iiif gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Catalog JSON file
    #[arg(long, default_value = "catalog.json", global = true)]
    catalog: PathBuf,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Pretty-print JSON (4-space indent, sorted keys)
    #[arg(long, global = true)]
    pretty: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the manifest of a collection, or one object inside it
    Manifest {
        /// Collection id
        id: u64,
        /// Object type: manifest, sequence, canvas, annotation, resource
        #[arg(long, requires = "object_id")]
        object_type: Option<String>,
        /// Object id, e.g. a canvas id like 12.0
        #[arg(long, requires = "object_type")]
        object_id: Option<String>,
    },
    /// Print the top-level collection of all courses
    Collections,
    /// Print the collection listing of one course
    Collection {
        /// Course id
        course: u64,
    },
    /// Print the service index
    Index,
    /// Show a manifest as a readable tree
    Show {
        /// Collection id
        id: u64,
    },
    /// Write every document to a static directory tree
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Validate config and catalog without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "media_iiif=debug".to_string()
        } else {
            "media_iiif=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Manifest {
            id,
            object_type,
            object_id,
        } => {
            let (service, pretty) = open_service(&cli)?;
            let id = *id;
            let object = object_type.as_deref().zip(object_id.as_deref());
            let value = service
                .load(id, object)?
                .ok_or_else(|| not_found(id, object))?;
            println!("{}", iiif::to_json(&value, pretty)?);
        }
        Command::Collections => {
            let (service, pretty) = open_service(&cli)?;
            println!("{}", service.collections().to_json(pretty)?);
        }
        Command::Collection { course } => {
            let (service, pretty) = open_service(&cli)?;
            println!("{}", service.course_collection(*course)?.to_json(pretty)?);
        }
        Command::Index => {
            let (service, pretty) = open_service(&cli)?;
            println!("{}", iiif::to_json(&service.index(), pretty)?);
        }
        Command::Show { id } => {
            let (service, _) = open_service(&cli)?;
            output::print_manifest_tree(&service.manifest(*id)?);
        }
        Command::Export { output: out_dir } => {
            let (service, pretty) = open_service(&cli)?;
            let summary = export::export(&service, out_dir, pretty)?;
            output::print_export_output(&summary, out_dir);
        }
        Command::Check => {
            println!("==> Checking {}", cli.catalog.display());
            let (service, _) = open_service(&cli)?;
            let urls = media_iiif::urls::RouteUrls::from_config(&service.config().server);
            output::print_catalog_output(service.catalog(), &urls)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and catalog, returning the service and the effective pretty flag.
fn open_service(cli: &Cli) -> Result<(IiifService, bool), Box<dyn std::error::Error>> {
    let service_config = config::load_config(&cli.config_dir)?;
    let pretty = cli.pretty || service_config.output.pretty;
    init_thread_pool(&service_config.processing);
    let catalog = load_catalog(&cli.catalog)?;
    Ok((IiifService::new(catalog, service_config), pretty))
}

/// Load the catalog and probe dimensions of local files it references.
///
/// Source paths resolve against the catalog's own directory.
fn load_catalog(path: &Path) -> Result<catalog::Catalog, catalog::CatalogError> {
    let mut catalog = catalog::load_catalog(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let probed = catalog.resolve_dimensions(root);
    if probed > 0 {
        tracing::info!(count = probed, "Resolved image dimensions from source files");
    }
    Ok(catalog)
}

fn not_found(id: u64, object: Option<(&str, &str)>) -> String {
    match object {
        Some((object_type, object_id)) => {
            format!("No {object_type} '{object_id}' in manifest {id}")
        }
        None => format!("Manifest {id} not found"),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
