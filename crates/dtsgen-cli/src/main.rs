use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use dtsgen_core::config::{self, CONFIG_FILE_NAME, DtsgenConfig, Wrapper};
use dtsgen_core::ir::ShapeForest;
use dtsgen_core::parse;
use dtsgen_core::parse::document::SchemaDocument;
use dtsgen_core::transform::{self, TransformOptions};
use dtsgen_typescript::GenerateOptions;

#[derive(Parser)]
#[command(
    name = "dtsgen",
    about = "Generate TypeScript declarations from schema definitions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a declaration file from a schema document
    Generate(GenerateArgs),

    /// Validate that a schema document resolves and transforms
    Validate {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the named shapes built from a schema document
    Inspect {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Use camelCase property names and PascalCase type names
        #[arg(long)]
        camel_case: bool,
    },

    /// Initialize a new dtsgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// Path to the schema document (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, `-` for stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use camelCase property names and PascalCase type names
    #[arg(long)]
    camel_case: bool,

    /// Wrapper: `namespace`, `module`, or a block header such as "export namespace Api"
    #[arg(long, conflicts_with = "no_wrapper")]
    wrapper: Option<String>,

    /// Emit declarations without an enclosing block
    #[arg(long)]
    no_wrapper: bool,

    /// Omit the "auto-generated" banner
    #[arg(long)]
    no_warning: bool,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args, Path::new(CONFIG_FILE_NAME)),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect {
            input,
            format,
            camel_case,
        } => cmd_inspect(&input, format, camel_case),

        Commands::Init { force } => cmd_init(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "dtsgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config file, falling back to defaults when it is absent.
fn load_project_config(path: &Path) -> Result<DtsgenConfig> {
    let cfg = config::load_config(path).map_err(anyhow::Error::msg)?;
    Ok(cfg.unwrap_or_default())
}

/// Read a schema document, choosing the parser by file extension.
fn read_document(path: &Path) -> Result<SchemaDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let document = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(document)
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(mut cfg: DtsgenConfig, args: &GenerateArgs) -> DtsgenConfig {
    if let Some(ref input) = args.input {
        cfg.input = input.display().to_string();
    }
    if let Some(ref output) = args.output {
        cfg.output = output.display().to_string();
    }
    if args.camel_case {
        cfg.camel_case = true;
    }
    if let Some(ref wrapper) = args.wrapper {
        cfg.wrapper = Wrapper::parse(wrapper);
    }
    if args.no_wrapper {
        cfg.wrapper = Wrapper::None;
    }
    if args.no_warning {
        cfg.warning = false;
    }
    cfg
}

fn generate_options(cfg: &DtsgenConfig) -> GenerateOptions {
    GenerateOptions {
        camel_case: cfg.camel_case,
        wrapper: cfg.wrapper.clone(),
        warning: cfg.warning,
        property_mapper: None,
    }
}

fn build_forest(document: &SchemaDocument, camel_case: bool) -> Result<ShapeForest> {
    let forest = transform::transform_with_options(document, &TransformOptions { camel_case })?;
    Ok(forest)
}

fn cmd_generate(args: GenerateArgs, config_path: &Path) -> Result<()> {
    let cfg = apply_overrides(load_project_config(config_path)?, &args);
    let input = PathBuf::from(&cfg.input);
    let document = read_document(&input)?;

    let output = dtsgen_typescript::generate(&document, &generate_options(&cfg))
        .with_context(|| format!("failed to generate declarations from {}", input.display()))?;

    if cfg.output == "-" {
        print!("{output}");
        return Ok(());
    }

    let output_path = PathBuf::from(&cfg.output);
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(&output_path, &output)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    eprintln!(
        "Generated {} from {} (wrapper: {})",
        output_path.display(),
        input.display(),
        cfg.wrapper
    );
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let document = read_document(input)?;
    let definitions = document.definitions_root().map_or(0, |root| root.len());
    eprintln!("Valid schema document: {}", input.display());
    eprintln!("  Definitions: {definitions}");

    let forest = build_forest(&document, false)?;
    eprintln!("  Declarations: {}", forest.len());
    eprintln!("  Inlined: {}", forest.inlined().count());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat, camel_case: bool) -> Result<()> {
    let document = read_document(input)?;
    let forest = build_forest(&document, camel_case)?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&forest)?;
            print!("{yaml}");
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&forest)?;
            println!("{json}");
        }
    }

    Ok(())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
