use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_bridge_core::validate_grammar;
use command_bridge_db::{
    BridgeContext, GrammarSet, TemplateBundle, load_operations_dir,
};
use command_bridge_engine::{ParseOptions, UnknownOptionPolicy};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "command-bridge")]
#[command(about = "Translate command lines between equivalent programs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate a source command line into a destination program's equivalent.
    Translate(TranslateArgs),
    /// Parse a command line under its grammar and dump the tree.
    Parse(ParseArgs),
    /// Compile grammars and operations into a persisted template bundle.
    Build(BuildArgs),
    /// Validate grammar documents and compiled template libraries.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct TranslateArgs {
    /// Directory of grammar documents (JSON/YAML).
    #[arg(long)]
    grammars: PathBuf,
    /// Directory of operation documents. Mutually exclusive with --bundle.
    #[arg(long, conflicts_with = "bundle")]
    operations: Option<PathBuf>,
    /// Previously built template bundle. Mutually exclusive with --operations.
    #[arg(long)]
    bundle: Option<PathBuf>,
    /// Destination program.
    #[arg(long)]
    to: String,
    /// Fail on unrecognized options instead of dropping them.
    #[arg(long)]
    strict: bool,
    /// Source command line, starting with the program name.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Directory of grammar documents (JSON/YAML).
    #[arg(long)]
    grammars: PathBuf,
    /// Fail on unrecognized options instead of dropping them.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Command line to parse, starting with the program name.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Directory of grammar documents (JSON/YAML).
    #[arg(long)]
    grammars: PathBuf,
    /// Directory of operation documents.
    #[arg(long)]
    operations: PathBuf,
    /// Output bundle path.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Directory of grammar documents (JSON/YAML).
    #[arg(long)]
    grammars: PathBuf,
    /// Directory of operation documents to compile against the grammars.
    #[arg(long)]
    operations: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Translate(args) => run_translate(args),
        Command::Parse(args) => run_parse(args),
        Command::Build(args) => run_build(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn parse_options(strict: bool) -> ParseOptions {
    ParseOptions {
        unknown_options: if strict {
            UnknownOptionPolicy::Error
        } else {
            UnknownOptionPolicy::Drop
        },
    }
}

fn run_translate(args: TranslateArgs) -> Result<(), String> {
    let grammars = GrammarSet::from_dir(&args.grammars)
        .map_err(|err| format!("loading grammars from '{}': {err}", args.grammars.display()))?;

    let context = match (&args.operations, &args.bundle) {
        (Some(operations_dir), None) => {
            let docs = load_operations_dir(operations_dir).map_err(|err| {
                format!("loading operations from '{}': {err}", operations_dir.display())
            })?;
            let (libraries, formats) = grammars
                .compile(&docs)
                .map_err(|err| format!("compiling templates: {err}"))?;
            BridgeContext::new(grammars, libraries, formats)
        }
        (None, Some(bundle_path)) => {
            let bundle = TemplateBundle::load(bundle_path).map_err(|err| {
                format!("loading bundle '{}': {err}", bundle_path.display())
            })?;
            BridgeContext::from_bundle(grammars, bundle)
        }
        _ => return Err("specify exactly one of --operations or --bundle".to_string()),
    };
    let context = context.with_parse_options(parse_options(args.strict));

    match context
        .translate(&args.args, &args.to)
        .map_err(|err| err.to_string())?
    {
        Some(rendered) => {
            println!("{}", rendered.command);
            if !rendered.unresolved.is_empty() {
                eprintln!("warning: unresolved placeholders: {}", rendered.unresolved.join(", "));
            }
            Ok(())
        }
        None => Err(format!(
            "no mapping from '{}' to {}",
            args.args.join(" "),
            args.to
        )),
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let grammars = GrammarSet::from_dir(&args.grammars)
        .map_err(|err| format!("loading grammars from '{}': {err}", args.grammars.display()))?;

    let program = args.args.first().map(String::as_str).unwrap_or_default();
    let grammar = grammars
        .get(program)
        .ok_or_else(|| format!("no grammar for program: {program}"))?;

    let node = command_bridge_engine::parse_with(&args.args, grammar, parse_options(args.strict))
        .map_err(|err| err.to_string())?;

    let text = match args.format {
        CliOutputFormat::Json => {
            serde_json::to_string_pretty(&node).map_err(|err| err.to_string())?
        }
        CliOutputFormat::Yaml => serde_yaml::to_string(&node).map_err(|err| err.to_string())?,
    };
    println!("{text}");
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let grammars = GrammarSet::from_dir(&args.grammars)
        .map_err(|err| format!("loading grammars from '{}': {err}", args.grammars.display()))?;
    let docs = load_operations_dir(&args.operations).map_err(|err| {
        format!("loading operations from '{}': {err}", args.operations.display())
    })?;
    let (libraries, formats) = grammars
        .compile(&docs)
        .map_err(|err| format!("compiling templates: {err}"))?;

    let mut bundle = TemplateBundle::new(PACKAGE_VERSION, &unix_timestamp());
    bundle.libraries = libraries;
    bundle.formats = formats;
    bundle
        .save(&args.output)
        .map_err(|err| format!("writing bundle '{}': {err}", args.output.display()))?;

    println!(
        "wrote {} libraries, {} formats to {}",
        bundle.libraries.len(),
        bundle.formats.len(),
        args.output.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let grammars = GrammarSet::from_dir(&args.grammars)
        .map_err(|err| format!("loading grammars from '{}': {err}", args.grammars.display()))?;

    // from_dir already rejects invalid grammars; re-run per grammar so the
    // report lists every program checked.
    let mut programs: Vec<&str> = grammars.programs().collect();
    programs.sort_unstable();
    for program in &programs {
        if let Some(grammar) = grammars.get(program) {
            let errors = validate_grammar(grammar);
            if !errors.is_empty() {
                return Err(format!("grammar {program}: {}", errors[0]));
            }
            println!("grammar {program}: ok");
        }
    }

    if let Some(operations_dir) = &args.operations {
        let docs = load_operations_dir(operations_dir).map_err(|err| {
            format!("loading operations from '{}': {err}", operations_dir.display())
        })?;
        let (libraries, _) = grammars
            .compile(&docs)
            .map_err(|err| format!("compiling templates: {err}"))?;
        for (program, library) in &libraries {
            println!("library {program}: {} templates ok", library.len());
        }
    }

    Ok(())
}

fn unix_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default()
}
