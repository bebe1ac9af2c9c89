use anyhow::{bail, Context};
use cpwkit::{init_logging, Config, RecipeFile, BUILD_DATE, VERSION};
use std::path::PathBuf;
use tracing::info;

const USAGE: &str = "usage: cpwkit <recipe.json|recipe.toml> <output.dxf|output.json|output.scr> [--config <file>]";

#[derive(Debug, PartialEq)]
struct Args {
    recipe: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

/// What the command line asks for.
#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
    Version,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut positional = Vec::new();
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config needs a file\n{}", USAGE),
            },
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(recipe), Some(output), None) => Ok(Command::Run(Args {
            recipe,
            output,
            config,
        })),
        _ => bail!(USAGE),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let args = match parse_args(std::env::args().skip(1))? {
        Command::Run(args) => args,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Version => {
            println!("cpwkit {} ({})", VERSION, BUILD_DATE);
            return Ok(());
        }
    };

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let recipes = RecipeFile::load_from_file(&args.recipe)
        .with_context(|| format!("Failed to load recipe {}", args.recipe.display()))?;

    let summary = recipes.run(&config, &args.output)?;
    for report in &summary.meanders {
        info!(
            "meander: {} periods, ends on {:?}, length {:.6}",
            report.periods, report.ending, report.length
        );
    }
    info!(
        "Wrote {} paths ({:.3} total length) to {}",
        summary.paths,
        summary.total_length,
        summary.output.display()
    );
    Ok(())
}
