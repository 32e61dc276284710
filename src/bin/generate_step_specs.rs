use scrolly_chart::datagen::{CsvTable, GeneratorManifest, write_artifacts};
use scrolly_chart::telemetry::init_default_tracing;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: generate_step_specs --manifest <path> --output <dir>";

#[derive(Debug)]
struct CliArgs {
    manifest: PathBuf,
    output: PathBuf,
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = read_text(&args.manifest)?;
    let manifest = GeneratorManifest::from_json_str(&raw).map_err(|err| err.to_string())?;

    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new("."));
    let source = base_dir.join(&manifest.source);
    let table = CsvTable::from_text(&read_text(&source)?).map_err(|err| err.to_string())?;

    let artifacts = manifest.generate(&table).map_err(|err| err.to_string())?;
    let written = write_artifacts(&args.output, &artifacts).map_err(|err| err.to_string())?;

    let widget = manifest
        .widget_config()
        .to_json_pretty()
        .map_err(|err| err.to_string())?;
    let widget_path = args.output.join("widget.json");
    fs::write(&widget_path, widget)
        .map_err(|err| format!("failed to write `{}`: {err}", widget_path.display()))?;

    for path in written {
        println!("{}", path.display());
    }
    println!("{}", widget_path.display());
    Ok(())
}

fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut manifest = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--manifest" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --manifest".to_owned())?;
                manifest = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        manifest: manifest.ok_or_else(|| format!("missing --manifest\n{USAGE}"))?,
        output: output.ok_or_else(|| format!("missing --output\n{USAGE}"))?,
    })
}
