use std::io::Write;
use std::path::Path;

use tessera::gpu::{NativeObjectManager, RecordingExecutor, RenderContext};
use tessera::manifest::ProgramManifest;
use tessera::options::Options;
use tessera::TesseraError;

const USAGE: &str =
    "Usage: tessera-preprocess <manifest.toml> [options.toml] | --schema";

/// Run a full compile/link cycle on a recording executor and print the
/// exact source every stage was compiled from.
fn preprocess(
    manifest_path: &Path,
    options_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), TesseraError> {
    let options = match options_path {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let manifest = ProgramManifest::load(manifest_path)?;
    let mut program = manifest.build()?;

    let mut ctx = RenderContext::new(&options);
    let mut gpu = RecordingExecutor::new();
    let mut objects = NativeObjectManager::new();
    program.bind(&mut ctx, &mut gpu, &mut objects)?;
    log::info!(
        "{} linked: {} stages, {} executor calls",
        manifest.name,
        program.stages().len(),
        gpu.calls().len()
    );

    let compiled = program.stages().iter().zip(gpu.compiled_sources());
    for (stage, (_, source)) in compiled {
        writeln!(out, "// ==== {stage} ====")?;
        out.write_all(source.as_bytes())?;
        if !source.ends_with('\n') {
            writeln!(out)?;
        }
    }

    program.delete_object(&mut ctx, &mut gpu, &mut objects);
    Ok(())
}

fn print_schema(out: &mut impl Write) -> Result<(), TesseraError> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())
        .map_err(|e| TesseraError::OptionsParse(e.to_string()))?;
    writeln!(out, "{schema}")?;
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match args.as_slice() {
        [flag] if flag == "--schema" => print_schema(&mut out),
        [manifest] => preprocess(Path::new(manifest), None, &mut out),
        [manifest, options] => {
            preprocess(Path::new(manifest), Some(Path::new(options)), &mut out)
        }
        _ => {
            log::error!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
