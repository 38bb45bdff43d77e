use folio::{LayoutConfig, Pipeline, PipelineError};
use std::env;
use std::fs;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Lays out a JSON content tree and dumps the drawing operations as JSON.");
    eprintln!();
    eprintln!(
        "Usage: {} <path/to/content.json> [--config path/to/layout.json] [family=path/to/font.ttf ...]",
        program
    );
    process::exit(1);
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
    }

    let mut builder = Pipeline::builder();
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let Some(path) = rest.next() else {
                usage(&args[0]);
            };
            let config: LayoutConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
            log::info!("Using layout configuration from '{}'", path);
            builder = builder.with_config(config);
            continue;
        }
        let Some((family, path)) = arg.split_once('=') else {
            return Err(PipelineError::Config(format!(
                "Expected 'family=path' for font argument, got '{}'",
                arg
            )));
        };
        builder = builder.with_font_file(family, path)?;
    }

    let rendered = builder.build().render_file(&args[1])?;
    let output = serde_json::to_string_pretty(&rendered.to_json())?;
    println!("{}", output);
    Ok(())
}
