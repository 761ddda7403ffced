use argh::FromArgs;
use lineage_crdgen::jenny::CrdYamlJenny;
use lineage_crdgen::kinds::{core_kinds, select};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(FromArgs)]
/// Generate CRD manifests for the schema lineages of all core kinds.
struct Args {
    /// directory generated files are written to
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output: PathBuf,
    /// directory below the output directory holding the kinds
    #[argh(option, default = "String::from(\"kinds\")")]
    parent: String,
    /// only generate the kind with this machine name, can be repeated
    #[argh(option)]
    kind: Vec<String>,
    /// print manifests to stdout instead of writing files
    #[argh(switch)]
    stdout: bool,
    /// log failing kinds and continue with the rest
    #[argh(switch)]
    keep_going: bool,
}

fn main() {
    init_logging();
    let args: Args = argh::from_env();

    let kinds = core_kinds().expect("Could not load core kinds");
    let jenny = CrdYamlJenny::new(&args.parent);
    let selected = match select(&kinds, &args.kind) {
        Ok(selected) => selected,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    let mut failed = 0;
    for kind in selected {
        let result = jenny.generate(kind).and_then(|file| {
            if args.stdout {
                let mut out = std::io::stdout().lock();
                out.write_all(b"---\n")?;
                out.write_all(&file.data)?;
                Ok(None)
            } else {
                file.write_to(&args.output).map(Some)
            }
        });
        match result {
            Ok(Some(path)) => tracing::info!(
                "Generated CRD for {} at {}",
                kind.properties.name,
                path.display()
            ),
            Ok(None) => tracing::info!("Printed CRD for {} to stdout", kind.properties.name),
            Err(e) => {
                tracing::error!("{e}");
                failed += 1;
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Could not init logging");

    let subscriber = tracing_subscriber::registry().with(filter);

    let log_mode = std::env::var("LOGGING_MODE").unwrap_or_else(|_| "plain".to_string());
    if log_mode.to_lowercase() == "json" {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
