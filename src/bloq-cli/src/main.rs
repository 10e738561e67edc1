use std::fs::File;
use std::io::{self, BufReader};
use std::process;

use anyhow::{bail, Context, Result};
use bloq_cli::cli::{parse_args, Cli};
use bloq_cli::{Config, QueryDocument, Runner};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args();
    let config = load_config(&args)?;
    setup_logging(&config);

    let runner = Runner::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list_functions {
        return runner.list_functions(&mut out);
    }

    let Some(query_path) = &args.query else {
        bail!("no query file given");
    };
    let doc = QueryDocument::load_from_file(query_path)?;

    if args.targets {
        return runner.print_targets(&doc, &mut out);
    }

    let stats = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            runner.run(&doc, BufReader::new(file), &mut out)?
        }
        None => runner.run(&doc, io::stdin().lock(), &mut out)?,
    };

    if let Some(stats) = stats {
        eprintln!(
            "records: {}, failures: {}, time: {:?}",
            stats.records_processed, stats.failures, stats.execution_time
        );
    }
    Ok(())
}

fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.apply_cli(args)?;
    Ok(config)
}

fn setup_logging(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .init();
}
