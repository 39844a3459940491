use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use catalog::Catalog;

mod enrich;
mod infobox;
mod signal;
mod wiki;

use enrich::{EnrichOptions, Outcome};

const DEFAULT_ITEMS_FILE: &str = "data/items.json";

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args: Vec<String> = env::args().collect();

	let mut items_file = PathBuf::from(DEFAULT_ITEMS_FILE);
	let mut opts = EnrichOptions::default();

	let mut index = 1;
	while index < args.len() {
		match args[index].as_str() {
			"--items-file" | "-f" => {
				let file = args.get(index + 1).expect("No items file specified");
				index += 1;
				items_file = PathBuf::from(file);
			}
			"--start" | "-s" => {
				opts.id_range.start = args
					.get(index + 1)
					.expect("No start id specified")
					.parse()
					.expect("Start id should be a number");
				index += 1;
			}
			"--end" | "-e" => {
				opts.id_range.end = args
					.get(index + 1)
					.expect("No end id specified")
					.parse()
					.expect("End id should be a number");
				index += 1;
			}
			"--refetch" | "-r" => {
				opts.refetch = true;
			}
			"--help" | "-h" => {
				eprintln!("Usage: wikiscrape [args]\n\n  --items-file or -f    Catalog JSON file to enrich. Default: {DEFAULT_ITEMS_FILE}\n  --start      or -s    First item id to consider. Default: 0\n  --end        or -e    One past the last item id to consider. Default: 21049\n  --refetch    or -r    Re-fetch items that were already wiki mapped.\n  --help       or -h    Display this message instead of running.");
				process::exit(1)
			}
			other => {
				eprintln!(
					"Unknown command line option: {}.\nRun with --help (or -h) for valid commands.",
					other
				);
				process::exit(1)
			}
		};

		index += 1;
	}

	signal::install();

	let mut catalog = Catalog::load(&items_file)?;
	log::info!("loaded {} items from {}", catalog.len(), items_file.display());

	let mut client = wiki::WikiClient::new();
	let outcome = enrich::run(&mut catalog, &opts, &signal::INTERRUPTED, |record| {
		client.fetch(record)
	});

	match &outcome {
		Outcome::Completed => log::info!("enrichment pass complete"),
		Outcome::Interrupted => log::warn!("interrupted, writing current data to file"),
		Outcome::Failed(err) => {
			log::error!("error in enrichment pass, writing current data to file: {err:#}");
		}
	}

	// The save runs no matter how the pass ended, so merged data survives.
	catalog.save(&items_file)?;
	log::info!("saved {} items to {}", catalog.len(), items_file.display());

	Ok(())
}
