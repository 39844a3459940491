use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use catalog::{Catalog, ItemRecord, Stats};
use serde_json::Value;

/// One parsed infobox from a wiki page.
///
/// `Item` fields are flat record overrides; `Bonuses` fields are equipment
/// data where `slot` and `attack_speed` live on the record itself and every
/// other key goes under `stats`.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
	Item(BTreeMap<String, Value>),
	Bonuses(BTreeMap<String, Value>),
}

/// Everything the wiki had for one item. No patches means the page had no
/// usable data, which is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
	pub patches: Vec<Patch>,
}

impl Enrichment {
	pub fn is_empty(&self) -> bool {
		self.patches.is_empty()
	}
}

pub struct EnrichOptions {
	/// Item ids to walk. The catalog tops out just above 21k.
	pub id_range: Range<u32>,
	/// Re-fetch items that are already `wiki_mapped` instead of skipping them.
	pub refetch: bool,
}

impl Default for EnrichOptions {
	fn default() -> Self {
		Self {
			id_range: 0..21049,
			refetch: false,
		}
	}
}

/// How an enrichment pass ended. The caller saves the catalog in every case,
/// so partial progress is kept.
#[derive(Debug)]
pub enum Outcome {
	Completed,
	Interrupted,
	Failed(anyhow::Error),
}

/// Merge an enrichment into a record. Any patch, even an empty one, marks the
/// record as mapped so later runs skip it.
pub fn apply(record: &mut ItemRecord, enrichment: &Enrichment) -> Result<()> {
	for patch in &enrichment.patches {
		match patch {
			Patch::Item(fields) => {
				record.wiki_mapped = true;
				for (key, value) in fields {
					record.set_field(key, value.clone())?;
				}
			}
			Patch::Bonuses(fields) => {
				record.wiki_mapped = true;
				for (key, value) in fields {
					match key.as_str() {
						"slot" => record.slot = Some(value.clone()),
						"attack_speed" => record.attack_speed = Some(value.clone()),
						_ => {
							record
								.stats
								.get_or_insert_with(Stats::default)
								.set(key, value.clone())?;
						}
					}
				}
			}
		}
	}
	Ok(())
}

/// Walk the id range, fetching and merging data for every item that exists in
/// the catalog and is not yet mapped.
///
/// Stops early when `stop` is set (signal handler) or on the first fetch or
/// merge error; whatever was merged before that stays in the catalog.
pub fn run<F>(catalog: &mut Catalog, opts: &EnrichOptions, stop: &AtomicBool, mut fetch: F) -> Outcome
where
	F: FnMut(&ItemRecord) -> Result<Enrichment>,
{
	for id in opts.id_range.clone() {
		if stop.load(Ordering::SeqCst) {
			return Outcome::Interrupted;
		}

		let Some(record) = catalog.get(id) else {
			continue;
		};
		if record.wiki_mapped && !opts.refetch {
			continue;
		}

		log::info!("fetching data for item {id} ({})", record.name);
		let enrichment = match fetch(record) {
			Ok(enrichment) => enrichment,
			Err(err) => return Outcome::Failed(err.context(format!("Enrich item {id}"))),
		};
		if enrichment.is_empty() {
			log::debug!("no wiki data for item {id}");
			continue;
		}

		let Some(record) = catalog.get_mut(id) else {
			continue;
		};
		if let Err(err) = apply(record, &enrichment) {
			return Outcome::Failed(err.context(format!("Merge item {id}")));
		}
	}

	Outcome::Completed
}
