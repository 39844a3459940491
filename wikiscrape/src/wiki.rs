use std::collections::HashMap;

use anyhow::{Context, Result};
use catalog::ItemRecord;

use crate::enrich::Enrichment;
use crate::infobox;

mod schema;

const API_URL: &str = "https://oldschoolrunescape.wikia.com/api.php";

/// Blocking wiki client with a per-run article cache, so items sharing a page
/// (noted/placeholder variants) cost one request.
pub struct WikiClient {
	articles: HashMap<String, Option<String>>,
}

impl Default for WikiClient {
	fn default() -> Self {
		Self::new()
	}
}

impl WikiClient {
	pub fn new() -> Self {
		Self {
			articles: HashMap::new(),
		}
	}

	/// Fetch and parse wiki data for one item. A missing page or a page with
	/// no infoboxes yields an empty enrichment.
	pub fn fetch(&mut self, record: &ItemRecord) -> Result<Enrichment> {
		let page = page_key(&record.name);
		match self.article(&page)? {
			Some(wikitext) => infobox::parse(&wikitext),
			None => Ok(Enrichment::default()),
		}
	}

	fn article(&mut self, page: &str) -> Result<Option<String>> {
		if let Some(cached) = self.articles.get(page) {
			return Ok(cached.clone());
		}
		let wikitext = fetch_wikitext(page)?;
		self.articles.insert(page.to_string(), wikitext.clone());
		Ok(wikitext)
	}
}

/// Wiki page names use underscores where item names have spaces.
fn page_key(name: &str) -> String {
	name.replace(' ', "_")
}

fn fetch_wikitext(page: &str) -> Result<Option<String>> {
	let mut res = ureq::get(API_URL)
		.query("action", "query")
		.query("prop", "revisions")
		.query("rvprop", "content")
		.query("rvslots", "main")
		.query("format", "json")
		.query("formatversion", "2")
		.query("titles", page)
		.call()
		.with_context(|| format!("GET {API_URL} titles={page}"))?;
	let response = res
		.body_mut()
		.read_json::<schema::Response>()
		.with_context(|| format!("Decode wiki JSON for {page}"))?;
	Ok(response.into_wikitext())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_keys_use_underscores() {
		assert_eq!(page_key("Abyssal whip"), "Abyssal_whip");
		assert_eq!(page_key("Coins"), "Coins");
	}
}
