use serde::Deserialize;

/// MediaWiki `action=query&prop=revisions` response, `formatversion=2`.
///
/// Only the fields needed to pull raw wikitext; pages we never created come
/// back with `missing` set and no revisions.
#[derive(Debug, Deserialize)]
pub struct Response {
	pub query: Option<Query>,
}

#[derive(Debug, Deserialize)]
pub struct Query {
	#[serde(default)]
	pub pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
	pub title: Option<String>,
	#[serde(default)]
	pub missing: bool,
	#[serde(default)]
	pub revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
pub struct Revision {
	pub slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
pub struct Slots {
	pub main: Slot,
}

#[derive(Debug, Deserialize)]
pub struct Slot {
	pub content: Option<String>,
}

impl Response {
	/// Wikitext of the first returned page, if the page exists.
	pub fn into_wikitext(self) -> Option<String> {
		let page = self.query?.pages.into_iter().next()?;
		if page.missing {
			return None;
		}
		page.revisions
			.into_iter()
			.next()?
			.slots?
			.main
			.content
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_revision_content() {
		let raw = r#"{
			"batchcomplete": true,
			"query": {"pages": [{
				"pageid": 12,
				"title": "Abyssal_whip",
				"revisions": [{"slots": {"main": {"content": "{{Infobox Item}}"}}}]
			}]}
		}"#;
		let response: Response = serde_json::from_str(raw).unwrap();
		assert_eq!(response.into_wikitext().as_deref(), Some("{{Infobox Item}}"));
	}

	#[test]
	fn missing_page_is_none() {
		let raw = r#"{"query": {"pages": [{"title": "Nope", "missing": true}]}}"#;
		let response: Response = serde_json::from_str(raw).unwrap();
		assert!(response.into_wikitext().is_none());
	}
}
