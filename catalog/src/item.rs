use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_json::Value;

/// One entry in the item catalog.
///
/// The base schema is fixed, but enrichment passes may write keys outside it
/// (`buy_limit`, quest names, whatever the wiki grows next); those survive
/// load/save verbatim through the flattened `extra` map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemRecord {
	pub id: i64,
	pub name: String,
	pub description: String,
	pub members: bool,
	pub equipable: bool,
	pub quest_item: bool,
	pub tradeable: bool,
	pub stackable: bool,
	pub weight: f64,
	pub store_price: i64,
	pub low_alch: i64,
	pub high_alch: i64,
	/// Equip slot, written by wiki enrichment. Older catalogs hold numeric
	/// slot ids, newer scrapes hold lowercased names, so this stays untyped.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slot: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attack_speed: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stats: Option<Stats>,
	/// Set once an enrichment pass has merged wiki data for this item.
	/// Mapped items are skipped on later runs.
	#[serde(default)]
	pub wiki_mapped: bool,
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

impl Default for ItemRecord {
	fn default() -> Self {
		Self {
			id: -1,
			name: String::new(),
			description: String::new(),
			members: false,
			equipable: false,
			quest_item: false,
			tradeable: false,
			stackable: false,
			weight: 0.0,
			store_price: -1,
			low_alch: -1,
			high_alch: -1,
			slot: None,
			attack_speed: None,
			stats: None,
			wiki_mapped: false,
			extra: BTreeMap::new(),
		}
	}
}

impl ItemRecord {
	/// Assign a single field by its JSON key, last write wins.
	///
	/// Known fields are converted to their schema type; anything else lands in
	/// `extra` untouched so reruns overwrite rather than drop it.
	pub fn set_field(&mut self, key: &str, value: Value) -> Result<()> {
		match key {
			"id" => self.id = convert(key, value)?,
			"name" => self.name = convert(key, value)?,
			"description" => self.description = convert(key, value)?,
			"members" => self.members = convert(key, value)?,
			"equipable" => self.equipable = convert(key, value)?,
			"quest_item" => self.quest_item = convert(key, value)?,
			"tradeable" => self.tradeable = convert(key, value)?,
			"stackable" => self.stackable = convert(key, value)?,
			"weight" => self.weight = convert(key, value)?,
			"store_price" => self.store_price = convert(key, value)?,
			"low_alch" => self.low_alch = convert(key, value)?,
			"high_alch" => self.high_alch = convert(key, value)?,
			"slot" => self.slot = Some(value),
			"attack_speed" => self.attack_speed = Some(value),
			"stats" => self.stats = Some(convert(key, value)?),
			"wiki_mapped" => self.wiki_mapped = convert(key, value)?,
			_ => {
				self.extra.insert(key.to_string(), value);
			}
		}
		Ok(())
	}
}

fn convert<T: serde::de::DeserializeOwned>(key: &str, value: Value) -> Result<T> {
	serde_json::from_value(value).with_context(|| format!("Bad value for item field {key}"))
}

/// Combat stats block.
///
/// `attack`/`defence`/`bonus` are the nested blocks from the base schema;
/// wiki bonus enrichment writes flat keys (`strength`, `attack_stab`, ...)
/// next to them, carried by the flattened map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
	#[serde(default)]
	pub attack: StyleBlock,
	#[serde(default)]
	pub defence: StyleBlock,
	#[serde(default)]
	pub bonus: BonusBlock,
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

impl Default for Stats {
	fn default() -> Self {
		Self {
			attack: StyleBlock::default(),
			defence: StyleBlock::default(),
			bonus: BonusBlock::default(),
			extra: BTreeMap::new(),
		}
	}
}

impl Stats {
	pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
		match key {
			"attack" => self.attack = convert(key, value)?,
			"defence" => self.defence = convert(key, value)?,
			"bonus" => self.bonus = convert(key, value)?,
			_ => {
				self.extra.insert(key.to_string(), value);
			}
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleBlock {
	#[serde(default)]
	pub stab: i64,
	#[serde(default)]
	pub slash: i64,
	#[serde(default)]
	pub crush: i64,
	#[serde(default)]
	pub magic: i64,
	#[serde(default)]
	pub range: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BonusBlock {
	#[serde(default)]
	pub strength: Value,
	#[serde(default)]
	pub magic: Value,
	#[serde(default)]
	pub range: Value,
	#[serde(default)]
	pub prayer: Value,
}

impl Default for BonusBlock {
	fn default() -> Self {
		// Unmapped catalogs ship these as empty strings, not nulls.
		Self {
			strength: Value::String(String::new()),
			magic: Value::String(String::new()),
			range: Value::String(String::new()),
			prayer: Value::String(String::new()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn base_schema_roundtrip() {
		let raw = json!({
			"id": 4151,
			"name": "Abyssal whip",
			"description": "A weapon from the abyss.",
			"members": true,
			"equipable": true,
			"quest_item": false,
			"tradeable": true,
			"stackable": false,
			"weight": 0.453,
			"store_price": 120001,
			"low_alch": 48000,
			"high_alch": 72000,
			"stats": {
				"attack": {"stab": 0, "slash": 82, "crush": 0, "magic": 0, "range": 0},
				"defence": {"stab": 0, "slash": 0, "crush": 0, "magic": 0, "range": 0},
				"bonus": {"strength": 82, "magic": "", "range": "", "prayer": 0}
			},
			"wiki_mapped": false
		});

		let record: ItemRecord = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(record.id, 4151);
		assert_eq!(record.stats.as_ref().unwrap().attack.slash, 82);
		assert_eq!(serde_json::to_value(&record).unwrap(), raw);
	}

	#[test]
	fn unknown_keys_preserved() {
		let raw = json!({
			"id": 2,
			"name": "Cannonball",
			"description": "",
			"members": true,
			"equipable": false,
			"quest_item": false,
			"tradeable": true,
			"stackable": true,
			"weight": 0.0,
			"store_price": 5,
			"low_alch": 2,
			"high_alch": 3,
			"wiki_mapped": true,
			"buy_limit": 9000
		});

		let record: ItemRecord = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(record.extra.get("buy_limit"), Some(&json!(9000)));
		assert_eq!(serde_json::to_value(&record).unwrap(), raw);
	}

	#[test]
	fn set_field_known_and_unknown() {
		let mut record = ItemRecord::default();
		record.set_field("name", json!("Bronze dagger")).unwrap();
		record.set_field("members", json!(false)).unwrap();
		record.set_field("high_alch", json!(6)).unwrap();
		record.set_field("release_date", json!("4 January 2001")).unwrap();

		assert_eq!(record.name, "Bronze dagger");
		assert_eq!(record.high_alch, 6);
		assert_eq!(record.extra.get("release_date"), Some(&json!("4 January 2001")));
	}

	#[test]
	fn set_field_rejects_wrong_type() {
		let mut record = ItemRecord::default();
		assert!(record.set_field("members", json!("maybe")).is_err());
	}

	#[test]
	fn stats_flat_keys() {
		let mut stats = Stats::default();
		stats.set("strength", json!(5)).unwrap();
		let value = serde_json::to_value(&stats).unwrap();
		assert_eq!(value["strength"], json!(5));
		assert_eq!(value["attack"]["stab"], json!(0));
	}
}
