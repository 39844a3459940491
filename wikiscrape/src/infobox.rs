use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{Value, json};

use crate::enrich::{Enrichment, Patch};

/// Extract the `{{Infobox Item}}` and `{{Infobox Bonuses}}` templates from raw
/// wikitext and turn their recognized parameters into patches.
///
/// Values are lowercased and trimmed before conversion, matching how the
/// catalog was originally populated. Unrecognized parameters are dropped.
pub fn parse(wikitext: &str) -> Result<Enrichment> {
	let regex = regex::Regex::new(r"\{\{Infobox (?<kind>Item|Bonuses)(?<body>(?:\s*\|.*)*)\s*\}\}")?;

	let mut patches = Vec::new();
	for caps in regex.captures_iter(wikitext) {
		let mut fields = BTreeMap::new();
		let is_item = &caps["kind"] == "Item";

		for part in caps["body"].split('|') {
			let Some((key, value)) = part.split_once('=') else {
				continue;
			};
			let key = key.trim();
			let value = value.trim().to_lowercase();

			let mapped = if is_item {
				item_field(key, &value)
			} else {
				bonus_field(key, &value)
			};
			if let Some((name, value)) = mapped {
				fields.insert(name.to_string(), value);
			}
		}

		// An infobox with no usable parameters still counts as mapped.
		patches.push(if is_item {
			Patch::Item(fields)
		} else {
			Patch::Bonuses(fields)
		});
	}

	Ok(Enrichment { patches })
}

fn item_field(key: &str, value: &str) -> Option<(&'static str, Value)> {
	Some(match key {
		"tradeable" => ("tradeable", yes_no(value)),
		"equipable" => ("equipable", yes_no(value)),
		"stackable" => ("stackable", yes_no(value)),
		"quest" => ("quest_item", yes_no(value)),
		"members" => ("members", yes_no(value)),
		"examine" => ("description", Value::String(value.to_string())),
		"weight" => ("weight", json!(leading_float(value).unwrap_or(0.0))),
		"high" => ("high_alch", number(value)),
		"low" => ("low_alch", number(value)),
		"store" => ("store_price", number(value)),
		_ => return None,
	})
}

fn bonus_field(key: &str, value: &str) -> Option<(&'static str, Value)> {
	Some(match key {
		"astab" => ("attack_stab", number(value)),
		"aslash" => ("attack_slash", number(value)),
		"acrush" => ("attack_crush", number(value)),
		"amagic" => ("attack_magic", number(value)),
		"arange" => ("attack_range", number(value)),
		"dstab" => ("defence_stab", number(value)),
		"dslash" => ("defence_slash", number(value)),
		"dcrush" => ("defence_crush", number(value)),
		"dmagic" => ("defence_magic", number(value)),
		"drange" => ("defence_range", number(value)),
		"str" => ("strength", number(value)),
		"rstr" => ("range_strength", number(value)),
		"mdmg" => ("magic_strength", json!(leading_int(value).unwrap_or(0) as f64 / 100.0)),
		"prayer" => ("prayer", number(value)),
		"aspeed" => ("attack_speed", number(value)),
		"slot" => ("slot", Value::String(value.to_string())),
		_ => return None,
	})
}

fn yes_no(value: &str) -> Value {
	Value::Bool(value == "yes")
}

/// Wiki numbers often carry units ("100 coins"); take the leading integer,
/// `-1` when there is none.
fn number(value: &str) -> Value {
	json!(leading_int(value).unwrap_or(-1))
}

fn leading_int(value: &str) -> Option<i64> {
	let value = value.trim();
	let (sign, digits) = match value.strip_prefix('-') {
		Some(rest) => (-1, rest),
		None => (1, value),
	};
	let end = digits
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(digits.len());
	digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn leading_float(value: &str) -> Option<f64> {
	let value = value.trim();
	let end = value
		.find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
		.unwrap_or(value.len());
	value[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	const WHIP_PAGE: &str = "\
{{Infobox Item
|name = Abyssal whip
|members = Yes
|quest = No
|tradeable = Yes
|equipable = Yes
|stackable = No
|examine = A weapon from the Abyss.
|weight = 0.453
|high = 72000
|low = 48000
|store = 100 coins
}}
Some article text.
{{Infobox Bonuses
|astab = 0
|aslash = 82
|str = 82
|mdmg = 15
|aspeed = 4
|slot = Weapon
}}";

	#[test]
	fn parses_both_infoboxes() {
		let enrichment = parse(WHIP_PAGE).unwrap();
		assert_eq!(enrichment.patches.len(), 2);

		let Patch::Item(item) = &enrichment.patches[0] else {
			panic!("first patch should be the item infobox");
		};
		assert_eq!(item.get("members"), Some(&json!(true)));
		assert_eq!(item.get("quest_item"), Some(&json!(false)));
		assert_eq!(item.get("description"), Some(&json!("a weapon from the abyss.")));
		assert_eq!(item.get("weight"), Some(&json!(0.453)));
		assert_eq!(item.get("high_alch"), Some(&json!(72000)));
		assert_eq!(item.get("store_price"), Some(&json!(100)));
		assert!(item.get("name").is_none());

		let Patch::Bonuses(bonuses) = &enrichment.patches[1] else {
			panic!("second patch should be the bonuses infobox");
		};
		assert_eq!(bonuses.get("attack_slash"), Some(&json!(82)));
		assert_eq!(bonuses.get("strength"), Some(&json!(82)));
		assert_eq!(bonuses.get("magic_strength"), Some(&json!(0.15)));
		assert_eq!(bonuses.get("attack_speed"), Some(&json!(4)));
		assert_eq!(bonuses.get("slot"), Some(&json!("weapon")));
	}

	#[test]
	fn page_without_infobox_is_empty() {
		let enrichment = parse("Just an article about chickens.").unwrap();
		assert!(enrichment.is_empty());
	}

	#[test]
	fn unparseable_numbers_fall_back() {
		let enrichment = parse("{{Infobox Item\n|high = unknown\n}}").unwrap();
		let Patch::Item(item) = &enrichment.patches[0] else {
			panic!("expected an item patch");
		};
		assert_eq!(item.get("high_alch"), Some(&json!(-1)));
	}

	#[test]
	fn infobox_without_params_still_counts() {
		let enrichment = parse("{{Infobox Bonuses\n}}").unwrap();
		assert_eq!(enrichment.patches, vec![Patch::Bonuses(BTreeMap::new())]);
	}
}
