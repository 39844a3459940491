use std::{
	collections::HashMap,
	fs::File,
	io::{BufReader, BufWriter, Write},
	path::Path,
};

use anyhow::{Context, Result};

mod item;

pub use item::{BonusBlock, ItemRecord, Stats, StyleBlock};

/// The full item catalog as stored on disk: a single top-level `item` object
/// mapping decimal item-id strings to records.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
	pub item: HashMap<String, ItemRecord>,
}

impl Catalog {
	pub fn load(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Open catalog {}", path.display()))?;
		let reader = BufReader::new(file);
		let catalog: Self = serde_json::from_reader(reader)
			.with_context(|| format!("Parse catalog {}", path.display()))?;
		Ok(catalog)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			std::fs::create_dir_all(parent)
				.with_context(|| format!("Create catalog dir {}", parent.display()))?;
		}

		let tmp = path.with_extension("json.tmp");
		let file = File::create(&tmp).with_context(|| format!("Write catalog temp {}", tmp.display()))?;
		let mut writer = BufWriter::new(file);
		serde_json::to_writer_pretty(&mut writer, self).context("Serialize catalog")?;
		writer.flush().context("Flush catalog")?;

		// Replace existing file (Windows-friendly).
		if std::fs::rename(&tmp, path).is_err() {
			let _ = std::fs::remove_file(path);
			std::fs::rename(&tmp, path).with_context(|| format!("Persist catalog {}", path.display()))?;
		}
		Ok(())
	}

	pub fn contains(&self, id: u32) -> bool {
		self.item.contains_key(id.to_string().as_str())
	}

	pub fn get(&self, id: u32) -> Option<&ItemRecord> {
		self.item.get(id.to_string().as_str())
	}

	pub fn get_mut(&mut self, id: u32) -> Option<&mut ItemRecord> {
		self.item.get_mut(id.to_string().as_str())
	}

	pub fn insert(&mut self, id: u32, record: ItemRecord) {
		self.item.insert(id.to_string(), record);
	}

	pub fn len(&self) -> usize {
		self.item.len()
	}

	pub fn is_empty(&self) -> bool {
		self.item.is_empty()
	}
}
