use serde::{Deserialize, Serialize};

use crate::{is_placeholder, is_unknown};

/// One way to reach a landlord. Every field defaults so the model may omit
/// any of them; [`ContactEntry::normalized`] applies the defaulting rules
/// atomically by building a fresh entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactEntry {
	pub name: String,
	pub phones: Vec<String>,
	pub line_ids: Vec<String>,
	pub line_links: Vec<String>,
	pub others: Vec<String>,
}

impl ContactEntry {
	pub fn normalized(&self) -> Self {
		let name = if is_unknown(&self.name) { String::new() } else { self.name.clone() };
		let phones = if is_placeholder_list(&self.phones) {
			Vec::new()
		} else {
			self.phones.iter().map(|phone| phone.replace('-', "")).collect()
		};

		Self {
			name,
			phones,
			line_ids: collapse_placeholder(&self.line_ids),
			line_links: collapse_placeholder(&self.line_links),
			others: collapse_placeholder(&self.others),
		}
	}
}

/// A single-element list holding only an empty string or an unknown token
/// collapses to an empty list.
fn collapse_placeholder(list: &[String]) -> Vec<String> {
	if is_placeholder_list(list) { Vec::new() } else { list.to_vec() }
}

fn is_placeholder_list(list: &[String]) -> bool {
	list.len() == 1 && is_placeholder(&list[0])
}
