use serde::{Deserialize, Serialize};

use crate::{Amenity, ContactEntry};

/// Floor areas at or above this many ping are unit errors in the source
/// text (square feet, deposit amounts, typos) and get the sentinel instead.
const MAX_REALISTIC_AREA: f32 = 100.0;

pub const AREA_SENTINEL: f32 = -1.0;

/// A structured rental listing, the output of extraction. Immutable once
/// [`Listing::normalized`] has run. `areas` and `contacts` have no default:
/// a model reply missing either key fails the extraction attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub rent: RentRange,
	pub areas: Vec<f32>,
	#[serde(default)]
	pub layout: Layout,
	#[serde(default)]
	pub allow_pet: Amenity,
	#[serde(default)]
	pub allow_fish: Amenity,
	#[serde(default)]
	pub allow_cooking: Amenity,
	#[serde(default)]
	pub has_elevator: Amenity,
	pub contacts: Vec<ContactEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentRange {
	#[serde(rename = "minRental")]
	pub min_rental: i64,
	#[serde(rename = "maxRental")]
	pub max_rental: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
	pub rooms: u32,
	pub living_rooms: u32,
	pub bathrooms: u32,
}

impl Listing {
	/// Applies the area-correction rule and contact normalization, consuming
	/// the raw extraction output. Contact entries are fully replaced, never
	/// patched in place.
	pub fn normalized(mut self) -> Self {
		self.areas = correct_areas(&self.areas);
		self.contacts = self.contacts.iter().map(ContactEntry::normalized).collect();

		self
	}

	/// Flattens the record into the text blob both stores index: fixed field
	/// order, `key: value` pairs, nested values rendered as their literal
	/// JSON text.
	pub fn to_search_text(&self) -> String {
		let rent = serde_json::json!(self.rent);
		let areas = serde_json::json!(self.areas);
		let layout = serde_json::json!(self.layout);
		let contacts = serde_json::json!(self.contacts);
		let fields = [
			("address", self.address.clone()),
			("rent", rent.to_string()),
			("areas", areas.to_string()),
			("layout", layout.to_string()),
			("allow_pet", self.allow_pet.as_wire_str().to_string()),
			("allow_fish", self.allow_fish.as_wire_str().to_string()),
			("allow_cooking", self.allow_cooking.as_wire_str().to_string()),
			("has_elevator", self.has_elevator.as_wire_str().to_string()),
			("contacts", contacts.to_string()),
		];

		fields
			.iter()
			.map(|(key, value)| format!("{key}: {value}"))
			.collect::<Vec<_>>()
			.join(", ")
	}
}

/// Any floor area at or above the realistic ceiling maps to the sentinel;
/// everything below passes through unchanged.
pub fn correct_areas(areas: &[f32]) -> Vec<f32> {
	areas
		.iter()
		.map(|&area| if area >= MAX_REALISTIC_AREA { AREA_SENTINEL } else { area })
		.collect()
}
