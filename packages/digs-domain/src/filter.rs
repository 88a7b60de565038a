use serde::{Deserialize, Serialize};

use crate::{Amenity, Layout, RentRange};

/// A structured search filter mirroring [`crate::Listing`], with every
/// field optional. Absent or unknown fields constrain nothing; the
/// translator decides what each present field contributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
	pub address: Option<String>,
	pub rent: Option<RentRange>,
	pub areas: Vec<f32>,
	pub layout: Option<Layout>,
	pub allow_pet: Amenity,
	pub allow_fish: Amenity,
	pub allow_cooking: Amenity,
	pub has_elevator: Amenity,
	pub other_requirements: String,
}

impl ListingFilter {
	pub fn is_empty(&self) -> bool {
		self.address.as_deref().map(|address| address.trim().is_empty()).unwrap_or(true)
			&& self.rent.is_none()
			&& self.areas.is_empty()
			&& self.layout.is_none()
			&& self.allow_pet == Amenity::Unknown
			&& self.allow_fish == Amenity::Unknown
			&& self.allow_cooking == Amenity::Unknown
			&& self.has_elevator == Amenity::Unknown
			&& self.other_requirements.trim().is_empty()
	}
}
