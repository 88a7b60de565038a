use digs_domain::{ListingFilter, is_unknown};

/// Characters with meaning in the lexical query grammar; everything here is
/// backslash-escaped before a user-supplied value lands in a field term.
const SPECIAL_CHARS: &[char] = &[
	'\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

/// Maps a structured filter onto the lexical `field:term` query grammar in
/// a fixed field order. Absent and unknown fields contribute nothing; an
/// empty filter yields an empty string, which matches nothing.
pub fn translate(filter: &ListingFilter) -> String {
	let mut terms: Vec<String> = Vec::new();

	if let Some(address) = filter.address.as_deref() {
		let address = address.trim();

		if !address.is_empty() && !is_unknown(address) {
			terms.push(format!("address:{}", escape(address)));
		}
	}

	// The index stores the rent range as one field, so both bounds ride in a
	// single composite term.
	if let Some(rent) = filter.rent {
		terms.push(format!("rent:\"maxRental: {}, minRental: {}\"", rent.max_rental, rent.min_rental));
	}

	for area in &filter.areas {
		terms.push(format!("area:{area}"));
	}

	if let Some(layout) = filter.layout {
		for (key, count) in
			[("room", layout.rooms), ("living", layout.living_rooms), ("bath", layout.bathrooms)]
		{
			if count > 0 {
				terms.push(format!("layout:{key}{count}"));
			}
		}
	}

	for (name, flag) in [
		("pet", filter.allow_pet),
		("fish", filter.allow_fish),
		("cooking", filter.allow_cooking),
		("elevator", filter.has_elevator),
	] {
		if let Some(value) = flag.as_term_value() {
			terms.push(format!("{name}:{value}"));
		}
	}

	let mut query = terms.join(" ");
	let extra = filter.other_requirements.trim();

	// Free-text remainder rides along as plain keywords.
	if !extra.is_empty() && !is_unknown(extra) {
		if !query.is_empty() {
			query.push(' ');
		}

		query.push_str(extra);
	}

	query.trim().to_string()
}

pub fn escape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if SPECIAL_CHARS.contains(&ch) {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

#[cfg(test)]
mod tests {
	use digs_domain::{Amenity, Layout, RentRange};

	use super::*;

	#[test]
	fn empty_filter_yields_empty_query() {
		assert_eq!(translate(&ListingFilter::default()), "");
	}

	#[test]
	fn unknown_amenity_emits_no_term() {
		let filter = ListingFilter {
			allow_pet: Amenity::Unknown,
			allow_cooking: Amenity::No,
			..ListingFilter::default()
		};

		let query = translate(&filter);

		assert!(!query.contains("pet:"));
		assert_eq!(query, "cooking:false");
	}

	#[test]
	fn unknown_address_is_no_constraint() {
		let filter =
			ListingFilter { address: Some("未知".to_string()), ..ListingFilter::default() };

		assert_eq!(translate(&filter), "");
	}

	#[test]
	fn rent_becomes_one_composite_term() {
		let filter = ListingFilter {
			rent: Some(RentRange { min_rental: 3000, max_rental: 6000 }),
			..ListingFilter::default()
		};

		assert_eq!(translate(&filter), "rent:\"maxRental: 6000, minRental: 3000\"");
	}

	#[test]
	fn areas_emit_one_term_each() {
		let filter = ListingFilter { areas: vec![5.5, 3.5], ..ListingFilter::default() };

		assert_eq!(translate(&filter), "area:5.5 area:3.5");
	}

	#[test]
	fn layout_skips_zero_counts() {
		let filter = ListingFilter {
			layout: Some(Layout { rooms: 2, living_rooms: 0, bathrooms: 1 }),
			..ListingFilter::default()
		};

		assert_eq!(translate(&filter), "layout:room2 layout:bath1");
	}

	#[test]
	fn fields_appear_in_fixed_order() {
		let filter = ListingFilter {
			address: Some("somewhere".to_string()),
			rent: Some(RentRange { min_rental: 3000, max_rental: 6000 }),
			areas: vec![5.5],
			layout: Some(Layout { rooms: 1, living_rooms: 0, bathrooms: 0 }),
			has_elevator: Amenity::Yes,
			other_requirements: "near campus".to_string(),
			..ListingFilter::default()
		};

		assert_eq!(
			translate(&filter),
			"address:somewhere rent:\"maxRental: 6000, minRental: 3000\" area:5.5 \
			 layout:room1 elevator:true near campus"
		);
	}

	#[test]
	fn address_is_escaped_against_the_grammar() {
		let filter =
			ListingFilter { address: Some("5-1 (rear)".to_string()), ..ListingFilter::default() };

		assert_eq!(translate(&filter), "address:5\\-1 \\(rear\\)");
	}

	#[test]
	fn escape_handles_every_special_character() {
		assert_eq!(escape("a+b"), "a\\+b");
		assert_eq!(escape("x:y"), "x\\:y");
		assert_eq!(escape("plain"), "plain");
	}
}
