use std::fmt;

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{self, Visitor},
};

/// Tri-state amenity flag. `Unknown` means the source text never mentioned
/// the amenity; it must not be treated as `No`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Amenity {
	Yes,
	No,
	#[default]
	Unknown,
}

impl Amenity {
	/// The term value emitted into lexical queries; `None` for `Unknown`,
	/// which never constrains a search.
	pub fn as_term_value(self) -> Option<&'static str> {
		match self {
			Self::Yes => Some("true"),
			Self::No => Some("false"),
			Self::Unknown => None,
		}
	}

	pub fn as_wire_str(self) -> &'static str {
		match self {
			Self::Yes => "true",
			Self::No => "false",
			Self::Unknown => "unknown",
		}
	}

	fn from_bool(value: bool) -> Self {
		if value { Self::Yes } else { Self::No }
	}

	fn from_text(text: &str) -> Self {
		match text.trim() {
			"1" | "true" => Self::Yes,
			"0" | "false" => Self::No,
			_ => Self::Unknown,
		}
	}
}

impl Serialize for Amenity {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_wire_str())
	}
}

// The model emits whatever shape it likes for these flags: 1/0 integers,
// booleans, quoted numbers, the unknown sentinel, or nothing at all.
// Everything unrecognized folds into Unknown.
impl<'de> Deserialize<'de> for Amenity {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct AmenityVisitor;

		impl Visitor<'_> for AmenityVisitor {
			type Value = Amenity;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a boolean, 0/1, or a tri-state string")
			}

			fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(Amenity::from_bool(value))
			}

			fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(match value {
					1 => Amenity::Yes,
					0 => Amenity::No,
					_ => Amenity::Unknown,
				})
			}

			fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(match value {
					1 => Amenity::Yes,
					0 => Amenity::No,
					_ => Amenity::Unknown,
				})
			}

			fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(if value == 1.0 {
					Amenity::Yes
				} else if value == 0.0 {
					Amenity::No
				} else {
					Amenity::Unknown
				})
			}

			fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(Amenity::from_text(value))
			}

			fn visit_unit<E>(self) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(Amenity::Unknown)
			}

			fn visit_none<E>(self) -> Result<Self::Value, E>
			where
				E: de::Error,
			{
				Ok(Amenity::Unknown)
			}
		}

		deserializer.deserialize_any(AmenityVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_integer_flags() {
		let yes: Amenity = serde_json::from_str("1").expect("parse failed");
		let no: Amenity = serde_json::from_str("0").expect("parse failed");

		assert_eq!(yes, Amenity::Yes);
		assert_eq!(no, Amenity::No);
	}

	#[test]
	fn deserializes_unknown_sentinels() {
		for raw in ["\"unknown\"", "\"未知\"", "\"\"", "null"] {
			let flag: Amenity = serde_json::from_str(raw).expect("parse failed");

			assert_eq!(flag, Amenity::Unknown, "raw input {raw}");
		}
	}

	#[test]
	fn serializes_as_tri_state_strings() {
		assert_eq!(serde_json::to_string(&Amenity::Yes).expect("serialize failed"), "\"true\"");
		assert_eq!(
			serde_json::to_string(&Amenity::Unknown).expect("serialize failed"),
			"\"unknown\""
		);
	}
}
