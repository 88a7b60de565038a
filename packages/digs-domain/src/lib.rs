mod amenity;
mod contact;
mod filter;
mod listing;

pub use amenity::Amenity;
pub use contact::ContactEntry;
pub use filter::ListingFilter;
pub use listing::{AREA_SENTINEL, Layout, Listing, RentRange, correct_areas};

/// Sentinel tokens the model uses for "not stated in the source text". The
/// CJK token shows up throughout scraped listing corpora; both are part of
/// the wire contract.
pub const UNKNOWN_TOKENS: [&str; 2] = ["unknown", "未知"];

pub fn is_unknown(text: &str) -> bool {
	UNKNOWN_TOKENS.contains(&text.trim())
}

/// An empty string or an unknown token, as found in single-element
/// placeholder lists.
pub fn is_placeholder(text: &str) -> bool {
	text.trim().is_empty() || is_unknown(text)
}
