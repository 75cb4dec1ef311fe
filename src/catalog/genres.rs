use super::model::Genre;
use hashbrown::HashMap;

/// Shown for genre ids that aren't in the table.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Genre id to name lookup. Replaced as a whole whenever a new genre list arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTable(HashMap<u32, String>);

impl GenreTable {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Later duplicates of an id win.
	pub fn from_genres(genres: impl IntoIterator<Item = Genre>) -> Self {
		Self(genres.into_iter().map(|Genre { id, name }| (id, name)).collect())
	}

	#[must_use]
	pub fn name(&self, id: u32) -> &str {
		self.0.get(&id).map_or(UNKNOWN_GENRE, String::as_str)
	}

	/// Names for `ids`, in order.
	pub fn names<'a>(&'a self, ids: &'a [u32]) -> impl 'a + Iterator<Item = &'a str> {
		ids.iter().map(move |&id| self.name(id))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn genre(id: u32, name: &str) -> Genre {
		Genre { id, name: name.to_owned() }
	}

	#[test]
	fn unknown_ids_fall_back() {
		let table = GenreTable::from_genres(vec![genre(28, "Action"), genre(18, "Drama")]);
		assert_eq!(table.names(&[18, 99, 28]).collect::<Vec<_>>(), vec!["Drama", "Unknown", "Action"]);
		assert_eq!(GenreTable::new().name(28), UNKNOWN_GENRE);
	}

	#[test]
	fn later_duplicates_win() {
		let table = GenreTable::from_genres(vec![genre(1, "Old"), genre(1, "New")]);
		assert_eq!(table.len(), 1);
		assert_eq!(table.name(1), "New");
	}
}
