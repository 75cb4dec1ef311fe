//! Miscellaneous helpers.

use crate::Error;
use core::{cell::RefCell, hash::Hash};
use hashbrown::HashMap;
use js_sys::Promise;
use tracing::instrument;
use wasm_bindgen_futures::JsFuture;

/// A random integer in `min..=max`, using [***Math.random()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Math/random).
///
/// The bounds are swapped if `max < min`.
#[must_use]
pub fn random_number(max: i64, min: i64) -> i64 {
	random_number_with(max, min, js_sys::Math::random)
}

/// Like [`random_number`], with `unit` yielding values in `[0, 1)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn random_number_with(max: i64, min: i64, mut unit: impl FnMut() -> f64) -> i64 {
	let (max, min) = if max < min { (min, max) } else { (max, min) };
	let span = (i128::from(max) - i128::from(min) + 1) as f64;
	let offset = (unit() * span).floor() as i128;
	(i128::from(min) + offset).min(i128::from(max)) as i64
}

/// Resolves after `seconds` (not milliseconds), via [***setTimeout()***](https://developer.mozilla.org/en-US/docs/Web/API/setTimeout).
///
/// # Errors
///
/// [`Error::NoWindow`] outside of a browsing context, [`Error::Js`] if the timeout can't be scheduled.
#[instrument]
pub async fn sleep(seconds: f64) -> Result<(), Error> {
	let window = web_sys::window().ok_or(Error::NoWindow)?;
	#[allow(clippy::cast_possible_truncation)]
	let millis = (seconds * 1000.0).round() as i32;

	let mut scheduled = Ok(0);
	let promise = Promise::new(&mut |resolve, _reject| {
		scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
	});
	scheduled?;

	JsFuture::from(promise).await?;
	Ok(())
}

/// Caches the results of a function by argument.
///
/// [`None`] results are not cached, so the function runs again the next time.
pub struct Memoize<A, R, F> {
	function: F,
	cache: RefCell<HashMap<A, R>>,
}

impl<A, R, F> Memoize<A, R, F>
where
	A: Hash + Eq,
	R: Clone,
	F: Fn(&A) -> Option<R>,
{
	pub fn new(function: F) -> Self {
		Self {
			function,
			cache: RefCell::new(HashMap::new()),
		}
	}

	pub fn call(&self, argument: A) -> Option<R> {
		if let Some(cached) = self.cache.borrow().get(&argument) {
			return Some(cached.clone());
		}
		let result = (self.function)(&argument)?;
		self.cache.borrow_mut().insert(argument, result.clone());
		Some(result)
	}

	#[must_use]
	pub fn cached_len(&self) -> usize {
		self.cache.borrow().len()
	}

	pub fn clear(&self) {
		self.cache.borrow_mut().clear()
	}
}

/// Which characters [`generate_string`] draws from, in addition to `a`–`z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterSet {
	pub uppercase: bool,
	pub numbers: bool,
	pub symbols: bool,
}

impl CharacterSet {
	fn characters(self) -> Vec<char> {
		let mut characters: Vec<char> = ('a'..='z').collect();
		if self.uppercase {
			characters.extend('A'..='Z');
		}
		if self.numbers {
			characters.extend('0'..='9');
		}
		if self.symbols {
			characters.extend(('!'..='/').chain(':'..='@').chain('['..='`').chain('{'..='~'));
			characters.push('¥');
		}
		characters
	}
}

/// A random string of `length` characters, using [***Math.random()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Math/random).
#[must_use]
pub fn generate_string(length: usize, set: CharacterSet) -> String {
	generate_string_with(length, set, js_sys::Math::random)
}

/// Like [`generate_string`], with `unit` yielding values in `[0, 1)`.
pub fn generate_string_with(length: usize, set: CharacterSet, mut unit: impl FnMut() -> f64) -> String {
	let characters = set.characters();
	(0..length)
		.filter_map(|_| crate::array::sample_with(&characters, &mut unit).copied())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;

	#[test]
	fn random_number_is_inclusive_and_swaps() {
		assert_eq!(random_number_with(10, 1, || 0.0), 1);
		assert_eq!(random_number_with(10, 1, || 0.999_999), 10);
		assert_eq!(random_number_with(1, 10, || 0.999_999), 10);
		assert_eq!(random_number_with(-3, -3, || 0.5), -3);
	}

	#[test]
	fn random_number_covers_wide_ranges() {
		assert_eq!(random_number_with(i64::MAX, 0, || 0.0), 0);
		assert!(random_number_with(i64::MAX, 0, || 0.5) > 0);
		assert_eq!(random_number_with(i64::MAX, i64::MIN, || 0.0), i64::MIN);
		assert!(random_number_with(i64::MAX, i64::MIN, || 0.999_999_999) > i64::MAX / 2);
	}

	#[test]
	fn memoize_skips_none() {
		let calls = Cell::new(0);
		let half = Memoize::new(|n: &u32| {
			calls.set(calls.get() + 1);
			if n % 2 == 0 {
				Some(n / 2)
			} else {
				None
			}
		});

		assert_eq!(half.call(4), Some(2));
		assert_eq!(half.call(4), Some(2));
		assert_eq!(calls.get(), 1);

		assert_eq!(half.call(3), None);
		assert_eq!(half.call(3), None);
		assert_eq!(calls.get(), 3);
		assert_eq!(half.cached_len(), 1);

		half.clear();
		assert_eq!(half.call(4), Some(2));
		assert_eq!(calls.get(), 4);
	}

	#[test]
	fn generated_strings_respect_the_set() {
		let mut seed = 0.0_f64;
		let mut unit = || {
			seed = (seed + 0.137) % 1.0;
			seed
		};

		let lowercase = generate_string_with(64, CharacterSet::default(), &mut unit);
		assert_eq!(lowercase.chars().count(), 64);
		assert!(lowercase.chars().all(|c| c.is_ascii_lowercase()));

		let all = CharacterSet {
			uppercase: true,
			numbers: true,
			symbols: true,
		};
		let mixed = generate_string_with(256, all, &mut unit);
		assert_eq!(mixed.chars().count(), 256);
		assert!(mixed.chars().all(|c| c.is_ascii_graphic() || c == '¥'));
	}

	#[test]
	fn symbols_are_printable() {
		let characters = CharacterSet {
			symbols: true,
			..CharacterSet::default()
		}
		.characters();
		assert_eq!(characters.len(), 26 + 32 + 1);
	}
}
