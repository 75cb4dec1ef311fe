//! Slice and JSON array helpers.

use crate::{helpers::random_number_with, Error};
use core::hash::Hash;
use hashbrown::HashMap;
use serde_json::{Map, Value};
use tracing::warn;

#[must_use]
pub fn first<T>(items: &[T]) -> Option<&T> {
	items.first()
}

/// Up to `n` items from the start.
#[must_use]
pub fn first_n<T>(items: &[T], n: usize) -> &[T] {
	&items[..n.min(items.len())]
}

#[must_use]
pub fn last<T>(items: &[T]) -> Option<&T> {
	items.last()
}

/// Up to `n` items from the end, in their original order.
#[must_use]
pub fn last_n<T>(items: &[T], n: usize) -> &[T] {
	&items[items.len() - n.min(items.len())..]
}

/// A random item, using [***Math.random()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Math/random).
#[must_use]
pub fn sample<T>(items: &[T]) -> Option<&T> {
	sample_with(items, js_sys::Math::random)
}

/// A random item, with `unit` yielding values in `[0, 1)`.
pub fn sample_with<T>(items: &[T], unit: impl FnMut() -> f64) -> Option<&T> {
	if items.is_empty() {
		return None;
	}
	#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
	let index = random_number_with(0, items.len() as i64 - 1, unit) as usize;
	items.get(index)
}

/// The value under `key` of each object in `values`, or [`Value::Null`] where there is none.
#[must_use]
pub fn pluck(values: &[Value], key: &str) -> Vec<Value> {
	values.iter().map(|value| value.get(key).cloned().unwrap_or(Value::Null)).collect()
}

/// Groups `items` by `key`, keeping their relative order within each group.
pub fn group_by<T, K, I, F>(items: I, mut key: F) -> HashMap<K, Vec<T>>
where
	I: IntoIterator<Item = T>,
	K: Hash + Eq,
	F: FnMut(&T) -> K,
{
	let mut groups: HashMap<K, Vec<T>> = HashMap::new();
	for item in items {
		groups.entry(key(&item)).or_default().push(item);
	}
	groups
}

/// Items that occur more than once, each listed once in order of first occurrence.
///
/// Empty iff there are no duplicates.
#[must_use]
pub fn duplicates<T: Hash + Eq + Clone>(items: &[T]) -> Vec<T> {
	let mut counts: HashMap<&T, usize> = HashMap::new();
	let mut order = Vec::new();
	for item in items {
		let count = counts.entry(item).or_insert(0);
		if *count == 0 {
			order.push(item);
		}
		*count += 1;
	}
	order.into_iter().filter(|item| counts[item] > 1).cloned().collect()
}

/// Flattens nested JSON.
///
/// Objects become a single object with dotted keys (`{"a": {"b": 1}}` becomes `{"a.b": 1}`).
/// Arrays become a single array of their non-array leaves, depth-first and in order.
/// With `include_arrays_in_objects`, arrays found as object values are flattened that way too,
/// otherwise they are kept as they are.
///
/// # Errors
///
/// [`Error::NotFlattenable`] for scalars.
pub fn flatten(value: &Value, include_arrays_in_objects: bool) -> Result<Value, Error> {
	match value {
		Value::Object(object) => {
			let mut flat = Map::new();
			flatten_object_into(&mut flat, None, object, include_arrays_in_objects);
			Ok(Value::Object(flat))
		}
		Value::Array(items) => Ok(Value::Array(flatten_array(items))),
		_ => {
			warn!("Tried to flatten a scalar.");
			Err(Error::NotFlattenable)
		}
	}
}

fn flatten_object_into(flat: &mut Map<String, Value>, prefix: Option<&str>, object: &Map<String, Value>, include_arrays: bool) {
	for (key, value) in object {
		let key = match prefix {
			Some(prefix) => format!("{}.{}", prefix, key),
			None => key.clone(),
		};
		match value {
			Value::Object(inner) => flatten_object_into(flat, Some(&key), inner, include_arrays),
			Value::Array(items) if include_arrays => {
				flat.insert(key, Value::Array(flatten_array(items)));
			}
			other => {
				flat.insert(key, other.clone());
			}
		}
	}
}

fn flatten_array(items: &[Value]) -> Vec<Value> {
	let mut flat = Vec::with_capacity(items.len());
	let mut stack: Vec<&Value> = items.iter().rev().collect();
	while let Some(next) = stack.pop() {
		match next {
			Value::Array(inner) => stack.extend(inner.iter().rev()),
			leaf => flat.push(leaf.clone()),
		}
	}
	flat
}
