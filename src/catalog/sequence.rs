use core::cell::Cell;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Issues [`RequestToken`]s so that only the response to the latest request is used,
/// no matter in which order responses arrive.
#[derive(Debug, Default)]
pub struct RequestSequence {
	latest: Cell<u64>,
}

impl RequestSequence {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a new token, making all earlier ones stale.
	pub fn issue(&self) -> RequestToken {
		let next = self.latest.get().wrapping_add(1);
		self.latest.set(next);
		RequestToken(next)
	}

	#[must_use]
	pub fn is_current(&self, token: RequestToken) -> bool {
		self.latest.get() == token.0
	}
}
