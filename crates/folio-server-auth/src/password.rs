// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and verification.
//!
//! Uses Argon2id with the crate's strong defaults in production builds and
//! reduced-cost parameters in tests for speed. Hashes are stored in PHC
//! string format; verification never reveals whether the email or the
//! password was wrong.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

#[cfg(test)]
use argon2::{Algorithm, Params, Version};

/// Error hashing a password (malformed salt or parameters).
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Returns an Argon2 instance configured appropriately for the build context.
#[inline]
fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		// Fast, insecure parameters for tests ONLY.
		let params = Params::new(1024, 1, 1, None).expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}

/// Hash a plaintext password with a per-hash random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| PasswordHashError(e.to_string()))
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// A malformed stored hash verifies as `false` rather than erroring, so a
/// corrupt row cannot be used to sign in.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(stored_hash) else {
		return false;
	};
	argon2_instance()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_then_verify_roundtrips() {
		let hash = hash_password("correct horse battery staple").unwrap();
		assert!(verify_password("correct horse battery staple", &hash));
	}

	#[test]
	fn wrong_password_does_not_verify() {
		let hash = hash_password("secret").unwrap();
		assert!(!verify_password("not-the-secret", &hash));
	}

	#[test]
	fn hashes_are_salted() {
		let a = hash_password("same input").unwrap();
		let b = hash_password("same input").unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn malformed_stored_hash_verifies_false() {
		assert!(!verify_password("anything", "not-a-phc-string"));
		assert!(!verify_password("anything", ""));
	}
}
