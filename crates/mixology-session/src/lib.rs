//! Session Gate primitives.
//!
//! A session is a signed HS256 token carrying only the user id, stored in
//! an HttpOnly cookie. Handlers take [`identity::SessionIdentity`] to
//! require a logged-in user, or `Option<SessionIdentity>` to accept anonymous
//! callers.

pub mod cookie;
pub mod identity;
pub mod token;
