pub mod bookmark;
pub mod catalog;
pub mod drink;
pub mod reference;
pub mod session;
pub mod user;

use mixology_session::identity::SessionIdentity;

use crate::domain::types::User;
use crate::error::MixologyError;
use crate::state::AppState;

/// The logged-in user behind a verified session cookie.
///
/// A session whose user was deleted is rejected like a missing one.
pub(crate) async fn current_user(
    state: &AppState,
    identity: SessionIdentity,
) -> Result<User, MixologyError> {
    state.session_gate().require(Some(identity)).await
}
