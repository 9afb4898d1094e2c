//! Request context inserted by the bearer middleware.

use cabinet_auth::SessionUser;

/// Authenticated user for the current request.
///
/// Present on every request that passed the bearer middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub SessionUser);

impl CurrentUser {
    pub fn user(&self) -> &SessionUser {
        &self.0
    }
}
