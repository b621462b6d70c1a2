//! Account service - password change for the signed-in user

use std::sync::Arc;

use crate::domain::result::OperationResult;
use crate::domain::PasswordChangeForm;
use crate::services::logging::Diagnostics;
use crate::services::session::SessionStore;

pub const MSG_CHANGE_PASSWORD_FAILED: &str = "Gagal mengubah password";

const SCREEN: &str = "settings";

pub struct AccountService {
    session: Arc<SessionStore>,
    diagnostics: Diagnostics,
}

impl AccountService {
    pub fn new(session: Arc<SessionStore>, diagnostics: Diagnostics) -> Self {
        Self {
            session,
            diagnostics,
        }
    }

    /// Validate the form locally, then ask the server to change the password
    pub async fn change_password(&self, form: &PasswordChangeForm) -> OperationResult<()> {
        if let Err(e) = form.validate() {
            return OperationResult::from_error(&e, MSG_CHANGE_PASSWORD_FAILED);
        }

        let session = match self.session.require_session() {
            Ok(session) => session,
            Err(e) => return OperationResult::fail(e.to_string()),
        };

        match self
            .session
            .api()
            .change_password(&session.token, &form.old_password, &form.new_password)
            .await
        {
            Ok(()) => OperationResult::ok(()),
            Err(e) => {
                self.diagnostics.failure("password_change_failed", SCREEN, &e);
                OperationResult::from_error(&e, MSG_CHANGE_PASSWORD_FAILED)
            }
        }
    }
}

