//! Transaction service - list, create, edit and delete family transactions

use std::sync::Arc;

use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::{Transaction, TransactionDraft, TransactionFilter};
use crate::services::logging::Diagnostics;
use crate::services::session::SessionStore;

pub const MSG_INVALID_DATA: &str = "Data tidak valid";
pub const MSG_SESSION_EXPIRED: &str = "Sesi telah berakhir, silakan login kembali";
pub const MSG_FORBIDDEN: &str = "Anda tidak memiliki izin untuk melakukan ini";
pub const MSG_TRY_AGAIN: &str = "Terjadi kesalahan, silakan coba lagi";

const SCREEN: &str = "transactions";

/// User-facing text for a failed create/update/delete
pub fn submission_message(error: &Error) -> String {
    match error {
        Error::Validation(msg) => msg.clone(),
        Error::Unauthenticated => MSG_SESSION_EXPIRED.to_string(),
        Error::Api { status: 400, .. } => error.user_message(MSG_INVALID_DATA),
        Error::Api { status: 401, .. } => MSG_SESSION_EXPIRED.to_string(),
        Error::Api { status: 403, .. } => MSG_FORBIDDEN.to_string(),
        _ => MSG_TRY_AGAIN.to_string(),
    }
}

pub struct TransactionService {
    session: Arc<SessionStore>,
    diagnostics: Diagnostics,
}

impl TransactionService {
    pub fn new(session: Arc<SessionStore>, diagnostics: Diagnostics) -> Self {
        Self {
            session,
            diagnostics,
        }
    }

    /// Family transactions matching `filter`
    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let session = self.session.require_session()?;
        self.session
            .api()
            .list_transactions(&session.token, filter)
            .await
            .inspect_err(|e| self.diagnostics.failure("transactions_load_failed", SCREEN, e))
    }

    /// Find one transaction by id in the unfiltered list
    pub async fn find(&self, id: &str) -> Result<Transaction> {
        self.list(&TransactionFilter::default())
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Create a transaction, or update `editing` with the draft.
    ///
    /// The draft is validated before any request is sent; only the
    /// creator of a transaction may update it.
    pub async fn submit(
        &self,
        draft: &TransactionDraft,
        editing: Option<&Transaction>,
    ) -> OperationResult<()> {
        match self.try_submit(draft, editing).await {
            Ok(()) => OperationResult::ok(()),
            Err(e) => {
                if !matches!(e, Error::Validation(_)) {
                    self.diagnostics.failure("transaction_save_failed", SCREEN, &e);
                }
                self.failure(&e)
            }
        }
    }

    async fn try_submit(&self, draft: &TransactionDraft, editing: Option<&Transaction>) -> Result<()> {
        let session = self.session.require_session()?;
        let payload = draft.validate(session.user.id.as_deref())?;
        let api = self.session.api();

        match editing {
            Some(existing) => {
                if !existing.is_owned_by(&session.user) {
                    return Err(Error::Api {
                        status: 403,
                        message: None,
                    });
                }
                api.update_transaction(&session.token, &existing.id, &payload)
                    .await
            }
            None => api.create_transaction(&session.token, &payload).await,
        }
    }

    /// Delete a transaction the signed-in user created
    pub async fn delete(&self, transaction: &Transaction) -> OperationResult<()> {
        match self.try_delete(transaction).await {
            Ok(()) => OperationResult::ok(()),
            Err(e) => {
                self.diagnostics.failure("transaction_delete_failed", SCREEN, &e);
                self.failure(&e)
            }
        }
    }

    async fn try_delete(&self, transaction: &Transaction) -> Result<()> {
        let session = self.session.require_session()?;
        if !transaction.is_owned_by(&session.user) {
            return Err(Error::Api {
                status: 403,
                message: None,
            });
        }
        self.session
            .api()
            .delete_transaction(&session.token, &transaction.id)
            .await
    }

    fn failure(&self, error: &Error) -> OperationResult<()> {
        let message = submission_message(error);
        match error.status() {
            Some(status) => OperationResult::fail_with_context(
                message,
                [("status".to_string(), serde_json::Value::from(status))]
                    .into_iter()
                    .collect(),
            ),
            None => OperationResult::fail(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_messages() {
        let bad_request = Error::Api {
            status: 400,
            message: Some("Kategori wajib diisi".to_string()),
        };
        assert_eq!(submission_message(&bad_request), "Kategori wajib diisi");

        let bare_bad_request = Error::Api {
            status: 400,
            message: None,
        };
        assert_eq!(submission_message(&bare_bad_request), MSG_INVALID_DATA);

        let expired = Error::Api {
            status: 401,
            message: Some("jwt expired".to_string()),
        };
        assert_eq!(submission_message(&expired), MSG_SESSION_EXPIRED);

        let forbidden = Error::Api {
            status: 403,
            message: None,
        };
        assert_eq!(submission_message(&forbidden), MSG_FORBIDDEN);

        let server = Error::Api {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(submission_message(&server), MSG_TRY_AGAIN);
        assert_eq!(
            submission_message(&Error::Network("refused".to_string())),
            MSG_TRY_AGAIN
        );
        assert_eq!(
            submission_message(&Error::validation("Semua field harus diisi")),
            "Semua field harus diisi"
        );
    }
}
