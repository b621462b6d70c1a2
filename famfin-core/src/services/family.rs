//! Family service - view, create, join and leave a family group

use std::sync::Arc;

use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::Family;
use crate::services::logging::Diagnostics;
use crate::services::session::SessionStore;

pub const MSG_LOAD_FAILED: &str = "Terjadi kesalahan saat mengambil data keluarga";
pub const MSG_INVITE_REQUIRED: &str = "Masukkan kode invite terlebih dahulu";
pub const MSG_JOIN_FAILED: &str = "Gagal bergabung dengan keluarga";
pub const MSG_NAME_REQUIRED: &str = "Nama keluarga harus diisi";
pub const MSG_CREATE_FAILED: &str = "Gagal membuat keluarga";
pub const MSG_LEAVE_FAILED: &str = "Gagal keluar dari keluarga";

const SCREEN: &str = "family";

pub struct FamilyService {
    session: Arc<SessionStore>,
    diagnostics: Diagnostics,
}

impl FamilyService {
    pub fn new(session: Arc<SessionStore>, diagnostics: Diagnostics) -> Self {
        Self {
            session,
            diagnostics,
        }
    }

    /// The caller's family, `None` when they have not joined one
    pub async fn my_family(&self) -> OperationResult<Option<Family>> {
        let result = async {
            let session = self.session.require_session()?;
            self.session.api().my_family(&session.token).await
        }
        .await;

        match result {
            Ok(family) => OperationResult::ok(family),
            Err(e) => {
                self.diagnostics.failure("family_load_failed", SCREEN, &e);
                OperationResult::from_error(&e, MSG_LOAD_FAILED)
            }
        }
    }

    pub async fn create(&self, name: &str) -> OperationResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return OperationResult::fail(MSG_NAME_REQUIRED);
        }
        let result = match self.session.require_session() {
            Ok(session) => self.session.api().create_family(&session.token, name).await,
            Err(e) => Err(e),
        };
        self.finish(result, "family_create_failed", MSG_CREATE_FAILED)
    }

    pub async fn join(&self, invite_code: &str) -> OperationResult<()> {
        let code = invite_code.trim();
        if code.is_empty() {
            return OperationResult::fail(MSG_INVITE_REQUIRED);
        }
        let result = match self.session.require_session() {
            Ok(session) => self.session.api().join_family(&session.token, code).await,
            Err(e) => Err(e),
        };
        self.finish(result, "family_join_failed", MSG_JOIN_FAILED)
    }

    pub async fn leave(&self) -> OperationResult<()> {
        let result = match self.session.require_session() {
            Ok(session) => self.session.api().leave_family(&session.token).await,
            Err(e) => Err(e),
        };
        self.finish(result, "family_leave_failed", MSG_LEAVE_FAILED)
    }

    fn finish(&self, result: Result<()>, event: &str, fallback: &str) -> OperationResult<()> {
        match result {
            Ok(()) => OperationResult::ok(()),
            Err(Error::Unauthenticated) => OperationResult::fail(Error::Unauthenticated.to_string()),
            Err(e) => {
                self.diagnostics.failure(event, SCREEN, &e);
                OperationResult::from_error(&e, fallback)
            }
        }
    }
}
