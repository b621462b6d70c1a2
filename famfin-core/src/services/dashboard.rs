//! Dashboard service - family totals, recent activity and monthly chart

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{DashboardData, DashboardPeriod};
use crate::services::logging::Diagnostics;
use crate::services::session::SessionStore;

const SCREEN: &str = "dashboard";

pub struct DashboardService {
    session: Arc<SessionStore>,
    diagnostics: Diagnostics,
}

impl DashboardService {
    pub fn new(session: Arc<SessionStore>, diagnostics: Diagnostics) -> Self {
        Self {
            session,
            diagnostics,
        }
    }

    /// Fetch summary, recent transactions and monthly stats together.
    /// Any failing request fails the whole load.
    pub async fn load(&self, period: DashboardPeriod) -> Result<DashboardData> {
        let session = self.session.require_session()?;
        let api = self.session.api();
        let token = &session.token;

        let (summary, recent, monthly) = tokio::try_join!(
            api.family_summary(token),
            api.recent_transactions(token),
            api.monthly_stats(token, period),
        )
        .inspect_err(|e| self.diagnostics.failure("dashboard_load_failed", SCREEN, e))?;

        Ok(DashboardData {
            period,
            summary,
            recent,
            monthly,
        })
    }
}
