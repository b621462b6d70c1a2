//! Core domain entities
//!
//! Plain data structures with their client-side validation. No I/O.

mod credentials;
pub mod dashboard;
mod family;
pub mod result;
mod session;
pub mod transaction;
mod user;

pub use credentials::{
    PasswordChangeForm, RegistrationForm, MIN_PASSWORD_LEN, MSG_NEW_PASSWORD_MISMATCH,
    MSG_PASSWORD_MISMATCH, MSG_PASSWORD_TOO_SHORT,
};
pub use dashboard::{
    ChartData, DashboardData, DashboardPeriod, MonthlyStats, SeriesTotals, Summary,
};
pub use family::{Family, FamilyMember, MemberRole};
pub use session::{BearerToken, Session, SessionState};
pub use transaction::{
    Category, CreatedBy, NewTransaction, Transaction, TransactionDraft, TransactionFilter,
    TransactionType,
};
pub use user::UserProfile;
