//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area. Everything that needs a
//! signed-in user reads the session from the shared [`SessionStore`].

pub mod account;
pub mod dashboard;
pub mod family;
pub mod logging;
pub mod navigation;
pub mod session;
pub mod transactions;

pub use account::AccountService;
pub use dashboard::DashboardService;
pub use family::FamilyService;
pub use logging::{Diagnostics, EntryPoint, LogEntry, LogEvent, LoggingService};
pub use navigation::{Flow, NavState, NavigationGuard, Screen};
pub use session::SessionStore;
pub use transactions::TransactionService;
