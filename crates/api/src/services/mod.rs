//! Application services and external integrations.

pub mod credentials;
pub mod email;
pub mod gemini;
pub mod login_throttle;
pub mod reports;
pub mod sessions;

pub use credentials::{CredentialError, CredentialService};
pub use email::EmailNotifier;
pub use gemini::GeminiClient;
pub use login_throttle::LoginThrottle;
pub use reports::{ReportError, ReportService};
pub use sessions::{SessionHandle, SessionStore};
