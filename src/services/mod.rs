//! Stand-ins for the remote services of the dashboard
//!
//! Nothing here talks to a real server: these implementations simulate network latency and return synthetic results,
//! so that the rest of the crate can be developed (and tested) against the traits of [`crate::traits`].

pub mod email;
pub mod booking;
pub mod analytics;

pub use email::LogEmailSender;
pub use booking::MockBookingService;
pub use analytics::MockAnalyticsFeed;
