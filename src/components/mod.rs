// Export components
pub mod export;
pub mod google_calendar;
pub mod schedule;

// Re-export the sync session and the domain record
pub use google_calendar::GoogleSyncSession;
pub use schedule::CalendarEvent;
