//! User-facing calendar artifacts: .ics documents, .ics files and deep links.

pub mod download;
pub mod ics;
pub mod link;

pub use download::{save_each_ics, save_ics, save_single_ics, SCHEDULE_FILE_NAME};
pub use link::{bulk_url, bulk_url_in, single_event_url, CALENDAR_ROOT_URL};
