use super::ics;
use crate::components::schedule::CalendarEvent;
use crate::error::{CalResult, Error};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// File name used for multi-game exports
pub const SCHEDULE_FILE_NAME: &str = "sports_schedule.ics";

/// Write all `events` to `<dir>/sports_schedule.ics`
pub fn save_ics(events: &[CalendarEvent], dir: &Path) -> CalResult<PathBuf> {
    write_document(&ics::build(events), &dir.join(SCHEDULE_FILE_NAME))
}

/// Write one event to `<dir>/<slug-of-title>.ics`
pub fn save_single_ics(event: &CalendarEvent, dir: &Path) -> CalResult<PathBuf> {
    write_document(&ics::build_single(event), &dir.join(single_file_name(event)))
}

/// Write every event to its own file in `dir`.
///
/// Names are unique within the batch: a title seen before gets the game's
/// start date appended, then a counter if that is taken too.
pub fn save_each_ics(events: &[CalendarEvent], dir: &Path) -> CalResult<Vec<PathBuf>> {
    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(events.len());

    for event in events {
        let name = unique_file_name(event, &mut used);
        paths.push(write_document(&ics::build_single(event), &dir.join(name))?);
    }

    Ok(paths)
}

/// File name for a single-event export
pub fn single_file_name(event: &CalendarEvent) -> String {
    format!("{}.ics", file_stem(event))
}

fn file_stem(event: &CalendarEvent) -> String {
    let slug = slug::slugify(&event.title);
    if slug.is_empty() {
        "event".to_string()
    } else {
        slug
    }
}

fn unique_file_name(event: &CalendarEvent, used: &mut HashSet<String>) -> String {
    let stem = file_stem(event);
    let mut name = format!("{}.ics", stem);
    if used.insert(name.clone()) {
        return name;
    }

    let dated = format!("{}-{}", stem, event.start.format("%Y-%m-%d"));
    name = format!("{}.ics", dated);
    let mut counter = 2;
    while !used.insert(name.clone()) {
        name = format!("{}-{}.ics", dated, counter);
        counter += 1;
    }
    name
}

/// Stage the document in a temp file next to `path`, then move it into place
fn write_document(content: &str, path: &Path) -> CalResult<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|e| Error::Io(e.error))?;

    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path.to_path_buf())
}
