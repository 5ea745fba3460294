use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;
use tracing::{debug, trace, warn};
use zoneinfo_compiled::parse;

use crate::error::{Error, Result};
use crate::posix_tz::PosixTz;
use crate::time_zone::TimeZoneRegion;

// About names of zones
// https://docs.python.org/3/library/zoneinfo.html#zoneinfo.ZoneInfo.key
// "Although it is a somewhat common practice to expose these to end users,
// these values are designed to be primary keys for representing the relevant
// zones and not necessarily user-facing elements."

const ZONE_TABLES: [&str; 2] = ["zone1970.tab", "zone.tab"];

lazy_static! {
    static ref GLOBAL: ZoneDatabase = ZoneDatabase::from_env();
}

fn tzdir() -> PathBuf {
    // Get the TZDIR environment variable. If it's not set, we default to /usr/share/zoneinfo,
    // which is what the C library does too.
    std::env::var("TZDIR")
        .unwrap_or_else(|_| "/usr/share/zoneinfo".to_string())
        .into()
}

/// The offsets of one zone over time, read from a compiled TZif file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ZoneRules {
    /// (epoch second, offset in effect from then on), sorted by epoch second.
    transitions: Vec<(i64, i32)>,
    /// Offset before the first transition.
    initial_offset: i32,
    /// Rule for everything after the last transition. Without one the last offset stays.
    footer: Option<PosixTz>,
}

fn narrow_offset(offset: i64) -> std::result::Result<i32, String> {
    i32::try_from(offset).map_err(|_| format!("bad offset {}", offset))
}

impl ZoneRules {
    pub(crate) fn parse(data: Vec<u8>) -> std::result::Result<ZoneRules, String> {
        let footer = footer(&data).and_then(PosixTz::parse);
        let tz = parse(data).map_err(|e| format!("{:?}", e))?;
        let spans = &tz.time_zone.fixed_timespans;

        let mut transitions = Vec::with_capacity(spans.rest.len());
        for (timestamp, span) in spans.rest.iter() {
            transitions.push((*timestamp, narrow_offset(span.offset)?));
        }

        Ok(ZoneRules {
            transitions,
            initial_offset: narrow_offset(spans.first.offset)?,
            footer,
        })
    }

    #[cfg(test)]
    pub(crate) fn fixed(offset: i32) -> Self {
        ZoneRules {
            transitions: Vec::new(),
            initial_offset: offset,
            footer: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Offset in seconds east of UTC at `epoch_second`.
    ///
    /// From the last transition on, the footer rule decides. Files written without
    /// transitions ("slim" files, or zones that never changed) rely on the footer for all
    /// time.
    pub(crate) fn offset_at(&self, epoch_second: i64) -> i32 {
        let index = self
            .transitions
            .partition_point(|&(timestamp, _)| timestamp <= epoch_second);
        if index == self.transitions.len() {
            if let Some(footer) = &self.footer {
                return footer.offset_at(epoch_second);
            }
        }
        if index == 0 {
            self.initial_offset
        } else {
            self.transitions[index - 1].1
        }
    }
}

/// The POSIX TZ string that version 2+ TZif files carry after the binary data, between two
/// newlines.
fn footer(data: &[u8]) -> Option<&str> {
    if !data.starts_with(b"TZif") || !matches!(data.get(4), Some(b'2'..=b'9')) {
        return None;
    }
    let body = data.strip_suffix(b"\n")?;
    let start = body.iter().rposition(|&b| b == b'\n')? + 1;
    std::str::from_utf8(&body[start..]).ok()
}

/// Region ids are relative paths below the database directory, so anything that could
/// escape it is refused outright.
fn is_valid_id(id: &str) -> bool {
    if id.is_empty() || id == "Z" || id == "z" || id.starts_with('+') || id.starts_with('-') {
        return false;
    }
    Path::new(id)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// A directory of compiled zone files, laid out like `/usr/share/zoneinfo`.
///
/// Loaded zones are cached for the lifetime of the database.
#[derive(Debug)]
pub struct ZoneDatabase {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<ZoneRules>>>,
}

impl ZoneDatabase {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ZoneDatabase {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The database named by the `TZDIR` environment variable, or `/usr/share/zoneinfo`.
    pub fn from_env() -> Self {
        Self::new(tzdir())
    }

    /// The process-wide database, created from the environment on first use.
    pub fn global() -> &'static ZoneDatabase {
        &GLOBAL
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn region(&self, id: &str) -> Result<TimeZoneRegion> {
        let rules = self.rules(id)?;
        Ok(TimeZoneRegion::new(id.to_string(), rules))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules(id).is_ok()
    }

    pub(crate) fn rules(&self, id: &str) -> Result<Arc<ZoneRules>> {
        if !is_valid_id(id) {
            return Err(Error::UnknownTimeZoneRegion(id.to_string()));
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rules) = cache.get(id) {
            trace!(zone = id, "time-zone rules cache hit");
            return Ok(rules.clone());
        }

        let path = self.dir.join(id);
        let data = match std::fs::read(&path) {
            Ok(data) if data.starts_with(b"TZif") => data,
            _ => return Err(Error::UnknownTimeZoneRegion(id.to_string())),
        };
        let rules = match ZoneRules::parse(data) {
            Ok(rules) => Arc::new(rules),
            Err(e) => {
                warn!(zone = id, path = %path.display(), error = %e, "failed to parse zone file");
                return Err(Error::UnknownTimeZoneRegion(id.to_string()));
            }
        };
        debug!(
            zone = id,
            transitions = rules.transitions.len(),
            "loaded time-zone rules"
        );
        cache.insert(id.to_string(), rules.clone());
        Ok(rules)
    }

    /// Every region listed in the zone tables, plus `UTC`, sorted.
    pub fn all_identifiers(&self) -> Vec<String> {
        let mut ids: BTreeSet<String> = self
            .zone_table()
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.insert("UTC".to_string());
        ids.into_iter().collect()
    }

    /// Regions in use in the country with the given ISO 3166 alpha-2 code, sorted.
    pub fn identifiers_for_country(&self, country_code: &str) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .zone_table()
            .into_iter()
            .filter(|(countries, _)| {
                countries
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(country_code))
            })
            .map(|(_, id)| id)
            .collect();
        ids.into_iter().collect()
    }

    /// (country codes, region id) rows of both zone tables.
    fn zone_table(&self) -> Vec<(Vec<String>, String)> {
        let mut rows = Vec::new();
        let mut found = false;
        for table in ZONE_TABLES {
            let text = match std::fs::read_to_string(self.dir.join(table)) {
                Ok(text) => text,
                Err(_) => continue,
            };
            found = true;
            for line in text.lines().filter(|l| !l.starts_with('#')) {
                let columns: Vec<&str> = line.split('\t').collect();
                if columns.len() < 3 {
                    continue;
                }
                let countries = columns[0].split(',').map(str::to_string).collect();
                rows.push((countries, columns[2].to_string()));
            }
        }
        if !found {
            warn!(dir = %self.dir.display(), "no zone tables found in time-zone database");
        }
        rows
    }
}
