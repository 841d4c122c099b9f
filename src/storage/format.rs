//! On-disk layout of the inventory file

use std::{
    borrow::Cow,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::record::Record;

pub const FORMAT_VERSION: u32 = 1;

pub type SecondsSinceUnix = i64;

#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryFile<'a> {
    pub version: u32,
    pub saved_at: SecondsSinceUnix,
    pub records: Cow<'a, [Record]>,
}

impl<'a> InventoryFile<'a> {
    pub fn new(records: &'a [Record], saved_at: SecondsSinceUnix) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at,
            records: Cow::Borrowed(records),
        }
    }
}

/// converts time to number of seconds since unix_epoch
pub fn system_time_to_i64(time: SystemTime) -> anyhow::Result<SecondsSinceUnix> {
    i64::try_from(
        time.duration_since(UNIX_EPOCH)
            .with_context(|| "failed to get unix timestamp")?
            .as_secs(),
    )
    .with_context(|| "failed to get save timestamp in seconds")
}

/// converts number of seconds since unix epoch to local date time
pub fn i64_seconds_to_local_time(since_unix: i64) -> anyhow::Result<DateTime<Local>> {
    let datetime = DateTime::from_timestamp(since_unix, 0).ok_or(anyhow!(
        "failed to convert {since_unix} s timestamp to datetime"
    ))?;

    Ok(DateTime::from(datetime))
}
