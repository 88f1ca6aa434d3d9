//! `System.ItemDate` through the Windows property system, the value Explorer
//! shows as Date Taken for pictures and Media Created for videos.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use std::path::{self, Path};
use windows::{
    core::{w, HSTRING},
    Win32::{
        Foundation::PROPERTYKEY,
        UI::Shell::PropertiesSystem::{
            IPropertyStore, PSGetPropertyKeyFromName, PropVariantToFileTime,
            SHGetPropertyStoreFromParsingName, GPS_DEFAULT, PSTF_UTC,
        },
    },
};

use crate::{metadata::TimestampSource, timestamp};

/// Needs a live [`crate::session::Session`] on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyStore;

impl PropertyStore {
    fn read(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
        let name = HSTRING::from(path::absolute(path)?.as_os_str());
        let mut key = PROPERTYKEY::default();
        // SAFETY: every pointer handed to the shell refers to a live local, and
        // the store and the PROPVARIANT release themselves when dropped.
        let filetime = unsafe {
            PSGetPropertyKeyFromName(w!("System.ItemDate"), &mut key)?;
            // The file stays open while the store is alive.
            let store: IPropertyStore =
                SHGetPropertyStoreFromParsingName(&name, None, GPS_DEFAULT)?;
            let value = store.GetValue(&key)?;
            PropVariantToFileTime(&value, PSTF_UTC)?
        };
        let ticks = (u64::from(filetime.dwHighDateTime) << 32) | u64::from(filetime.dwLowDateTime);
        Ok(timestamp::from_filetime(ticks))
    }
}

impl TimestampSource for PropertyStore {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.read(path).unwrap_or_else(|e| {
            debug!("{path:?}: {e:#}");
            None
        })
    }
}
