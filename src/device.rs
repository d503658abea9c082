//! 1-Wire device identifiers and attribute paths.
//!
//! owserver lists each device in the root directory under its identifier:
//! two hex digits of family code, a dot, and twelve hex digits of serial
//! number, e.g. `3A.BEE71B000000`. Attributes live one level below, e.g.
//! `/3A.BEE71B000000/PIO.B`.
//!
//! # Example
//!
//! ```
//! use ownet::DeviceId;
//!
//! let id = DeviceId::find("/3A.BEE71B000000").unwrap();
//! assert_eq!(id.as_str(), "3A.BEE71B000000");
//! assert_eq!(id.family(), "3A");
//! assert_eq!(id.attr_path("PIO.B"), "/3A.BEE71B000000/PIO.B");
//!
//! assert!(DeviceId::find("/settings").is_none());
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{OwnetError, Result};

/// Pattern matching a device identifier as shown in the root listing.
pub const DEVICE_ID_PATTERN: &str = r"[0-9A-F]{2}\.[0-9A-F]{12}";

static DEVICE_ID_RE: OnceLock<Regex> = OnceLock::new();
static DEVICE_ID_EXACT_RE: OnceLock<Regex> = OnceLock::new();

fn device_id_re() -> &'static Regex {
    DEVICE_ID_RE.get_or_init(|| Regex::new(DEVICE_ID_PATTERN).expect("device id pattern is valid"))
}

fn device_id_exact_re() -> &'static Regex {
    DEVICE_ID_EXACT_RE.get_or_init(|| {
        Regex::new(&format!("^{}$", DEVICE_ID_PATTERN)).expect("device id pattern is valid")
    })
}

/// A 1-Wire device identifier (`XX.YYYYYYYYYYYY`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    /// Parses a complete device identifier.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::InvalidParameter` unless the whole string is a
    /// device identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::DeviceId;
    ///
    /// assert!(DeviceId::parse("10.67C6697351FF").is_ok());
    /// assert!(DeviceId::parse("/10.67C6697351FF").is_err());
    /// assert!(DeviceId::parse("10.67c6697351ff").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if device_id_exact_re().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(OwnetError::invalid_parameter(
                "device",
                format!("'{}' is not of the form XX.YYYYYYYYYYYY", s),
            ))
        }
    }

    /// Finds the first device identifier inside a directory entry.
    pub fn find(entry: &str) -> Option<Self> {
        device_id_re()
            .find(entry)
            .map(|m| Self(m.as_str().to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the two-digit family code.
    pub fn family(&self) -> &str {
        &self.0[..2]
    }

    /// Returns the path of attribute `attr` of this device.
    pub fn attr_path(&self, attr: &str) -> String {
        attr_path(&self.0, attr)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for DeviceId {
    type Err = OwnetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Builds the path `/<device>/<attr>`.
pub fn attr_path(device: &str, attr: &str) -> String {
    format!("/{}/{}", device, attr)
}

/// Extracts device identifiers from directory entries, in order.
///
/// Entries that contain no identifier (`/settings`, `/bus.0`, the empty
/// entry of an empty listing) are skipped.
///
/// # Example
///
/// ```
/// use ownet::device::filter_devices;
///
/// let entries = ["/1F.000000000001", "/settings", "/3A.BEE71B000000"];
/// let ids: Vec<String> = filter_devices(entries).map(|d| d.to_string()).collect();
/// assert_eq!(ids, ["1F.000000000001", "3A.BEE71B000000"]);
/// ```
pub fn filter_devices<I, S>(entries: I) -> impl Iterator<Item = DeviceId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| DeviceId::find(entry.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_entry() {
        let id = DeviceId::find("/28.FF4A3B2C1D0E").unwrap();
        assert_eq!(id.as_str(), "28.FF4A3B2C1D0E");
    }

    #[test]
    fn test_find_rejects_non_devices() {
        assert!(DeviceId::find("/settings").is_none());
        assert!(DeviceId::find("/bus.0").is_none());
        assert!(DeviceId::find("/system").is_none());
        assert!(DeviceId::find("").is_none());
        assert!(DeviceId::find("/3A.BEE71B").is_none());
    }

    #[test]
    fn test_parse() {
        let id = DeviceId::parse("3A.BEE71B000000").unwrap();
        assert_eq!(id.family(), "3A");
        assert_eq!(id.to_string(), "3A.BEE71B000000");

        let parsed: DeviceId = "1F.000000000001".parse().unwrap();
        assert_eq!(parsed.family(), "1F");
    }

    #[test]
    fn test_parse_invalid() {
        for s in ["", "3A", "3A-BEE71B000000", "3A.BEE71B0000000", "xx.BEE71B000000"] {
            assert!(DeviceId::parse(s).is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn test_attr_path() {
        assert_eq!(attr_path("3A.BEE71B000000", "PIO.B"), "/3A.BEE71B000000/PIO.B");
        let id = DeviceId::parse("10.67C6697351FF").unwrap();
        assert_eq!(id.attr_path("temperature"), "/10.67C6697351FF/temperature");
    }

    #[test]
    fn test_filter_devices_keeps_order() {
        let entries = vec![
            "/3A.BEE71B000000".to_string(),
            "/bus.0".to_string(),
            "/1F.000000000001".to_string(),
            "/uncached".to_string(),
        ];
        let ids: Vec<DeviceId> = filter_devices(&entries).collect();
        assert_eq!(
            ids,
            vec![
                DeviceId::parse("3A.BEE71B000000").unwrap(),
                DeviceId::parse("1F.000000000001").unwrap(),
            ]
        );
    }

    #[test]
    fn test_filter_devices_empty_listing() {
        assert_eq!(filter_devices([""]).count(), 0);
    }
}
