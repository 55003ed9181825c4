//! Supported metric families.

use core::fmt;
use core::str::FromStr;

/// A metric family (the `pluginset_name` column of the threshold table).
///
/// Each family has exactly one query shape and one pair of default thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Cpu,
    Memory,
    IoWait,
    DiskUsage,
}

impl Family {
    /// All supported families, in table order.
    pub const ALL: [Family; 4] = [
        Family::Cpu,
        Family::Memory,
        Family::IoWait,
        Family::DiskUsage,
    ];

    /// The `pluginset_name` spelling used in the input table and in tags.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Family::Cpu => "cpu",
            Family::Memory => "memory",
            Family::IoWait => "iowait",
            Family::DiskUsage => "Disk usage",
        }
    }

    /// Whether thresholds for this family are expressed as whole percentages
    /// in the table but compared against a fraction by the service.
    pub const fn is_fractional(&self) -> bool {
        matches!(self, Family::DiskUsage)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = UnsupportedFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| UnsupportedFamily(s.to_string()))
    }
}

/// A `pluginset_name` value that does not map to any [`Family`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFamily(pub String);

impl fmt::Display for UnsupportedFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported pluginset_name: {}", self.0)
    }
}

impl std::error::Error for UnsupportedFamily {}
