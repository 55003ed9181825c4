//! Raw rows of the threshold table.

/// One record of the threshold table.
///
/// Rows are validated when read: every field is present and non-empty, and
/// both thresholds are integers. The family is kept verbatim so that an
/// unsupported value can be reported later without failing the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub account: String,
    pub family: String,
    pub display_name: String,
    pub critical: i64,
    pub warning: i64,
    pub instance_id: String,
    pub host_name: String,
}
