//! Stored attribute names used in repository filters and patches.

pub const CHECKPOST_ID: &str = "checkpostId";
pub const LOG_DATE: &str = "logDate";
pub const LOG_ID: &str = "logId";
pub const NAME: &str = "name";
pub const CASES_REGISTERED_COUNT: &str = "casesRegisteredCount";
