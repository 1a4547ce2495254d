/// All repository-assigned identifiers are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All instants are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Wall-clock start times of time slots carry no zone.
pub type LocalDateTime = chrono::NaiveDateTime;
