/// All entity identifiers (templates, sessions, assets) are random v4 UUIDs.
pub type EntityId = uuid::Uuid;

/// User identifiers are issued by the external auth provider as UUIDs.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
