//! Database schema definitions and SQL constants.
//!
//! Times are stored as minutes since midnight, dates as `yyyy-MM-dd` text,
//! and timestamps as Unix epoch seconds.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key-value table holding the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// People and their roles.
pub const CREATE_PERSONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS persons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL CHECK (role IN ('ADMIN', 'PROFESSOR', 'STUDENT'))
    )";

/// Bookable rooms. `features` is a JSON array of strings.
pub const CREATE_CLASSROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS classrooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_number TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity >= 0),
        features TEXT NOT NULL DEFAULT '[]'
    )";

/// Class groups.
pub const CREATE_CLASS_GROUPS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS class_groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        course_code TEXT NOT NULL,
        description TEXT,
        branch_id INTEGER,
        academic_year TEXT,
        semester TEXT,
        professor_id INTEGER REFERENCES persons(id),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Enrolment join table.
pub const CREATE_CLASS_GROUP_STUDENTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS class_group_students (
        class_group_id INTEGER NOT NULL REFERENCES class_groups(id) ON DELETE CASCADE,
        student_id INTEGER NOT NULL REFERENCES persons(id),
        PRIMARY KEY (class_group_id, student_id)
    )";

/// Weekly entries. Exactly one of `class_group_id` / `person_id` is set.
///
/// `source_class_group` marks professor entries mirrored from a class group.
pub const CREATE_TIMETABLE_ENTRIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS timetable_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        class_group_id INTEGER REFERENCES class_groups(id) ON DELETE CASCADE,
        person_id INTEGER REFERENCES persons(id),
        day TEXT NOT NULL,
        start_minute INTEGER NOT NULL,
        end_minute INTEGER NOT NULL,
        title TEXT NOT NULL,
        instructor TEXT,
        location TEXT,
        color TEXT NOT NULL,
        kind TEXT NOT NULL,
        subject TEXT,
        source_class_group INTEGER,
        position INTEGER NOT NULL DEFAULT 0,
        CHECK ((class_group_id IS NULL) <> (person_id IS NULL)),
        CHECK (end_minute > start_minute)
    )";

/// Dated classroom reservations.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        owner_id INTEGER NOT NULL REFERENCES persons(id),
        classroom_id INTEGER NOT NULL REFERENCES classrooms(id),
        date TEXT NOT NULL,
        start_minute INTEGER NOT NULL,
        end_minute INTEGER NOT NULL,
        purpose TEXT,
        notes TEXT,
        status TEXT NOT NULL CHECK (status IN ('PENDING', 'APPROVED', 'CANCELED', 'REJECTED')),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (end_minute > start_minute)
    )";

/// Admin notification outbox. `payload` is the JSON-encoded notification.
pub const CREATE_NOTIFICATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event TEXT NOT NULL,
        reservation_id TEXT NOT NULL,
        payload TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// Speeds up room conflict lookups.
pub const CREATE_RESERVATION_SLOT_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_slot
    ON reservations(classroom_id, date, status)";

/// Speeds up per-owner listings and weekly quota counts.
pub const CREATE_RESERVATION_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_owner ON reservations(owner_id, date)";

/// Speeds up schedule loads.
pub const CREATE_ENTRY_GROUP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_entries_group ON timetable_entries(class_group_id)";

/// Speeds up personal timetable loads.
pub const CREATE_ENTRY_PERSON_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_entries_person ON timetable_entries(person_id)";

/// Speeds up "groups taught by" lookups.
pub const CREATE_GROUP_PROFESSOR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_class_groups_professor ON class_groups(professor_id)";

/// Every statement run on a fresh database, in order.
pub const SCHEMA_STATEMENTS: [&str; 13] = [
    CREATE_METADATA_TABLE,
    CREATE_PERSONS_TABLE,
    CREATE_CLASSROOMS_TABLE,
    CREATE_CLASS_GROUPS_TABLE,
    CREATE_CLASS_GROUP_STUDENTS_TABLE,
    CREATE_TIMETABLE_ENTRIES_TABLE,
    CREATE_RESERVATIONS_TABLE,
    CREATE_NOTIFICATIONS_TABLE,
    CREATE_RESERVATION_SLOT_INDEX,
    CREATE_RESERVATION_OWNER_INDEX,
    CREATE_ENTRY_GROUP_INDEX,
    CREATE_ENTRY_PERSON_INDEX,
    CREATE_GROUP_PROFESSOR_INDEX,
];

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
