//! Read-side timetable projections.

use crate::class_group::mirror_prefix;
use crate::database::Database;
use crate::error::Result;
use crate::person::{PersonId, Role};
use crate::timetable::TimetableEntry;

use super::checks::require_role;

/// Every entry of every class group `student` attends, titled
/// `"<courseCode>: <title>"`, in weekly order.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`], [`crate::Error::RoleMismatch`] or a
/// database error.
pub fn student_timetable(db: &Database, student: PersonId) -> Result<Vec<TimetableEntry>> {
    let conn = db.connection();
    require_role(conn, student, Role::Student)?;

    let mut entries: Vec<TimetableEntry> = Database::class_groups_for_student(conn, student)?
        .into_iter()
        .flat_map(|group| {
            let prefix = mirror_prefix(group.course_code());
            let id = group.id;
            group.entries.into_iter().map(move |mut entry| {
                entry.title = format!("{prefix}{}", entry.title);
                entry.source_class_group = Some(id);
                entry
            })
        })
        .collect();
    sort_weekly(&mut entries);
    Ok(entries)
}

/// The professor's personal timetable: mirrors of the groups they teach
/// plus entries they created directly, in weekly order.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`], [`crate::Error::RoleMismatch`] or a
/// database error.
pub fn professor_timetable(db: &Database, professor: PersonId) -> Result<Vec<TimetableEntry>> {
    let conn = db.connection();
    require_role(conn, professor, Role::Professor)?;
    let mut entries = Database::personal_entries(conn, professor)?;
    sort_weekly(&mut entries);
    Ok(entries)
}

/// Adds an entry the professor owns directly, outside any class group.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`], [`crate::Error::RoleMismatch`] or a
/// database error.
pub fn add_professor_entry(
    db: &Database,
    professor: PersonId,
    entry: &TimetableEntry,
) -> Result<TimetableEntry> {
    let conn = db.connection();
    require_role(conn, professor, Role::Professor)?;
    let mut stored = entry.clone();
    stored.source_class_group = None;
    stored.id = Some(Database::add_personal_entry(conn, professor, &stored)?);
    log::info!("added '{}' on {} for professor {professor}", stored.title, stored.interval);
    Ok(stored)
}

fn sort_weekly(entries: &mut [TimetableEntry]) {
    entries.sort_by_key(|e| (e.interval.day(), e.interval.start()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_group::ClassGroupDetails;
    use crate::database::test_util::{create_test_database, entry, seed_people_and_rooms};
    use crate::operations::{CreateGroupOptions, CreateGroupPlan, PlanExecutor};
    use crate::Error;

    #[test]
    fn test_student_view_prefixes_titles() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let plan = CreateGroupPlan::new(
            CreateGroupOptions::new(ClassGroupDetails::new("Intro", "CS101"))
                .with_students(vec![seed.student])
                .with_entries(vec![
                    entry("Wednesday", "09:00", "10:00", "Lab"),
                    entry("Monday", "09:00", "10:00", "Lecture"),
                ]),
        )
        .build_plan(&db)
        .unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let titles: Vec<_> = student_timetable(&db, seed.student)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["CS101: Lecture", "CS101: Lab"]);

        assert!(matches!(
            student_timetable(&db, seed.professor),
            Err(Error::RoleMismatch { .. })
        ));
    }

    #[test]
    fn test_professor_view_mixes_mirrors_and_direct_entries() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        add_professor_entry(&db, seed.professor, &entry("Friday", "16:00", "17:00", "Office hours")).unwrap();

        let plan = CreateGroupPlan::new(
            CreateGroupOptions::new(ClassGroupDetails::new("Intro", "CS101"))
                .with_professor(Some(seed.professor))
                .with_entries(vec![entry("Monday", "09:00", "10:00", "Lecture")]),
        )
        .build_plan(&db)
        .unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let titles: Vec<_> = professor_timetable(&db, seed.professor)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["CS101: Lecture", "Office hours"]);
    }

    #[test]
    fn test_direct_entry_collides_with_new_group() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        add_professor_entry(&db, seed.professor, &entry("Monday", "09:00", "10:00", "Office hours")).unwrap();

        let err = CreateGroupPlan::new(
            CreateGroupOptions::new(ClassGroupDetails::new("Intro", "CS101"))
                .with_professor(Some(seed.professor))
                .with_entries(vec![entry("Monday", "09:30", "10:30", "Lecture")]),
        )
        .build_plan(&db)
        .unwrap_err();
        assert!(err.is_slot_unavailable());
    }
}
