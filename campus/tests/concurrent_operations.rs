//! Concurrent access tests.
//!
//! Plans are built outside any transaction, so another process may write
//! between planning and execution. These tests verify that the executor
//! re-checks every conflict rule inside its transaction, both with stale
//! plans on separate handles and with real threads racing for one slot.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use campus::operations::{
    CancelOptions, CancelPlan, CreateGroupOptions, CreateGroupPlan, EditOptions, EditPlan,
    OperationPlan, PlanExecutor, ReviewOptions, ReviewPlan,
};
use campus::{
    ClassGroupDetails, ClassroomId, Database, DatabaseConfig, Error, PersonId, ReservationId,
    ReservationStatus, ReserveOptions, ReservePlan, Role, Settings,
};
use chrono::NaiveDate;
use common::{date_text, days_from_today, entry, TestDb};

fn evening_before(date: NaiveDate) -> chrono::NaiveDateTime {
    date.pred_opt().unwrap().and_hms_opt(18, 0, 0).unwrap()
}

#[test]
fn test_stale_reservation_plan_fails_on_execute() {
    let mut t = TestDb::new();
    let ada = t.person("Ada", "Lovelace", Role::Professor);
    let grace = t.person("Grace", "Hopper", Role::Professor);
    let room = t.classroom("R1");
    let settings = Settings::default();
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    let plan_for = |owner| {
        ReserveOptions::new(owner, room, date_text(date), "09:00", "10:00")
            .with_now(evening_before(date))
    };

    // Both plans see a free room.
    let first = ReservePlan::new(plan_for(ada), &settings)
        .build_plan(&t.db)
        .unwrap();
    let mut other = t.second_handle();
    let second = ReservePlan::new(plan_for(grace), &settings)
        .build_plan(&other)
        .unwrap();

    PlanExecutor::new(&mut other).execute(&second).unwrap();
    let err = PlanExecutor::new(&mut t.db).execute(&first).unwrap_err();
    assert!(err.is_slot_unavailable(), "unexpected error: {err}");

    let stored = Database::list_reservations(t.db.connection()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].owner(), grace);
}

/// A PENDING student request plus a cancel plan for it, built on a second
/// handle so it can commit while another plan is in flight.
struct PendingRequest {
    t: TestDb,
    admin: PersonId,
    student: PersonId,
    room: ClassroomId,
    date: NaiveDate,
    id: ReservationId,
}

impl PendingRequest {
    fn new() -> Self {
        let mut t = TestDb::new();
        let admin = t.person("Root", "Admin", Role::Admin);
        let student = t.person("Alan", "Turing", Role::Student);
        let room = t.classroom("R1");
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let options = ReserveOptions::new(student, room, date_text(date), "09:00", "10:00")
            .with_now(evening_before(date));
        let plan = ReservePlan::new(options, &Settings::default())
            .build_plan(&t.db)
            .unwrap();
        let id = PlanExecutor::new(&mut t.db)
            .execute(&plan)
            .unwrap()
            .reservation
            .unwrap();
        Self {
            t,
            admin,
            student,
            room,
            date,
            id,
        }
    }

    fn cancel_elsewhere(&self) {
        let mut other = self.t.second_handle();
        let cancel = CancelOptions::new(self.student, self.id.clone())
            .with_today(evening_before(self.date).date());
        let plan = CancelPlan::new(cancel, &Settings::default())
            .build_plan(&other)
            .unwrap();
        PlanExecutor::new(&mut other).execute(&plan).unwrap();
    }

    fn execute_stale(&mut self, plan: &OperationPlan) {
        let err = PlanExecutor::new(&mut self.t.db).execute(plan).unwrap_err();
        assert!(
            matches!(err, Error::InvalidTransition { .. }),
            "unexpected error: {err}"
        );
        let stored = Database::require_reservation(self.t.db.connection(), &self.id).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Canceled);
    }
}

#[test]
fn test_stale_edit_cannot_reopen_canceled_reservation() {
    let mut f = PendingRequest::new();
    let options = EditOptions::new(
        f.student,
        f.id.clone(),
        f.room,
        date_text(f.date),
        "09:00",
        "10:00",
    )
    .with_purpose(Some("Study group".into()))
    .with_now(evening_before(f.date));
    let edit = EditPlan::new(options, &Settings::default())
        .build_plan(&f.t.db)
        .unwrap();

    f.cancel_elsewhere();
    f.execute_stale(&edit);
}

#[test]
fn test_stale_approval_cannot_revive_canceled_reservation() {
    let mut f = PendingRequest::new();
    let approve = ReviewPlan::new(ReviewOptions::approve(f.admin, f.id.clone()))
        .build_plan(&f.t.db)
        .unwrap();

    f.cancel_elsewhere();
    f.execute_stale(&approve);
}

#[test]
fn test_stale_group_plan_fails_on_execute() {
    let mut t = TestDb::new();
    let professor = t.person("Ada", "Lovelace", Role::Professor);

    let plan_for = |code: &str| {
        CreateGroupOptions::new(ClassGroupDetails::new("Section A", code))
            .with_professor(Some(professor))
            .with_entries(vec![entry("Monday", "09:00", "10:00", "Lecture")])
    };

    let first = CreateGroupPlan::new(plan_for("CS101"))
        .build_plan(&t.db)
        .unwrap();
    let mut other = t.second_handle();
    let second = CreateGroupPlan::new(plan_for("CS102"))
        .build_plan(&other)
        .unwrap();

    PlanExecutor::new(&mut other).execute(&second).unwrap();
    let err = PlanExecutor::new(&mut t.db).execute(&first).unwrap_err();
    assert!(err.is_slot_unavailable(), "unexpected error: {err}");

    let groups = Database::list_class_groups(t.db.connection()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].details.course_code, "CS102");
    let mirrors = Database::personal_entries(t.db.connection(), professor).unwrap();
    assert_eq!(mirrors.len(), 1);
}

#[test]
fn test_racing_threads_book_a_room_once() {
    const RACERS: usize = 6;

    let t = TestDb::new();
    let owners: Vec<_> = (0..RACERS)
        .map(|i| t.person("Prof", &format!("Number{i}"), Role::Professor))
        .collect();
    let room = t.classroom("R1");
    let path = t.db.config().path.clone();
    let date = days_from_today(3);
    let barrier = Arc::new(Barrier::new(RACERS));

    let handles: Vec<_> = owners
        .into_iter()
        .map(|owner| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = Database::open(DatabaseConfig::new(path)).unwrap();
                let settings = Settings::default();
                let options = ReserveOptions::new(owner, room, date_text(date), "14:00", "15:00");
                barrier.wait();
                ReservePlan::new(options, &settings)
                    .build_plan(&db)
                    .and_then(|plan| PlanExecutor::new(&mut db).execute(&plan))
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one racer should get the room");
    for outcome in outcomes.iter().filter(|r| r.is_err()) {
        let err = outcome.as_ref().unwrap_err();
        assert!(err.is_slot_unavailable(), "unexpected error: {err}");
    }

    let active = Database::list_reservations_by_status(t.db.connection(), ReservationStatus::Approved)
        .unwrap();
    assert_eq!(active.len(), 1);
}
