//! Scheduling operations using the plan-execute pattern.
//!
//! Every write is split into two phases:
//! 1. **Planning** resolves ids, checks roles, policy and conflicts, and
//!    builds an [`OperationPlan`] without writing anything.
//! 2. **Execution** applies the plan inside one IMMEDIATE transaction,
//!    re-checking each conflict rule against what it sees there, then
//!    delivers admin notifications after commit.
//!
//! Planning alone gives dry-run output; plans can also be inspected in
//! tests without touching the database.
//!
//! # Examples
//!
//! ```no_run
//! use campus::operations::{PlanExecutor, ReserveOptions, ReservePlan};
//! use campus::{ClassroomId, Database, DatabaseConfig, PersonId, Settings};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/campus.db")).unwrap();
//! let settings = Settings::default();
//!
//! let options = ReserveOptions::new(PersonId(3), ClassroomId(1), "2025-03-10", "14:00", "15:00")
//!     .with_purpose(Some("Study group".into()));
//! let plan = ReservePlan::new(options, &settings).build_plan(&db).unwrap();
//!
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! println!("created {:?}", result.reservation);
//! ```

pub mod availability;
pub mod cancel;
pub mod checks;
pub mod edit;
pub mod executor;
pub mod groups;
pub mod init;
pub mod plan;
pub mod policy;
pub mod reserve;
pub mod review;
pub mod views;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use availability::{find_available_classrooms, AvailabilityQuery};
pub use cancel::{CancelOptions, CancelPlan};
pub use edit::{EditOptions, EditPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use groups::{
    check_group_schedule, CreateGroupOptions, CreateGroupPlan, DeleteGroupPlan, EnrollPlan,
    ResyncPlan, ScheduleGroupPlan, UnenrollPlan, UpdateGroupOptions, UpdateGroupPlan,
};
pub use init::{init_database, InitOptions, InitResult};
pub use plan::{NewClassGroup, OperationPlan, PlanAction, RoomCheck};
pub use reserve::{ReserveOptions, ReservePlan};
pub use review::{Decision, ReviewOptions, ReviewPlan};
pub use views::{add_professor_entry, professor_timetable, student_timetable};
