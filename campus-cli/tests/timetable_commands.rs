//! Integration tests for the `timetable` commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_professor_timetable_is_in_weekly_order() {
    let env = TestEnv::new();
    let professor = env.add_person("Ada", "Lovelace", "PROFESSOR");
    env.create_group("CS101", Some(&professor), &["Thursday,09:00,10:00,Lecture"]);
    env.create_group("CS102", Some(&professor), &["Monday,13:00,14:00,Lecture"]);
    env.run(&[
        "timetable",
        "add",
        &professor,
        "--entry",
        "Monday,08:00,09:00,Office hours,B-12",
    ]);

    let csv = env.run(&["timetable", "professor", &professor, "--format", "csv"]);
    let days: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(days, ["Monday", "Monday", "Thursday"]);
    assert!(csv.contains("Monday,08:00,09:00,Office hours,B-12"));
}

#[test]
fn test_personal_entries_survive_group_changes() {
    let env = TestEnv::new();
    let professor = env.add_person("Ada", "Lovelace", "PROFESSOR");
    let group = env.create_group("CS101", Some(&professor), &["Monday,09:00,10:00,Lecture"]);
    env.run(&[
        "timetable",
        "add",
        &professor,
        "--entry",
        "Friday,08:00,09:00,Office hours",
    ]);

    env.run(&["group", "delete", &group]);
    let csv = env.run(&["timetable", "professor", &professor, "--format", "csv"]);
    assert!(csv.contains("Office hours"));
    assert!(!csv.contains("CS101"));
}

#[test]
fn test_personal_entries_block_new_groups() {
    let env = TestEnv::new();
    let professor = env.add_person("Ada", "Lovelace", "PROFESSOR");
    env.run(&[
        "timetable",
        "add",
        &professor,
        "--entry",
        "Tuesday,10:00,11:00,Committee",
    ]);

    env.command()
        .args([
            "group",
            "create",
            "--name",
            "Section A",
            "--course-code",
            "CS101",
            "--professor",
            &professor,
            "--entry",
            "Tuesday,10:30,11:30,Lecture",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Professor Ada Lovelace"));
}

#[test]
fn test_student_timetable_collects_every_group() {
    let env = TestEnv::new();
    let student = env.add_person("Alan", "Turing", "STUDENT");
    let first = env.create_group("CS101", None, &["Wednesday,09:00,10:00,Lecture"]);
    let second = env.create_group("MA201", None, &["Monday,11:00,12:00,Tutorial"]);
    env.run(&["group", "enroll", &first, "--student", &student]);
    env.run(&["group", "enroll", &second, "--student", &student]);

    env.command()
        .args(["timetable", "student", &student])
        .assert()
        .success()
        .stdout(predicate::str::contains("DAY"))
        .stdout(predicate::str::contains("MA201: Tutorial"))
        .stdout(predicate::str::contains("CS101: Lecture"));

    let json = env.run(&["timetable", "student", &student, "--format", "json"]);
    let entries: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["day"], "Monday");
}

#[test]
fn test_timetable_role_checks() {
    let env = TestEnv::new();
    let student = env.add_person("Alan", "Turing", "STUDENT");

    env.command()
        .args(["timetable", "professor", &student])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected PROFESSOR"));

    env.command()
        .args(["timetable", "student", "999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}
