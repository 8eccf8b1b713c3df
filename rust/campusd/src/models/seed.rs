//! Demo records the stores start with when `seed_demo_data` is on.

use chrono::{Duration, NaiveDate, Utc};

use super::classes::{ClassData, ClassStatus, Section, TeacherSnapshot};
use super::notices::{Audience, Notice, NoticeStatus, Priority};
use super::students::{Student, StudentStatus};
use super::subjects::{Subject, SubjectStatus, SubjectType};
use super::teachers::{Teacher, TeacherStatus};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn section(
    id: &str,
    name: &str,
    capacity: u32,
    student_count: u32,
    teacher: Option<(&str, &str)>,
) -> Section {
    Section {
        id: id.to_string(),
        name: name.to_string(),
        capacity,
        student_count,
        room: Some(format!("Room {}", id.to_uppercase())),
        class_teacher: teacher.map(|(id, name)| TeacherSnapshot {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
        }),
    }
}

pub fn classes() -> Vec<ClassData> {
    let now = Utc::now();
    vec![
        ClassData {
            id: "class-1".to_string(),
            class_name: "Grade 1".to_string(),
            description: "Foundation year".to_string(),
            academic_year: Some("2026-2027".to_string()),
            status: ClassStatus::Active,
            sections: vec![
                section("g1a", "A", 30, 3, Some(("teacher-1", "Maya Patel"))),
                section("g1b", "B", 30, 1, None),
            ],
            created_at: Some(now),
            updated_at: None,
        },
        ClassData {
            id: "class-2".to_string(),
            class_name: "Grade 10".to_string(),
            description: "Board examination year".to_string(),
            academic_year: Some("2026-2027".to_string()),
            status: ClassStatus::Active,
            sections: vec![section("g10a", "A", 40, 2, Some(("teacher-2", "Daniel Okafor")))],
            created_at: Some(now),
            updated_at: None,
        },
        ClassData {
            id: "class-3".to_string(),
            class_name: "Grade 12".to_string(),
            description: "Merged into Grade 11 this year".to_string(),
            academic_year: Some("2025-2026".to_string()),
            status: ClassStatus::Inactive,
            sections: vec![section("g12a", "A", 35, 0, None)],
            created_at: Some(now),
            updated_at: None,
        },
    ]
}

fn student(
    n: u32,
    roll_no: &str,
    (first, last): (&str, &str),
    (class, section): (&str, &str),
    tags: &[&str],
) -> Student {
    Student {
        id: format!("student-{n}"),
        roll_no: roll_no.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!(
            "{}.{}@students.school.test",
            first.to_lowercase(),
            last.to_lowercase()
        )),
        phone: None,
        class: class.to_string(),
        section: section.to_string(),
        status: StudentStatus::Active,
        tags: strings(tags),
        guardian_name: None,
        admission_date: NaiveDate::from_ymd_opt(2026, 4, 1),
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

pub fn students() -> Vec<Student> {
    vec![
        student(1, "G1A-01", ("Ava", "Brown"), ("Grade 1", "A"), &["bus"]),
        student(2, "G1A-02", ("Liam", "Chen"), ("Grade 1", "A"), &[]),
        student(3, "G1A-03", ("Sofia", "Garcia"), ("Grade 1", "A"), &["lunch"]),
        student(4, "G1B-01", ("Noah", "Singh"), ("Grade 1", "B"), &["bus", "lunch"]),
        student(5, "G10A-01", ("Emma", "Williams"), ("Grade 10", "A"), &["prefect"]),
        student(6, "G10A-02", ("Yusuf", "Haddad"), ("Grade 10", "A"), &[]),
    ]
}

pub fn teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "teacher-1".to_string(),
            teacher_id: "T001".to_string(),
            first_name: "Maya".to_string(),
            last_name: "Patel".to_string(),
            email: "maya.patel@school.test".to_string(),
            phone: Some("+1 555 0100".to_string()),
            specialization: strings(&["English", "Art"]),
            assigned_classes: strings(&["1-A"]),
            status: TeacherStatus::Active,
            joining_date: NaiveDate::from_ymd_opt(2019, 8, 15),
            experience_years: Some(9),
            created_at: Some(Utc::now()),
            updated_at: None,
        },
        Teacher {
            id: "teacher-2".to_string(),
            teacher_id: "T002".to_string(),
            first_name: "Daniel".to_string(),
            last_name: "Okafor".to_string(),
            email: "daniel.okafor@school.test".to_string(),
            phone: None,
            specialization: strings(&["Mathematics", "Physics"]),
            assigned_classes: strings(&["10-A", "12-A"]),
            status: TeacherStatus::Active,
            joining_date: NaiveDate::from_ymd_opt(2015, 1, 6),
            experience_years: Some(14),
            created_at: Some(Utc::now()),
            updated_at: None,
        },
        Teacher {
            id: "teacher-3".to_string(),
            teacher_id: "T003".to_string(),
            first_name: "Hana".to_string(),
            last_name: "Kobayashi".to_string(),
            email: "hana.kobayashi@school.test".to_string(),
            phone: None,
            specialization: strings(&["Music"]),
            assigned_classes: Vec::new(),
            status: TeacherStatus::OnLeave,
            joining_date: NaiveDate::from_ymd_opt(2022, 9, 1),
            experience_years: Some(4),
            created_at: Some(Utc::now()),
            updated_at: None,
        },
    ]
}

fn subject(
    n: u32,
    (name, code): (&str, &str),
    subject_type: SubjectType,
    credits: Option<u32>,
    description: &str,
) -> Subject {
    Subject {
        id: format!("subject-{n}"),
        name: name.to_string(),
        code: code.to_string(),
        description: description.to_string(),
        subject_type,
        status: SubjectStatus::Active,
        credits,
        grade_levels: Vec::new(),
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

pub fn subjects() -> Vec<Subject> {
    let mut retired = subject(
        5,
        ("Latin", "LAT101"),
        SubjectType::Elective,
        Some(2),
        "Classical language",
    );
    retired.status = SubjectStatus::Inactive;
    vec![
        subject(1, ("Mathematics", "MTH101"), SubjectType::Core, Some(5), "Number, algebra and geometry"),
        subject(2, ("English", "ENG101"), SubjectType::Core, Some(5), "Reading and composition"),
        subject(3, ("Computer Science", "CS201"), SubjectType::Elective, Some(3), "Programming basics"),
        subject(4, ("Football", "FTB001"), SubjectType::Extracurricular, None, "After-school team"),
        retired,
    ]
}

pub fn notices() -> Vec<Notice> {
    let today = Utc::now().date_naive();
    let notice = |n: u32,
                  title: &str,
                  offset: i64,
                  audience: Audience,
                  status: NoticeStatus,
                  priority: Priority| Notice {
        id: format!("notice-{n}"),
        title: title.to_string(),
        content: format!("{title}: see the office for details."),
        audience,
        status,
        priority,
        date: today + Duration::days(offset),
        author: Some("Principal's Office".to_string()),
        created_at: Some(Utc::now()),
        updated_at: None,
    };
    vec![
        notice(1, "Annual sports day", 7, Audience::All, NoticeStatus::Published, Priority::Medium),
        notice(2, "Mid-term examinations", 10, Audience::Students, NoticeStatus::Published, Priority::High),
        notice(3, "Staff training", -2, Audience::Teachers, NoticeStatus::Archived, Priority::Low),
        notice(4, "Parent-teacher meeting", 14, Audience::Parents, NoticeStatus::Draft, Priority::Medium),
    ]
}
