//! The portal's static mock dataset. Loaded once at startup; ids are
//! human-readable codes so cross-entity references read naturally in
//! fixtures and tests. Records created at runtime get UUID ids instead.

use crate::directory::Directory;
use crate::schema::{Assignment, Course, Department, Group, Program, Student, Teacher};

pub fn directory() -> anyhow::Result<Directory> {
    let mut dir = Directory::new();

    for record in departments() {
        dir.departments.store.insert(record)?;
    }
    for record in programs() {
        dir.programs.store.insert(record)?;
    }
    for record in groups() {
        dir.groups.store.insert(record)?;
    }
    for record in teachers() {
        dir.teachers.store.insert(record)?;
    }
    for record in students() {
        dir.students.store.insert(record)?;
    }
    for record in courses() {
        dir.courses.store.insert(record)?;
    }
    for record in assignments() {
        dir.assignments.store.insert(record)?;
    }

    Ok(dir)
}

fn departments() -> Vec<Department> {
    vec![
        Department {
            id: "INFO".into(),
            name: "Informatique".into(),
            code: "INFO".into(),
            description: "Computer science and software engineering".into(),
        },
        Department {
            id: "MATH".into(),
            name: "Mathématiques".into(),
            code: "MATH".into(),
            description: "Pure and applied mathematics".into(),
        },
        Department {
            id: "PHYS".into(),
            name: "Physique".into(),
            code: "PHYS".into(),
            description: "Physics and engineering sciences".into(),
        },
    ]
}

fn programs() -> Vec<Program> {
    vec![
        Program {
            id: "IAWM".into(),
            name: "Informatique Appliquée Web & Mobile".into(),
            code: "IAWM".into(),
            department: "INFO".into(),
            coordinator: "t-001".into(),
            duration_years: 3,
        },
        Program {
            id: "GL".into(),
            name: "Génie Logiciel".into(),
            code: "GL".into(),
            department: "INFO".into(),
            coordinator: "t-002".into(),
            duration_years: 5,
        },
        Program {
            id: "AMS".into(),
            name: "Applied Mathematics & Statistics".into(),
            code: "AMS".into(),
            department: "MATH".into(),
            coordinator: "t-003".into(),
            duration_years: 3,
        },
        Program {
            id: "PHEN".into(),
            name: "Physique & Énergies".into(),
            code: "PHEN".into(),
            department: "PHYS".into(),
            coordinator: String::new(),
            duration_years: 3,
        },
    ]
}

fn groups() -> Vec<Group> {
    vec![
        Group {
            id: "IAWM1".into(),
            name: "IAWM - 1st year".into(),
            code: "IAWM1".into(),
            program: "IAWM".into(),
            capacity: 30,
        },
        Group {
            id: "IAWM2".into(),
            name: "IAWM - 2nd year".into(),
            code: "IAWM2".into(),
            program: "IAWM".into(),
            capacity: 28,
        },
        Group {
            id: "GL1".into(),
            name: "GL - 1st year".into(),
            code: "GL1".into(),
            program: "GL".into(),
            capacity: 25,
        },
        Group {
            id: "AMS1".into(),
            name: "AMS - 1st year".into(),
            code: "AMS1".into(),
            program: "AMS".into(),
            capacity: 35,
        },
        Group {
            id: "PHEN1".into(),
            name: "PHEN - 1st year".into(),
            code: "PHEN1".into(),
            program: "PHEN".into(),
            capacity: 32,
        },
    ]
}

fn teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "t-001".into(),
            first_name: "Yasmine".into(),
            last_name: "Alami".into(),
            email: "y.alami@example.edu".into(),
            department: "INFO".into(),
            speciality: "Software Engineering".into(),
        },
        Teacher {
            id: "t-002".into(),
            first_name: "Karim".into(),
            last_name: "Benjelloun".into(),
            email: "k.benjelloun@example.edu".into(),
            department: "INFO".into(),
            speciality: "Networks".into(),
        },
        Teacher {
            id: "t-003".into(),
            first_name: "Salma".into(),
            last_name: "Touzani".into(),
            email: "s.touzani@example.edu".into(),
            department: "MATH".into(),
            speciality: "Statistics".into(),
        },
        Teacher {
            id: "t-004".into(),
            first_name: "Hicham".into(),
            last_name: "El Fassi".into(),
            email: "h.elfassi@example.edu".into(),
            department: "PHYS".into(),
            speciality: "Electronics".into(),
        },
        Teacher {
            id: "t-005".into(),
            first_name: "Leila".into(),
            last_name: "Chraibi".into(),
            email: "l.chraibi@example.edu".into(),
            department: "INFO".into(),
            speciality: "Databases".into(),
        },
    ]
}

fn students() -> Vec<Student> {
    vec![
        Student {
            id: "s-001".into(),
            first_name: "Amine".into(),
            last_name: "Bouazza".into(),
            email: "a.bouazza@students.example.edu".into(),
            program: "IAWM".into(),
            group: "IAWM1".into(),
            enrollment_code: "24-IAWM-0412".into(),
        },
        Student {
            id: "s-002".into(),
            first_name: "Sara".into(),
            last_name: "Mernissi".into(),
            email: "s.mernissi@students.example.edu".into(),
            program: "IAWM".into(),
            group: "IAWM2".into(),
            enrollment_code: "23-IAWM-1187".into(),
        },
        Student {
            id: "s-003".into(),
            first_name: "Youssef".into(),
            last_name: "Kadiri".into(),
            email: "y.kadiri@students.example.edu".into(),
            program: "GL".into(),
            group: "GL1".into(),
            enrollment_code: "24-GL-0903".into(),
        },
        Student {
            id: "s-004".into(),
            first_name: "Imane".into(),
            last_name: "Ouazzani".into(),
            email: "i.ouazzani@students.example.edu".into(),
            program: "AMS".into(),
            group: "AMS1".into(),
            enrollment_code: "24-AMS-0265".into(),
        },
        Student {
            id: "s-005".into(),
            first_name: "Reda".into(),
            last_name: "Tahiri".into(),
            email: "r.tahiri@students.example.edu".into(),
            program: "PHEN".into(),
            group: "PHEN1".into(),
            enrollment_code: "23-PHEN-0778".into(),
        },
        Student {
            id: "s-006".into(),
            first_name: "Khadija".into(),
            last_name: "Zerouali".into(),
            email: "k.zerouali@students.example.edu".into(),
            program: "IAWM".into(),
            group: "IAWM1".into(),
            enrollment_code: "24-IAWM-0511".into(),
        },
    ]
}

fn courses() -> Vec<Course> {
    vec![
        Course {
            id: "c-web".into(),
            title: "Web Development".into(),
            code: "WEB1".into(),
            credits: 6,
            department: "INFO".into(),
            teacher: "t-001".into(),
        },
        Course {
            id: "c-db".into(),
            title: "Relational Databases".into(),
            code: "DB1".into(),
            credits: 5,
            department: "INFO".into(),
            teacher: "t-005".into(),
        },
        Course {
            id: "c-net".into(),
            title: "Computer Networks".into(),
            code: "NET1".into(),
            credits: 4,
            department: "INFO".into(),
            teacher: "t-002".into(),
        },
        Course {
            id: "c-stat".into(),
            title: "Statistical Inference".into(),
            code: "STAT2".into(),
            credits: 5,
            department: "MATH".into(),
            teacher: "t-003".into(),
        },
        Course {
            id: "c-elec".into(),
            title: "Analog Electronics".into(),
            code: "ELEC1".into(),
            credits: 4,
            department: "PHYS".into(),
            teacher: "t-004".into(),
        },
    ]
}

fn assignments() -> Vec<Assignment> {
    vec![
        Assignment {
            id: "a-001".into(),
            title: "Responsive portfolio site".into(),
            course: "c-web".into(),
            teacher: "t-001".into(),
            group: "IAWM1".into(),
            due_date: "2025-11-15".into(),
        },
        Assignment {
            id: "a-002".into(),
            title: "Normalization exercises".into(),
            course: "c-db".into(),
            teacher: "t-005".into(),
            group: "IAWM2".into(),
            due_date: "2025-11-22".into(),
        },
        Assignment {
            id: "a-003".into(),
            title: "Subnetting lab report".into(),
            course: "c-net".into(),
            teacher: "t-002".into(),
            group: "GL1".into(),
            due_date: "2025-12-01".into(),
        },
        Assignment {
            id: "a-004".into(),
            title: "Hypothesis testing worksheet".into(),
            course: "c-stat".into(),
            teacher: "t-003".into(),
            group: "AMS1".into(),
            due_date: "2025-12-05".into(),
        },
    ]
}
