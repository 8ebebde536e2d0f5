//! Project aggregate manager tests with a pinned calendar date.

use chrono::NaiveDate;
use project_board::db::Database;
use project_board::error::Error;
use project_board::models::*;
use project_board::service::ProjectService;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
}

fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
}

fn setup() -> (ProjectService, Database) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    (ProjectService::with_clock(db.clone(), today), db)
}

fn create_project(service: &ProjectService, deadline: Option<NaiveDate>) -> Project {
    service
        .create(ProjectInput {
            title: "Distributed Systems".to_string(),
            subject: Some("CS401".to_string()),
            deadline,
            ..Default::default()
        })
        .expect("Failed to create project")
}

fn task_input(title: &str, status: TaskStatus) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        status: Some(status),
        ..Default::default()
    }
}

mod create {
    use super::*;

    #[test]
    fn stamps_creation_date_and_assigns_id() {
        let (service, _) = setup();
        let project = create_project(&service, None);

        assert!(!project.id.is_empty());
        assert_eq!(project.creation_date, today());
        assert_eq!(project.completion_percent, 0.0);
        assert_eq!(project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn rejects_blank_title() {
        let (service, db) = setup();

        let result = service.create(ProjectInput {
            title: "   ".to_string(),
            ..Default::default()
        });

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(db.find_all().unwrap().is_empty());
    }

    #[test]
    fn project_created_past_deadline_is_late() {
        let (service, _) = setup();
        let project = create_project(&service, Some(yesterday()));
        assert_eq!(project.status, ProjectStatus::Late);
    }
}

mod get {
    use super::*;

    #[test]
    fn returns_not_found_for_unknown_id() {
        let (service, _) = setup();
        let result = service.get("X");
        assert!(matches!(result, Err(Error::ProjectNotFound(id)) if id == "X"));
    }

    #[test]
    fn refreshes_status_against_the_clock() {
        let (service, db) = setup();
        let created = create_project(&service, Some(tomorrow()));

        // Saved as in progress, but the deadline has passed by the time it is read.
        let later = ProjectService::with_clock(db, || NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        let project = later.get(&created.id).unwrap();

        assert_eq!(project.status, ProjectStatus::Late);
    }
}

mod update {
    use super::*;

    #[test]
    fn overwrites_metadata_and_keeps_tasks() {
        let (service, _) = setup();
        let created = create_project(&service, None);
        service
            .add_task(&created.id, task_input("Design", TaskStatus::Done))
            .unwrap();

        let updated = service
            .update(
                &created.id,
                ProjectInput {
                    title: "Renamed".to_string(),
                    description: Some("New scope".to_string()),
                    subject: None,
                    deadline: Some(yesterday()),
                    members: vec!["ana".to_string(), "ana".to_string()],
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert!(updated.subject.is_none());
        assert_eq!(updated.members, vec!["ana".to_string()]);
        assert_eq!(updated.tasks.len(), 1);
        assert_eq!(updated.creation_date, created.creation_date);
        assert_eq!(updated.status, ProjectStatus::Done);
    }

    #[test]
    fn returns_not_found_for_unknown_id() {
        let (service, _) = setup();
        let result = service.update(
            "missing",
            ProjectInput {
                title: "Anything".to_string(),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }
}

mod delete {
    use super::*;

    #[test]
    fn removes_the_project() {
        let (service, _) = setup();
        let project = create_project(&service, None);

        service.delete(&project.id).unwrap();

        assert!(matches!(service.get(&project.id), Err(Error::ProjectNotFound(_))));
    }

    #[test]
    fn returns_not_found_for_unknown_id() {
        let (service, _) = setup();
        assert!(matches!(service.delete("missing"), Err(Error::ProjectNotFound(_))));
    }
}

mod tasks {
    use super::*;

    #[test]
    fn half_done_project_without_deadline_is_in_progress() {
        let (service, _) = setup();
        let project = create_project(&service, None);

        service.add_task(&project.id, task_input("A", TaskStatus::Done)).unwrap();
        service.add_task(&project.id, task_input("B", TaskStatus::Done)).unwrap();
        service.add_task(&project.id, task_input("C", TaskStatus::Doing)).unwrap();
        let project = service
            .add_task(&project.id, task_input("D", TaskStatus::ToDo))
            .unwrap();

        assert_eq!(project.tasks.len(), 4);
        assert_eq!(project.completion_percent, 50.0);
        assert_eq!(project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn add_task_marks_overdue_task_late() {
        let (service, _) = setup();
        let project = create_project(&service, None);

        let project = service
            .add_task(
                &project.id,
                TaskInput {
                    title: "Overdue".to_string(),
                    deadline: Some(yesterday()),
                    ..Default::default()
                },
            )
            .unwrap();

        let task = &project.tasks[0];
        assert!(task.is_late);
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn add_task_to_missing_project_is_not_found() {
        let (service, _) = setup();
        let result = service.add_task("X", task_input("Orphan", TaskStatus::ToDo));
        assert!(matches!(result, Err(Error::ProjectNotFound(id)) if id == "X"));
    }

    #[test]
    fn completing_the_last_task_finishes_an_overdue_project() {
        let (service, _) = setup();
        let project = create_project(&service, Some(yesterday()));
        let project = service
            .add_task(
                &project.id,
                TaskInput {
                    title: "Final report".to_string(),
                    deadline: Some(yesterday()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(project.status, ProjectStatus::Late);
        let task_id = project.tasks[0].id.clone();

        let project = service
            .set_task_status(&project.id, &task_id, "DONE")
            .unwrap();

        assert_eq!(project.completion_percent, 100.0);
        assert_eq!(project.status, ProjectStatus::Done);
        assert!(!project.tasks[0].is_late);
    }

    #[test]
    fn set_status_on_unknown_task_changes_nothing() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        let before = service
            .add_task(&project.id, task_input("Only", TaskStatus::Doing))
            .unwrap();

        let after = service
            .set_task_status(&project.id, "no-such-task", "DONE")
            .unwrap();

        assert_eq!(after, before);
    }

    #[test]
    fn set_status_on_missing_project_is_not_found() {
        let (service, _) = setup();
        let result = service.set_task_status("missing", "task", "DONE");
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }

    #[test]
    fn set_status_on_missing_project_with_unknown_status_is_not_found() {
        let (service, _) = setup();
        let result = service.set_task_status("missing", "task", "bogus");
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }

    #[test]
    fn set_status_rejects_unknown_status() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        let project = service
            .add_task(&project.id, task_input("Only", TaskStatus::ToDo))
            .unwrap();

        let result = service.set_task_status(&project.id, &project.tasks[0].id, "FINISHED");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn remove_task_recomputes_completion() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        service.add_task(&project.id, task_input("Done", TaskStatus::Done)).unwrap();
        let project = service
            .add_task(&project.id, task_input("Open", TaskStatus::ToDo))
            .unwrap();
        let open_id = project.tasks[1].id.clone();

        let project = service.remove_task(&project.id, &open_id).unwrap();

        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.completion_percent, 100.0);
        assert_eq!(project.status, ProjectStatus::Done);
    }

    #[test]
    fn remove_unknown_task_changes_nothing() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        let before = service
            .add_task(&project.id, task_input("Keep", TaskStatus::ToDo))
            .unwrap();

        let after = service.remove_task(&project.id, "no-such-task").unwrap();

        assert_eq!(after, before);
    }
}

mod members {
    use super::*;

    #[test]
    fn add_member_is_idempotent() {
        let (service, _) = setup();
        let project = create_project(&service, None);

        service.add_member(&project.id, "ana@uni.edu").unwrap();
        let project = service.add_member(&project.id, "ana@uni.edu").unwrap();

        assert_eq!(project.members, vec!["ana@uni.edu".to_string()]);
    }

    #[test]
    fn add_member_rejects_blank_names() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        let result = service.add_member(&project.id, " ");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn blank_member_on_missing_project_is_not_found() {
        let (service, _) = setup();
        let result = service.add_member("missing", " ");
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }

    #[test]
    fn add_member_to_missing_project_is_not_found() {
        let (service, _) = setup();
        let result = service.add_member("missing", "ana");
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }
}

mod finders {
    use super::*;

    #[test]
    fn filter_by_status_reflects_last_saved_status() {
        let (service, db) = setup();
        let project = create_project(&service, Some(tomorrow()));

        let later = ProjectService::with_clock(db, || NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());

        // Nothing has been written since the deadline passed.
        let in_progress = later.filter_by_status(ProjectStatus::InProgress).unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].status, ProjectStatus::InProgress);
        assert!(later.filter_by_status(ProjectStatus::Late).unwrap().is_empty());

        // Any write recomputes and stores the new status.
        later.add_member(&project.id, "ana").unwrap();
        assert_eq!(later.filter_by_status(ProjectStatus::Late).unwrap().len(), 1);
    }

    #[test]
    fn find_by_member_and_subject() {
        let (service, _) = setup();
        let project = create_project(&service, None);
        service.add_member(&project.id, "bob").unwrap();
        service
            .create(ProjectInput {
                title: "Other".to_string(),
                subject: Some("MATH200".to_string()),
                ..Default::default()
            })
            .unwrap();

        let by_member = service.find_by_member("bob").unwrap();
        assert_eq!(by_member.len(), 1);
        assert_eq!(by_member[0].id, project.id);

        let by_subject = service.find_by_subject("MATH200").unwrap();
        assert_eq!(by_subject.len(), 1);
        assert_eq!(by_subject[0].title, "Other");
    }

    #[test]
    fn search_by_title_is_case_insensitive() {
        let (service, _) = setup();
        create_project(&service, None);

        let found = service.search_by_title("DISTRIBUTED").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn list_refreshes_every_project() {
        let (service, db) = setup();
        create_project(&service, Some(tomorrow()));
        create_project(&service, None);

        let later = ProjectService::with_clock(db, || NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        let projects = later.list().unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].status, ProjectStatus::Late);
        assert_eq!(projects[1].status, ProjectStatus::InProgress);
    }
}
