//! Integration tests for project / iteration / image persistence.
//!
//! Exercises the full repository layer against a real SQLite database:
//! - Create full hierarchy (project -> iteration -> images)
//! - Fetch round-trip returns the same data
//! - Cascade delete behaviour
//! - Foreign key violations
//! - Update and list operations

use festoon_db::models::image::CreateImage;
use festoon_db::models::iteration::CreateIteration;
use festoon_db::models::project::{CreateProject, UpdateProject};
use festoon_db::repositories::{ImageRepo, IterationRepo, ProjectRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
    }
}

fn new_image(decoration_type: &str, url: &str, position: Option<i64>) -> CreateImage {
    CreateImage {
        decoration_type: decoration_type.to_string(),
        image_url: url.to_string(),
        prompt: format!("{decoration_type} prompt"),
        position,
    }
}

fn new_iteration(theme: &str, images: Vec<CreateImage>) -> CreateIteration {
    CreateIteration {
        theme: theme.to_string(),
        details: Some("gold and navy".to_string()),
        decoration_types: vec!["Cake topper".to_string(), "Banner".to_string()],
        size: None,
        images,
    }
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_project_iteration_round_trip(pool: SqlitePool) {
    let project = ProjectRepo::create(&pool, &new_project("Mia turns 5"))
        .await
        .unwrap();

    let created = IterationRepo::create(
        &pool,
        project.id,
        &new_iteration(
            "Mermaid lagoon",
            vec![
                new_image("Banner", "data:image/png;base64,BBBB", Some(1)),
                new_image("Cake topper", "data:image/png;base64,AAAA", Some(0)),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(created.iteration.project_id, project.id);
    assert_eq!(created.iteration.size, "1024x1024");
    assert_eq!(created.images.len(), 2);

    let fetched = ProjectRepo::find_by_id_with_iterations(&pool, project.id)
        .await
        .unwrap()
        .expect("project should exist");

    assert_eq!(fetched.project.name, "Mia turns 5");
    assert_eq!(fetched.iterations.len(), 1);

    let iteration = &fetched.iterations[0];
    assert_eq!(iteration.iteration.theme, "Mermaid lagoon");
    assert_eq!(iteration.iteration.details.as_deref(), Some("gold and navy"));
    assert_eq!(
        iteration.iteration.decoration_types.0,
        vec!["Cake topper".to_string(), "Banner".to_string()]
    );

    // Images come back ordered by position, not insertion order.
    let types: Vec<_> = iteration
        .images
        .iter()
        .map(|i| i.decoration_type.as_str())
        .collect();
    assert_eq!(types, vec!["Cake topper", "Banner"]);
    assert_eq!(iteration.images[0].image_url, "data:image/png;base64,AAAA");
    assert_eq!(iteration.images[0].prompt, "Cake topper prompt");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_image_position_defaults_to_list_index(pool: SqlitePool) {
    let project = ProjectRepo::create(&pool, &new_project("Defaults"))
        .await
        .unwrap();

    let created = IterationRepo::create(
        &pool,
        project.id,
        &new_iteration(
            "Space",
            vec![
                new_image("Cake topper", "data:image/png;base64,AAAA", None),
                new_image("Banner", "data:image/png;base64,BBBB", None),
            ],
        ),
    )
    .await
    .unwrap();

    let positions: Vec<_> = created.images.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1]);

    let listed = ImageRepo::list_by_iteration(&pool, created.iteration.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_iterations_listed_newest_first(pool: SqlitePool) {
    let project = ProjectRepo::create(&pool, &new_project("Many runs"))
        .await
        .unwrap();

    for theme in ["First", "Second", "Third"] {
        IterationRepo::create(&pool, project.id, &new_iteration(theme, vec![]))
            .await
            .unwrap();
    }

    let iterations = IterationRepo::list_by_project(&pool, project.id)
        .await
        .unwrap();
    let themes: Vec<_> = iterations.iter().map(|i| i.theme.as_str()).collect();
    assert_eq!(themes, vec!["Third", "Second", "First"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_iteration_is_scoped_to_project(pool: SqlitePool) {
    let a = ProjectRepo::create(&pool, &new_project("A")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B")).await.unwrap();

    let created = IterationRepo::create(&pool, a.id, &new_iteration("Pirates", vec![]))
        .await
        .unwrap();

    let found = IterationRepo::find_by_id_with_images(&pool, a.id, created.iteration.id)
        .await
        .unwrap();
    assert!(found.is_some());

    let wrong_project = IterationRepo::find_by_id_with_images(&pool, b.id, created.iteration.id)
        .await
        .unwrap();
    assert!(wrong_project.is_none());
}

// ---------------------------------------------------------------------------
// Update / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_project_applies_only_given_fields(pool: SqlitePool) {
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Original".to_string(),
            description: Some("keep me".to_string()),
        },
    )
    .await
    .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Some("Renamed".to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .expect("project should exist");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description.as_deref(), Some("keep me"));
    assert!(updated.updated_at >= project.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_project_returns_none(pool: SqlitePool) {
    let result = ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_projects(pool: SqlitePool) {
    ProjectRepo::create(&pool, &new_project("P1")).await.unwrap();
    ProjectRepo::create(&pool, &new_project("P2")).await.unwrap();

    let projects = ProjectRepo::list(&pool).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "P2");
}

// ---------------------------------------------------------------------------
// Referential integrity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_project_cascades(pool: SqlitePool) {
    let project = ProjectRepo::create(&pool, &new_project("Cascade"))
        .await
        .unwrap();
    let created = IterationRepo::create(
        &pool,
        project.id,
        &new_iteration(
            "Circus",
            vec![new_image("Banner", "data:image/png;base64,AAAA", None)],
        ),
    )
    .await
    .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    assert!(
        IterationRepo::find_by_id_with_images(&pool, project.id, created.iteration.id)
            .await
            .unwrap()
            .is_none()
    );
    let images = ImageRepo::list_by_iteration(&pool, created.iteration.id)
        .await
        .unwrap();
    assert!(images.is_empty());

    // Second delete is a no-op.
    assert!(!ProjectRepo::delete(&pool, project.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_iteration_for_missing_project_is_rejected(pool: SqlitePool) {
    let result = IterationRepo::create(&pool, 424_242, &new_iteration("Orphan", vec![])).await;
    assert!(
        matches!(result, Err(sqlx::Error::Database(_))),
        "expected a foreign key violation, got {result:?}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_iteration_is_scoped_to_project(pool: SqlitePool) {
    let a = ProjectRepo::create(&pool, &new_project("A")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B")).await.unwrap();
    let created = IterationRepo::create(&pool, a.id, &new_iteration("Luau", vec![]))
        .await
        .unwrap();

    assert!(!IterationRepo::delete(&pool, b.id, created.iteration.id)
        .await
        .unwrap());
    assert!(IterationRepo::delete(&pool, a.id, created.iteration.id)
        .await
        .unwrap());
    assert!(IterationRepo::list_by_project(&pool, a.id)
        .await
        .unwrap()
        .is_empty());
}
