//! Repository for the `images` table.

use festoon_core::types::DbId;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::image::{CreateImage, Image};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, iteration_id, decoration_type, image_url, prompt, position, created_at";

/// Same columns, qualified for joins.
const QUALIFIED_COLUMNS: &str = "images.id, images.iteration_id, images.decoration_type, \
     images.image_url, images.prompt, images.position, images.created_at";

/// Provides insert and read operations for generated images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert one image for `iteration_id` at `position`.
    ///
    /// Accepts any executor so it can run inside the iteration transaction.
    pub async fn create<'e, E>(
        executor: E,
        iteration_id: DbId,
        input: &CreateImage,
        position: i64,
    ) -> Result<Image, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO images (iteration_id, decoration_type, image_url, prompt, position)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(iteration_id)
            .bind(&input.decoration_type)
            .bind(&input.image_url)
            .bind(&input.prompt)
            .bind(position)
            .fetch_one(executor)
            .await
    }

    /// List an iteration's images ordered by position.
    pub async fn list_by_iteration(
        pool: &SqlitePool,
        iteration_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images WHERE iteration_id = ?1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(iteration_id)
            .fetch_all(pool)
            .await
    }

    /// List every image of every iteration in a project, ordered by
    /// iteration then position.
    pub async fn list_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM images
             JOIN iterations ON iterations.id = images.iteration_id
             WHERE iterations.project_id = ?1
             ORDER BY images.iteration_id, images.position, images.id"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
