//! Repository for the `iterations` table.

use std::collections::HashMap;

use festoon_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::image::Image;
use crate::models::iteration::{CreateIteration, Iteration, IterationWithImages};
use crate::repositories::ImageRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, theme, details, decoration_types, size, created_at";

/// Size stored when the caller does not specify one.
const DEFAULT_SIZE: &str = "1024x1024";

/// Provides create/read/delete operations for iterations.
pub struct IterationRepo;

impl IterationRepo {
    /// Insert an iteration and all of its images in one transaction.
    ///
    /// Images without an explicit position take their index in
    /// `input.images`.
    pub async fn create(
        pool: &SqlitePool,
        project_id: DbId,
        input: &CreateIteration,
    ) -> Result<IterationWithImages, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO iterations (project_id, theme, details, decoration_types, size)
             VALUES (?1, ?2, ?3, ?4, COALESCE(?5, '{DEFAULT_SIZE}'))
             RETURNING {COLUMNS}"
        );
        let iteration = sqlx::query_as::<_, Iteration>(&insert_query)
            .bind(project_id)
            .bind(&input.theme)
            .bind(&input.details)
            .bind(Json(&input.decoration_types))
            .bind(&input.size)
            .fetch_one(&mut *tx)
            .await?;

        let mut images = Vec::with_capacity(input.images.len());
        for (i, image) in input.images.iter().enumerate() {
            let position = image.position.unwrap_or(i as i64);
            images.push(ImageRepo::create(&mut *tx, iteration.id, image, position).await?);
        }
        images.sort_by_key(|img| (img.position, img.id));

        tx.commit().await?;

        tracing::debug!(
            iteration_id = iteration.id,
            project_id,
            image_count = images.len(),
            "Iteration created",
        );

        Ok(IterationWithImages { iteration, images })
    }

    /// Find an iteration belonging to `project_id`, enriched with its images.
    pub async fn find_by_id_with_images(
        pool: &SqlitePool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<IterationWithImages>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM iterations WHERE id = ?1 AND project_id = ?2");
        let iteration = sqlx::query_as::<_, Iteration>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?;

        match iteration {
            Some(iteration) => {
                let images = ImageRepo::list_by_iteration(pool, iteration.id).await?;
                Ok(Some(IterationWithImages { iteration, images }))
            }
            None => Ok(None),
        }
    }

    /// List a project's iterations, newest first.
    pub async fn list_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<Iteration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM iterations WHERE project_id = ?1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Iteration>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a project's iterations with their images, newest first.
    ///
    /// Uses two queries regardless of the number of iterations.
    pub async fn list_with_images_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<IterationWithImages>, sqlx::Error> {
        let iterations = Self::list_by_project(pool, project_id).await?;
        let images = ImageRepo::list_by_project(pool, project_id).await?;

        let mut by_iteration: HashMap<DbId, Vec<Image>> = HashMap::new();
        for image in images {
            by_iteration.entry(image.iteration_id).or_default().push(image);
        }

        Ok(iterations
            .into_iter()
            .map(|iteration| {
                let images = by_iteration.remove(&iteration.id).unwrap_or_default();
                IterationWithImages { iteration, images }
            })
            .collect())
    }

    /// Delete an iteration of `project_id` and, by cascade, its images.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM iterations WHERE id = ?1 AND project_id = ?2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
