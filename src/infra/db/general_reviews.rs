use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateGeneralReviewParams, CreateReportParams, GeneralReviewsRepo, LikeToggle, RepoError,
    },
    domain::entities::{
        GeneralReviewRecord, GeneralReviewReportRecord, GeneralReviewView, RestaurantRating,
        UserGeneralReview,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const VIEW_COLUMNS: &str = r#"
    gr.id, gr.user_id, gr.restaurant_id, gr.rating, gr.text, gr.anonymous, gr.created_at,
    (SELECT COUNT(*) FROM general_review_likes l WHERE l.general_review_id = gr.id) AS like_count
"#;

#[derive(sqlx::FromRow)]
struct GeneralReviewRow {
    id: i64,
    user_id: Uuid,
    restaurant_id: i64,
    rating: i32,
    text: Option<String>,
    anonymous: bool,
    created_at: OffsetDateTime,
}

impl From<GeneralReviewRow> for GeneralReviewRecord {
    fn from(row: GeneralReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            restaurant_id: row.restaurant_id,
            rating: row.rating,
            text: row.text,
            anonymous: row.anonymous,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GeneralReviewViewRow {
    #[sqlx(flatten)]
    review: GeneralReviewRow,
    like_count: i64,
}

impl From<GeneralReviewViewRow> for GeneralReviewView {
    fn from(row: GeneralReviewViewRow) -> Self {
        Self {
            review: row.review.into(),
            like_count: row.like_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserGeneralReviewRow {
    #[sqlx(flatten)]
    view: GeneralReviewViewRow,
    restaurant_name: String,
}

#[derive(sqlx::FromRow)]
struct RestaurantRatingRow {
    restaurant_id: i64,
    rating: i32,
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    general_review_id: i64,
    reason: Option<String>,
    user_id: Uuid,
    created_at: OffsetDateTime,
}

#[async_trait]
impl GeneralReviewsRepo for PostgresRepositories {
    async fn ratings_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<RestaurantRating>, RepoError> {
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, RestaurantRatingRow>(
            "SELECT restaurant_id, rating FROM general_reviews WHERE restaurant_id = ANY($1)",
        )
        .bind(restaurant_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| RestaurantRating {
                restaurant_id: row.restaurant_id,
                rating: row.rating,
            })
            .collect())
    }

    async fn list_reviews(&self) -> Result<Vec<GeneralReviewView>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS} FROM general_reviews gr ORDER BY gr.created_at DESC, gr.id DESC"
        );
        let rows = sqlx::query_as::<_, GeneralReviewViewRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(GeneralReviewView::from).collect())
    }

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<GeneralReviewView>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS} FROM general_reviews gr WHERE gr.restaurant_id = $1 \
             ORDER BY gr.created_at DESC, gr.id DESC"
        );
        let rows = sqlx::query_as::<_, GeneralReviewViewRow>(&sql)
            .bind(restaurant_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(GeneralReviewView::from).collect())
    }

    async fn list_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserGeneralReview>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS}, r.name AS restaurant_name \
             FROM general_reviews gr \
             INNER JOIN restaurants r ON r.id = gr.restaurant_id \
             WHERE gr.user_id = $1 \
             ORDER BY gr.created_at DESC, gr.id DESC"
        );
        let rows = sqlx::query_as::<_, UserGeneralReviewRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| UserGeneralReview {
                review: row.view.into(),
                restaurant_name: row.restaurant_name,
            })
            .collect())
    }

    async fn find_review(&self, id: i64) -> Result<Option<GeneralReviewView>, RepoError> {
        let sql = format!("SELECT {VIEW_COLUMNS} FROM general_reviews gr WHERE gr.id = $1");
        let row = sqlx::query_as::<_, GeneralReviewViewRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(GeneralReviewView::from))
    }

    async fn create_review(
        &self,
        params: CreateGeneralReviewParams,
    ) -> Result<GeneralReviewRecord, RepoError> {
        let row = sqlx::query_as::<_, GeneralReviewRow>(
            r#"
            INSERT INTO general_reviews (user_id, restaurant_id, rating, text, anonymous)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, restaurant_id, rating, text, anonymous, created_at
            "#,
        )
        .bind(params.user_id)
        .bind(params.restaurant_id)
        .bind(params.rating)
        .bind(params.text)
        .bind(params.anonymous)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_review(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM general_review_likes WHERE general_review_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM general_reviews WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM general_review_likes WHERE general_review_id = $1",
        )
        .bind(review_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM general_review_likes \
             WHERE general_review_id = $1 AND user_id = $2)",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let removed = sqlx::query(
            "DELETE FROM general_review_likes WHERE general_review_id = $1 AND user_id = $2",
        )
        .bind(review_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query(
                "INSERT INTO general_review_likes (general_review_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT (general_review_id, user_id) DO NOTHING",
            )
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        let likes = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM general_review_likes WHERE general_review_id = $1",
        )
        .bind(review_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(LikeToggle { likes, liked })
    }

    async fn create_report(
        &self,
        params: CreateReportParams,
    ) -> Result<GeneralReviewReportRecord, RepoError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO general_review_reports (general_review_id, reason, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, general_review_id, reason, user_id, created_at
            "#,
        )
        .bind(params.general_review_id)
        .bind(params.reason)
        .bind(params.user_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(GeneralReviewReportRecord {
            id: row.id,
            general_review_id: row.general_review_id,
            reason: row.reason,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}
