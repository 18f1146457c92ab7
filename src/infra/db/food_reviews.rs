use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateFoodReviewParams, FoodReviewsRepo, LikeToggle, RepoError},
    domain::entities::{
        FoodRating, FoodReviewRecord, FoodReviewScope, FoodReviewView, RestaurantFoodReview,
        UserFoodReview,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const VIEW_COLUMNS: &str = r#"
    fr.id, fr.user_id, fr.food_id, fr.rating, fr.text, fr.anonymous, fr.created_at,
    (SELECT COUNT(*) FROM likes l WHERE l.food_review_id = fr.id) AS like_count
"#;

#[derive(sqlx::FromRow)]
struct FoodReviewRow {
    id: i64,
    user_id: Uuid,
    food_id: i64,
    rating: i32,
    text: Option<String>,
    anonymous: bool,
    created_at: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct FoodReviewScopeRow {
    review_id: i64,
    food_id: i64,
    restaurant_id: i64,
}

impl From<FoodReviewScopeRow> for FoodReviewScope {
    fn from(row: FoodReviewScopeRow) -> Self {
        Self {
            review_id: row.review_id,
            food_id: row.food_id,
            restaurant_id: row.restaurant_id,
        }
    }
}

impl From<FoodReviewRow> for FoodReviewRecord {
    fn from(row: FoodReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            food_id: row.food_id,
            rating: row.rating,
            text: row.text,
            anonymous: row.anonymous,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FoodReviewViewRow {
    #[sqlx(flatten)]
    review: FoodReviewRow,
    like_count: i64,
}

impl From<FoodReviewViewRow> for FoodReviewView {
    fn from(row: FoodReviewViewRow) -> Self {
        Self {
            review: row.review.into(),
            like_count: row.like_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RestaurantFoodReviewRow {
    #[sqlx(flatten)]
    view: FoodReviewViewRow,
    food_name: String,
}

#[derive(sqlx::FromRow)]
struct UserFoodReviewRow {
    #[sqlx(flatten)]
    view: FoodReviewViewRow,
    food_name: String,
    food_type: Option<String>,
    restaurant_id: i64,
    restaurant_name: String,
}

#[derive(sqlx::FromRow)]
struct FoodRatingRow {
    food_id: i64,
    rating: i32,
}

#[async_trait]
impl FoodReviewsRepo for PostgresRepositories {
    async fn ratings_for_foods(&self, food_ids: &[i64]) -> Result<Vec<FoodRating>, RepoError> {
        if food_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, FoodRatingRow>(
            "SELECT food_id, rating FROM food_reviews WHERE food_id = ANY($1)",
        )
        .bind(food_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| FoodRating {
                food_id: row.food_id,
                rating: row.rating,
            })
            .collect())
    }

    async fn list_reviews(&self) -> Result<Vec<FoodReviewView>, RepoError> {
        let sql = format!("SELECT {VIEW_COLUMNS} FROM food_reviews fr ORDER BY fr.created_at DESC, fr.id DESC");
        let rows = sqlx::query_as::<_, FoodReviewViewRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FoodReviewView::from).collect())
    }

    async fn list_reviews_by_food(&self, food_id: i64) -> Result<Vec<FoodReviewView>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS} FROM food_reviews fr WHERE fr.food_id = $1 \
             ORDER BY fr.created_at DESC, fr.id DESC"
        );
        let rows = sqlx::query_as::<_, FoodReviewViewRow>(&sql)
            .bind(food_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FoodReviewView::from).collect())
    }

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantFoodReview>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS}, f.name AS food_name \
             FROM food_reviews fr \
             INNER JOIN foods f ON f.id = fr.food_id \
             WHERE f.restaurant_id = $1 \
             ORDER BY fr.created_at DESC, fr.id DESC"
        );
        let rows = sqlx::query_as::<_, RestaurantFoodReviewRow>(&sql)
            .bind(restaurant_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| RestaurantFoodReview {
                review: row.view.into(),
                food_name: row.food_name,
            })
            .collect())
    }

    async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<UserFoodReview>, RepoError> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS}, f.name AS food_name, f.food_type, \
                    r.id AS restaurant_id, r.name AS restaurant_name \
             FROM food_reviews fr \
             INNER JOIN foods f ON f.id = fr.food_id \
             INNER JOIN restaurants r ON r.id = f.restaurant_id \
             WHERE fr.user_id = $1 \
             ORDER BY fr.created_at DESC, fr.id DESC"
        );
        let rows = sqlx::query_as::<_, UserFoodReviewRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| UserFoodReview {
                review: row.view.into(),
                food_name: row.food_name,
                food_type: row.food_type,
                restaurant_id: row.restaurant_id,
                restaurant_name: row.restaurant_name,
            })
            .collect())
    }

    async fn find_review(&self, id: i64) -> Result<Option<FoodReviewView>, RepoError> {
        let sql = format!("SELECT {VIEW_COLUMNS} FROM food_reviews fr WHERE fr.id = $1");
        let row = sqlx::query_as::<_, FoodReviewViewRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FoodReviewView::from))
    }

    async fn create_review(
        &self,
        params: CreateFoodReviewParams,
    ) -> Result<FoodReviewRecord, RepoError> {
        let row = sqlx::query_as::<_, FoodReviewRow>(
            r#"
            INSERT INTO food_reviews (user_id, food_id, rating, text, anonymous)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, food_id, rating, text, anonymous, created_at
            "#,
        )
        .bind(params.user_id)
        .bind(params.food_id)
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

        sqlx::query("DELETE FROM likes WHERE food_review_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM food_reviews WHERE id = $1")
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

    async fn delete_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FoodReviewScope>, RepoError> {
        let rows = sqlx::query_as::<_, FoodReviewScopeRow>(
            r#"
            DELETE FROM food_reviews fr
            USING foods f
            WHERE fr.food_id = f.id AND fr.user_id = $1
            RETURNING fr.id AS review_id, fr.food_id, f.restaurant_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FoodReviewScope::from).collect())
    }

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE food_review_id = $1")
            .bind(review_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE food_review_id = $1 AND user_id = $2)",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let removed = sqlx::query("DELETE FROM likes WHERE food_review_id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query(
                "INSERT INTO likes (food_review_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT (food_review_id, user_id) DO NOTHING",
            )
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        let likes =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE food_review_id = $1")
                .bind(review_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(LikeToggle { likes, liked })
    }
}
