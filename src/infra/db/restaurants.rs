use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::PageParams,
    application::repos::{RepoError, RestaurantsRepo},
    domain::entities::{RestaurantRecord, RestaurantReviewRecord, RestaurantSummary},
};

use super::{PostgresRepositories, map_sqlx_error};

const SUMMARY_SELECT: &str = r#"
    SELECT r.id, r.name, r.description, r.location, r.image_url, r.created_at,
           COUNT(f.id) AS menu_item_count
    FROM restaurants r
    LEFT JOIN foods f ON f.restaurant_id = r.id
"#;

#[derive(sqlx::FromRow)]
struct RestaurantSummaryRow {
    id: i64,
    name: String,
    description: Option<String>,
    location: Option<String>,
    image_url: Option<String>,
    created_at: OffsetDateTime,
    menu_item_count: i64,
}

impl From<RestaurantSummaryRow> for RestaurantSummary {
    fn from(row: RestaurantSummaryRow) -> Self {
        Self {
            restaurant: RestaurantRecord {
                id: row.id,
                name: row.name,
                description: row.description,
                location: row.location,
                image_url: row.image_url,
                created_at: row.created_at,
            },
            menu_item_count: row.menu_item_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RestaurantReviewRow {
    id: i64,
    restaurant_id: i64,
    user_id: Option<Uuid>,
    rating: i32,
    comment: Option<String>,
    created_at: OffsetDateTime,
}

impl From<RestaurantReviewRow> for RestaurantReviewRecord {
    fn from(row: RestaurantReviewRow) -> Self {
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RestaurantsRepo for PostgresRepositories {
    async fn count_restaurants(&self) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_restaurants(
        &self,
        page: PageParams,
    ) -> Result<Vec<RestaurantSummary>, RepoError> {
        let sql = format!("{SUMMARY_SELECT} GROUP BY r.id ORDER BY r.id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, RestaurantSummaryRow>(&sql)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RestaurantSummary::from).collect())
    }

    async fn list_all_restaurants(&self) -> Result<Vec<RestaurantSummary>, RepoError> {
        let sql = format!("{SUMMARY_SELECT} GROUP BY r.id ORDER BY r.id");
        let rows = sqlx::query_as::<_, RestaurantSummaryRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RestaurantSummary::from).collect())
    }

    async fn search_restaurants(&self, needle: &str) -> Result<Vec<RestaurantSummary>, RepoError> {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE r.name ILIKE $1 OR r.description ILIKE $1 \
             GROUP BY r.id ORDER BY r.name"
        );
        let rows = sqlx::query_as::<_, RestaurantSummaryRow>(&sql)
            .bind(format!("%{}%", escape_like(needle)))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RestaurantSummary::from).collect())
    }

    async fn find_restaurant(&self, id: i64) -> Result<Option<RestaurantSummary>, RepoError> {
        let sql = format!("{SUMMARY_SELECT} WHERE r.id = $1 GROUP BY r.id");
        let row = sqlx::query_as::<_, RestaurantSummaryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(RestaurantSummary::from))
    }

    async fn list_restaurant_reviews(&self) -> Result<Vec<RestaurantReviewRecord>, RepoError> {
        let rows = sqlx::query_as::<_, RestaurantReviewRow>(
            r#"
            SELECT id, restaurant_id, user_id, rating, comment, created_at
            FROM restaurant_reviews
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RestaurantReviewRecord::from).collect())
    }
}

/// Escape `ILIKE` wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("taco"), "taco");
    }
}
