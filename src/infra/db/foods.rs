use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{FoodsRepo, RepoError},
    domain::entities::FoodRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    price: Option<f64>,
    food_type: Option<String>,
    image_url: Option<String>,
    created_at: OffsetDateTime,
}

impl From<FoodRow> for FoodRecord {
    fn from(row: FoodRow) -> Self {
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            price: row.price,
            food_type: row.food_type,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FoodsRepo for PostgresRepositories {
    async fn list_foods(&self) -> Result<Vec<FoodRecord>, RepoError> {
        let rows = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, restaurant_id, name, description, price, food_type, image_url, created_at
            FROM foods
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FoodRecord::from).collect())
    }

    async fn list_foods_by_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<FoodRecord>, RepoError> {
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, restaurant_id, name, description, price, food_type, image_url, created_at
            FROM foods
            WHERE restaurant_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(restaurant_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FoodRecord::from).collect())
    }

    async fn find_food(&self, id: i64) -> Result<Option<FoodRecord>, RepoError> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, restaurant_id, name, description, price, food_type, image_url, created_at
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(FoodRecord::from))
    }
}
