use std::{process, sync::Arc};

use polybites::{
    application::{
        error::AppError,
        food_reviews::FoodReviewService,
        foods::FoodService,
        general_reviews::GeneralReviewService,
        messages::MessageService,
        profiles::ProfileService,
        repos::{
            FoodReviewsRepo, FoodsRepo, GeneralReviewsRepo, HealthProbe, MessagesRepo,
            ProfilesRepo, RestaurantsRepo,
        },
        restaurants::RestaurantService,
    },
    cache::{CacheConfig, CacheInvalidator, CacheState, ResponseCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        identity::identity_provider,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

mod migrations_tool;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => migrations_tool::apply(&settings.database).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let api_state = build_api_state(repositories, &settings);

    let router = http::build_router(api_state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "polybites::serve",
        addr = %settings.server.addr,
        cache_enabled = settings.cache.enabled,
        "PolyBites backend listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_api_state(repositories: Arc<PostgresRepositories>, settings: &config::Settings) -> ApiState {
    let restaurants_repo: Arc<dyn RestaurantsRepo> = repositories.clone();
    let foods_repo: Arc<dyn FoodsRepo> = repositories.clone();
    let food_reviews_repo: Arc<dyn FoodReviewsRepo> = repositories.clone();
    let general_reviews_repo: Arc<dyn GeneralReviewsRepo> = repositories.clone();
    let profiles_repo: Arc<dyn ProfilesRepo> = repositories.clone();
    let messages_repo: Arc<dyn MessagesRepo> = repositories.clone();
    let health: Arc<dyn HealthProbe> = repositories;

    let cache_config = CacheConfig::from(&settings.cache);
    let response_cache = Arc::new(ResponseCache::new());
    let cache_invalidator = cache_config.is_enabled().then(|| {
        Arc::new(CacheInvalidator::new(
            cache_config.clone(),
            response_cache.clone(),
        ))
    });
    let cache_state = CacheState {
        config: cache_config,
        cache: response_cache,
    };

    let restaurants = Arc::new(RestaurantService::new(
        restaurants_repo.clone(),
        foods_repo.clone(),
        food_reviews_repo.clone(),
        general_reviews_repo.clone(),
    ));
    let foods = Arc::new(FoodService::new(foods_repo.clone(), food_reviews_repo.clone()));
    let food_reviews = Arc::new(
        FoodReviewService::new(
            restaurants_repo.clone(),
            foods_repo,
            food_reviews_repo.clone(),
        )
        .with_cache_invalidator_opt(cache_invalidator.clone()),
    );
    let general_reviews = Arc::new(
        GeneralReviewService::new(restaurants_repo, general_reviews_repo)
            .with_cache_invalidator_opt(cache_invalidator.clone()),
    );
    let profiles = Arc::new(
        ProfileService::new(
            profiles_repo,
            food_reviews_repo,
            identity_provider(&settings.identity),
        )
        .with_cache_invalidator_opt(cache_invalidator),
    );
    let messages = Arc::new(MessageService::new(messages_repo));

    ApiState {
        restaurants,
        foods,
        food_reviews,
        general_reviews,
        profiles,
        messages,
        cache: cache_state,
        health,
    }
}
