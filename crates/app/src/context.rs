//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PasswordHasher, PgAuthService, SessionKeys},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        foods::{FoodsService, PgFoodsService},
        payments::{PaymentsService, PgPaymentsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Settings needed to build an [`AppContext`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub password_hasher: PasswordHasher,
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub foods: Arc<dyn FoodsService>,
    pub carts: Arc<dyn CartsService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_settings(
        settings: AppSettings,
        keys: SessionKeys,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool);
        let hasher = settings.password_hasher;

        Ok(Self {
            users: Arc::new(PgUsersService::new(db.clone(), hasher)),
            auth: Arc::new(PgAuthService::new(&db, hasher, keys)),
            foods: Arc::new(PgFoodsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            payments: Arc::new(PgPaymentsService::new(db)),
        })
    }
}
