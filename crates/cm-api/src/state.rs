use axum::extract::FromRef;
use sqlx::PgPool;

use crate::ApiConfig;

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: PgPool,
    pub jwt_secret: String,
    /// Extra attempts granted to a unit of work that failed with a uniqueness conflict
    pub conflict_retries: u32,
}

/// Subset of the state needed to authenticate a request
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            conflict_retries: config.conflict_retries,
        }
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}
