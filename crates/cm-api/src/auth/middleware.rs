use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use super::jwt::verify_jwt_token;
use crate::{error::ApiError, state::AuthConfig};

/// Authenticated user extractor
///
/// Use this in route handlers to ensure the user is authenticated.
/// It validates the bearer JWT from the `Authorization` header.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use cm_api::{error::ApiError, auth::AuthUser, ApiState};
///
/// async fn protected_route(
///     auth_user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     // auth_user.user_id and auth_user.is_teacher are available
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub is_teacher: bool,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_config = AuthConfig::from_ref(state);

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Auth("Not authenticated".to_string()))?;

        let claims = verify_jwt_token(bearer.token(), &auth_config.jwt_secret)?;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Auth("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            is_teacher: claims.is_teacher,
        })
    }
}

/// Authenticated user that must not be a teacher
#[derive(Debug, Clone, Copy)]
pub struct StudentUser(pub AuthUser);

impl<S> FromRequestParts<S> for StudentUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_teacher {
            return Err(ApiError::Forbidden(
                "Only students can perform this action".to_string(),
            ));
        }
        Ok(Self(user))
    }
}

/// Authenticated user with the teacher role
#[derive(Debug, Clone, Copy)]
pub struct TeacherUser(pub AuthUser);

impl<S> FromRequestParts<S> for TeacherUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_teacher {
            return Err(ApiError::Forbidden(
                "Only teachers can perform this action".to_string(),
            ));
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_jwt_token;
    use axum::http::Request;

    const SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
        }
    }

    fn parts_with(header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/progress/me/1");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_auth_user_from_bearer_token() {
        let token = generate_jwt_token(5, false, SECRET, 1).unwrap();
        let mut parts = parts_with(Some(format!("Bearer {token}")));

        let user = AuthUser::from_request_parts(&mut parts, &config())
            .await
            .expect("token should be accepted");
        assert_eq!(
            user,
            AuthUser {
                user_id: 5,
                is_teacher: false
            }
        );
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let mut parts = parts_with(None);
        let result = AuthUser::from_request_parts(&mut parts, &config()).await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[tokio::test]
    async fn test_role_extractors() {
        let teacher_token = generate_jwt_token(1, true, SECRET, 1).unwrap();
        let student_token = generate_jwt_token(2, false, SECRET, 1).unwrap();

        let mut parts = parts_with(Some(format!("Bearer {teacher_token}")));
        assert!(TeacherUser::from_request_parts(&mut parts, &config()).await.is_ok());
        let mut parts = parts_with(Some(format!("Bearer {teacher_token}")));
        assert!(matches!(
            StudentUser::from_request_parts(&mut parts, &config()).await,
            Err(ApiError::Forbidden(_))
        ));

        let mut parts = parts_with(Some(format!("Bearer {student_token}")));
        assert!(StudentUser::from_request_parts(&mut parts, &config()).await.is_ok());
        let mut parts = parts_with(Some(format!("Bearer {student_token}")));
        assert!(matches!(
            TeacherUser::from_request_parts(&mut parts, &config()).await,
            Err(ApiError::Forbidden(_))
        ));
    }
}
