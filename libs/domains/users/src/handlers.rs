use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    JwtAuth, JwtClaims, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, me),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, CurrentUserResponse, UserResponse),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user")
    )
)]
pub struct ApiDoc;

/// State shared by the auth handlers
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt: JwtAuth,
    /// Adds `Secure` to the `access_token` cookie
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt: self.jwt.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

impl<R: UserRepository> AuthState<R> {
    pub fn new(service: UserService<R>, jwt: JwtAuth) -> Self {
        Self {
            service,
            jwt,
            secure_cookies: false,
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

/// Create the auth router: `POST /register`, `POST /login`, `GET /me`
pub fn router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    let protected = Router::new()
        .route("/me", get(me::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/register", post(register::<R>))
        .route("/login", post(login::<R>))
        .merge(protected)
        .with_state(state)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Response> {
    let user = state.service.register(input).await?;
    token_response(&state, StatusCode::CREATED, "User registered successfully", user)
}

/// Log in with e-mail and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Response> {
    let user = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    token_response(&state, StatusCode::OK, "Login successful", user)
}

/// Current user from the token
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<CurrentUserResponse>> {
    let id = Uuid::parse_str(&claims.sub).map_err(|_| UserError::InvalidToken(claims.sub.clone()))?;
    let user = state.service.get_user(id).await?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user,
    }))
}

/// Issue a token and return it in the body and as the `access_token` cookie.
fn token_response<R: UserRepository>(
    state: &AuthState<R>,
    status: StatusCode,
    message: &str,
    user: UserResponse,
) -> UserResult<Response> {
    let token = state
        .jwt
        .create_token(&user.id.to_string(), &user.email, &user.name)
        .map_err(|e| UserError::Token(e.to_string()))?;

    let secure_flag = if state.secure_cookies { " Secure;" } else { "" };
    let cookie = format!(
        "access_token={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        token,
        secure_flag,
        state.jwt.ttl_secs()
    );
    let cookie_header =
        HeaderValue::from_str(&cookie).map_err(|e| UserError::Token(e.to_string()))?;

    let body = AuthResponse {
        success: true,
        message: message.to_string(),
        token,
        user,
    };

    Ok((
        status,
        AppendHeaders([(header::SET_COOKIE, cookie_header)]),
        Json(body),
    )
        .into_response())
}
