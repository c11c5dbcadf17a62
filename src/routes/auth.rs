use crate::{
    auth::{LoginData, LoginRequest, LoginUser, TokenIssuer},
    error::AppError,
    models::{ApiResponse, CreateUserInput, UserResponse},
    state::AppState,
    usecases::{Credentials, Registration},
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates an account and returns it without the password hash. No token is issued;
/// the client logs in afterwards.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<CreateUserInput>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let input = payload.into_inner();

    let user = state
        .create_user
        .execute(Registration {
            name: input.name,
            email: input.email,
            password: input.password,
        })
        .await
        .map_err(AppError::into_client_error)?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        UserResponse::from(user),
        "User registered successfully",
    )))
}

/// Login user
///
/// Checks the credentials and returns the user summary with a signed token.
/// Every refusal is answered with 400 and the use-case's message.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let input = payload.into_inner();

    let user = state
        .auth
        .execute(Credentials {
            email: input.email,
            password: input.password,
        })
        .await
        .map_err(AppError::into_client_error)?;

    let token = issuer.generate(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        LoginData {
            user: LoginUser {
                name: user.name,
                email: user.email,
            },
            token,
        },
        "Login successful",
    )))
}
