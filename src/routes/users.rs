use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ApiResponse, CreateUserInput, UpdateUserInput, UserPatch, UserResponse},
    state::AppState,
    usecases::Registration,
};
use actix_web::{get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// Creates another user account on behalf of an authenticated caller.
#[post("")]
pub async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<CreateUserInput>,
    _caller: AuthenticatedUser,
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
        "User created successfully",
    )))
}

/// Returns the caller's own profile.
#[get("")]
pub async fn get_user(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(UserResponse::from(user))))
}

/// Partially updates the caller's own profile.
///
/// Keeping the current email is allowed; taking another live user's email is a 400.
/// A new password is hashed before it is stored.
#[patch("")]
pub async fn update_user(
    state: web::Data<AppState>,
    payload: web::Json<UpdateUserInput>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let input = payload.into_inner();

    state
        .user_validation
        .validate_user_exists(caller.id)
        .await
        .map_err(AppError::into_client_error)?;

    if let Some(email) = &input.email {
        if let Some(owner) = state.users.find_by_email(email).await? {
            if owner.id != caller.id {
                return Err(AppError::BadRequest(
                    "Email is already used by another user".into(),
                ));
            }
        }
    }

    let password = match &input.password {
        Some(plaintext) => Some(state.hasher.hash(plaintext).await?),
        None => None,
    };

    let patch = UserPatch {
        name: input.name,
        email: input.email,
        password,
    };

    let user = state
        .users
        .update(caller.id, patch)
        .await
        .map_err(AppError::into_client_error)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    log::info!("user {} updated their profile", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        UserResponse::from(user),
        "User updated successfully",
    )))
}
