//! Authentication route handlers.
//!
//! Handles registration, login and logout with locally stored accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::middleware::{
    PageContext, clear_cart, clear_current_user, push_notice, set_current_user,
};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub email: String,
    pub errors: FieldErrors,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: PageContext) -> LoginTemplate {
    LoginTemplate {
        ctx,
        email: String::new(),
        errors: FieldErrors::default(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = match form.validate() {
        Ok(email) => email,
        Err(errors) => return render_login(&state, &session, form.email, errors).await,
    };

    match AuthService::new(state.pool()).login(&email, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            push_notice(&session, "Login successful!").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed");
            push_notice(&session, "Invalid email address or password.").await?;
            render_login(&state, &session, form.email, FieldErrors::default()).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn render_login(
    state: &AppState,
    session: &Session,
    email: String,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    Ok(LoginTemplate {
        ctx: PageContext::load(state, session).await?,
        email,
        errors,
    }
    .into_response())
}

/// Log out: forget the user and empty the cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_cart(&session).await?;
    clear_sentry_user();
    push_notice(&session, "Logout successful.").await?;
    Ok(Redirect::to("/"))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(ctx: PageContext) -> RegisterTemplate {
    RegisterTemplate {
        ctx,
        username: String::new(),
        email: String::new(),
        errors: FieldErrors::default(),
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => return render_register(&state, &session, form, errors).await,
    };

    match AuthService::new(state.pool())
        .register(
            &registration.username,
            &registration.email,
            &registration.password,
        )
        .await
    {
        Ok(_) => {
            push_notice(&session, "Registration successful!").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::DuplicateRegistration {
            username_taken,
            email_taken,
        }) => {
            let mut errors = FieldErrors::default();
            if username_taken {
                errors.add(
                    "username",
                    "That username is taken. Please choose a different one.",
                );
            }
            if email_taken {
                errors.add(
                    "email",
                    "That email is already registered. Please choose a different one.",
                );
            }
            render_register(&state, &session, form, errors).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn render_register(
    state: &AppState,
    session: &Session,
    form: RegisterForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    Ok(RegisterTemplate {
        ctx: PageContext::load(state, session).await?,
        username: form.username,
        email: form.email,
        errors,
    }
    .into_response())
}
