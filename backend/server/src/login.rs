use records::{
    codec::Grid,
    locate::{ColumnMap, resolve_columns},
};
use sheets::SheetStore;
use tracing::{info, warn};

use crate::{
    auth::issue_token,
    error::AppError,
    models::{LoginRequest, UserInfo},
    state::AppState,
    utils::required,
};

pub const LOGIN_EMAIL: &str = "email";
pub const LOGIN_PASSWORD: &str = "senha";
pub const LOGIN_NAME: &str = "nome";

/// First row of the login tab with the same email (ignoring case) and the
/// exact password.
fn find_user(
    grid: &Grid,
    columns: &ColumnMap,
    email: &str,
    password: &str,
) -> Result<Option<UserInfo>, AppError> {
    let email_column = columns.require(LOGIN_EMAIL)?;
    let password_column = columns.require(LOGIN_PASSWORD)?;
    let name_column = columns.require(LOGIN_NAME)?;

    let email = email.to_lowercase();

    Ok(grid.data_rows().iter().find_map(|row| {
        let cell = |column: usize| row.get(column).map(String::as_str).unwrap_or_default();

        (cell(email_column).trim().to_lowercase() == email && cell(password_column) == password)
            .then(|| UserInfo {
                nome: cell(name_column).trim().to_string(),
                email: cell(email_column).trim().to_string(),
            })
    }))
}

pub async fn login<S: SheetStore>(
    state: &AppState<S>,
    request: &LoginRequest,
) -> Result<(String, UserInfo), AppError> {
    let email = required(request.email.as_deref()).ok_or(AppError::MissingField("email"))?;
    let password = request
        .senha
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or(AppError::MissingField("senha"))?;

    let grid = state.store.read_grid(&state.login_range()).await?;
    let columns = resolve_columns(grid.headers(), &[LOGIN_EMAIL, LOGIN_PASSWORD, LOGIN_NAME])?;

    let Some(user) = find_user(&grid, &columns, email, password)? else {
        warn!("Failed login for {email}");
        return Err(AppError::InvalidCredentials);
    };

    let token = issue_token(
        &state.config.jwt_secret,
        &user.nome,
        &user.email,
        state.config.token_ttl_hours,
    )?;
    info!("User '{}' logged in", user.nome);

    Ok((token, user))
}
