use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref DATABASE_URL: Secret<String> = get_db_url();
    pub static ref APP_ADDRESS: String = format!(
        "0.0.0.0:{}",
        load_or_default(env::APP_PORT_ENV_VAR, prod::APP_PORT)
    );
    pub static ref ADMIN_TOKEN: Secret<String> =
        set_token(env::ADMIN_TOKEN_ENV_VAR, DEFAULT_ADMIN_TOKEN);
    pub static ref USER_TOKEN: Secret<String> =
        set_token(env::USER_TOKEN_ENV_VAR, DEFAULT_USER_TOKEN);
}

fn load_env() {
    dotenv().ok();
}

fn set_token(variable_name: &str, default_value: &str) -> Secret<String> {
    Secret::new(load_or_default(variable_name, default_value))
}

// DATABASE_URL wins; otherwise the URL is assembled from the DB_* parts.
fn get_db_url() -> Secret<String> {
    load_env();
    if let Ok(db_url) = std_env::var(env::DATABASE_URL_ENV_VAR) {
        if !db_url.is_empty() {
            return Secret::new(db_url);
        }
    }

    Secret::new(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        load_or_default(env::DB_USER_ENV_VAR, db::USER),
        load_or_default(env::DB_PASSWORD_ENV_VAR, db::PASSWORD),
        load_or_default(env::DB_HOST_ENV_VAR, db::HOST),
        load_or_default(env::DB_PORT_ENV_VAR, db::PORT),
        load_or_default(env::DB_NAME_ENV_VAR, db::NAME),
        load_or_default(env::DB_SSLMODE_ENV_VAR, db::SSLMODE),
    ))
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const DB_HOST_ENV_VAR: &str = "DB_HOST";
    pub const DB_PORT_ENV_VAR: &str = "DB_PORT";
    pub const DB_USER_ENV_VAR: &str = "DB_USER";
    pub const DB_PASSWORD_ENV_VAR: &str = "DB_PASSWORD";
    pub const DB_NAME_ENV_VAR: &str = "DB_NAME";
    pub const DB_SSLMODE_ENV_VAR: &str = "DB_SSLMODE";
    pub const APP_PORT_ENV_VAR: &str = "APP_PORT";
    pub const ADMIN_TOKEN_ENV_VAR: &str = "ADMIN_TOKEN";
    pub const USER_TOKEN_ENV_VAR: &str = "USER_TOKEN";
}

pub const DEFAULT_ADMIN_TOKEN: &str = "admin-secret";
pub const DEFAULT_USER_TOKEN: &str = "user-secret";

pub mod db {
    pub const HOST: &str = "postgres";
    pub const PORT: &str = "5432";
    pub const USER: &str = "postgres";
    pub const PASSWORD: &str = "postgres";
    pub const NAME: &str = "pr_service";
    pub const SSLMODE: &str = "disable";
}

pub mod prod {
    pub const APP_PORT: &str = "8080";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const ADMIN_TOKEN: &str = "test-admin-token";
    pub const USER_TOKEN: &str = "test-user-token";
}
