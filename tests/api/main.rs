mod auth;
mod health;
mod postgres;
mod stats;
mod teams;
mod users;
