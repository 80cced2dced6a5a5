mod errors;
mod health;
mod rate_limit;
mod uploads;
