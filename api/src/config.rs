use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Shared secret required to self-register staff accounts (doctors, testers,
    /// authorities). Staff registration is disabled when unset.
    pub staff_registration_secret: Option<String>,
    /// Sustained requests per second allowed on registration, per client IP
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            staff_registration_secret: env::var("STAFF_REGISTRATION_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Check if staff self-registration is enabled
    pub fn staff_registration_enabled(&self) -> bool {
        self.staff_registration_secret.is_some()
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by tests; never touches the environment
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/upstac_test".to_string(),
            port: 0,
            staff_registration_secret: Some("staff-secret".to_string()),
            rate_limit_per_second: 2,
            rate_limit_burst: 5,
        }
    }
}
