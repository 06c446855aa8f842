use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// logging preferences, the Razorpay payment gateway credentials,
/// and the image generation backends.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Credentials for the Razorpay payment gateway.
    pub razorpay: RazorpayConfig,
    /// Endpoints and credentials for the image generation backends.
    pub generation: GenerationConfig,
    /// Directory containing the overlay fonts used by the compositor.
    pub fonts_dir: String,
}

#[derive(Clone, Debug)]
/// Credentials for the Razorpay payment gateway.
///
/// The key id is public (it is handed to the checkout widget on the
/// client), the key secret never leaves the server and is the shared
/// secret for payment signature verification.
pub struct RazorpayConfig {
    /// The public Razorpay key id.
    pub key_id: String,
    /// The server-held Razorpay key secret.
    pub key_secret: String,
}

#[derive(Clone, Debug)]
/// Endpoints and credentials for the external image generation backends.
pub struct GenerationConfig {
    /// Base URL of the text-to-image backend.
    pub image_api_url: String,
    /// Chat-completions endpoint of the image enhancement backend.
    pub enhance_api_url: String,
    /// API key for the image enhancement backend.
    pub enhance_api_key: String,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// Reads the JWT configuration from environment variables:
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 24 hours if not provided.
    ///
    /// # Panics
    ///
    /// This function will panic if:
    /// - `JWT_SECRET` environment variable is not set
    /// - `JWT_EXPIRATION_HOURS` is set but cannot be parsed as a valid number
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads all configuration values from environment variables with sensible
    /// defaults for most optional settings.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET`: Payment gateway credentials
    ///   (default: empty, payments disabled until configured)
    /// - `IMAGE_API_URL`: Text-to-image backend (default: "https://image.pollinations.ai")
    /// - `ENHANCE_API_URL` / `ENHANCE_API_KEY`: Image enhancement backend
    /// - `FONTS_DIR`: Overlay font directory (default: "assets/fonts")
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing or if
    /// numeric values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            razorpay: RazorpayConfig {
                key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
                key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            },
            generation: GenerationConfig {
                image_api_url: env::var("IMAGE_API_URL")
                    .unwrap_or_else(|_| "https://image.pollinations.ai".to_string()),
                enhance_api_url: env::var("ENHANCE_API_URL").unwrap_or_else(|_| {
                    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
                }),
                enhance_api_key: env::var("ENHANCE_API_KEY").unwrap_or_default(),
            },
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "assets/fonts".to_string()),
        })
    }
}
