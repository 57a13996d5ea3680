//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/crypto/mail/media traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use snapvote_core::service::account::{AccountService, AccountSettings};
use snapvote_core::service::image::ImageService;
use snapvote_core::service::social::SocialService;
use snapvote_infra::config::{load_config, resolve_data_dir};
use snapvote_infra::crypto::hash::Sha256ContentHasher;
use snapvote_infra::crypto::password::Argon2PasswordHasher;
use snapvote_infra::crypto::random::OsRandomSource;
use snapvote_infra::crypto::token::HmacTokenSigner;
use snapvote_infra::mail::ConfiguredMailer;
use snapvote_infra::media::PngImageProcessor;
use snapvote_infra::sqlite::comment::SqliteCommentRepository;
use snapvote_infra::sqlite::follower::SqliteFollowerRepository;
use snapvote_infra::sqlite::image::SqliteImageRepository;
use snapvote_infra::sqlite::pool::{DatabasePool, database_url};
use snapvote_infra::sqlite::session::SqliteSessionRepository;
use snapvote_infra::sqlite::user::SqliteUserRepository;
use snapvote_infra::sqlite::vote::SqliteVoteRepository;
use snapvote_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService = AccountService<
    SqliteUserRepository,
    SqliteSessionRepository,
    Argon2PasswordHasher,
    Sha256ContentHasher,
    HmacTokenSigner,
    ConfiguredMailer,
    OsRandomSource,
>;

pub type ConcreteImageService =
    ImageService<SqliteImageRepository, SqliteVoteRepository, PngImageProcessor, OsRandomSource>;

pub type ConcreteSocialService = SocialService<
    SqliteUserRepository,
    SqliteImageRepository,
    SqliteFollowerRepository,
    SqliteCommentRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<ConcreteAccountService>,
    pub image_service: Arc<ConcreteImageService>,
    pub social_service: Arc<ConcreteSocialService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let signer = HmacTokenSigner::from_environment(&data_dir).await?;
        let mailer = ConfiguredMailer::from_config(config.smtp.as_ref());

        let account_service = AccountService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Sha256ContentHasher::new(),
            signer,
            mailer,
            OsRandomSource::new(),
            AccountSettings::from(&config),
        );

        let image_service = ImageService::new(
            SqliteImageRepository::new(db_pool.clone()),
            SqliteVoteRepository::new(db_pool.clone()),
            PngImageProcessor::new(),
            OsRandomSource::new(),
        );

        let social_service = SocialService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteImageRepository::new(db_pool.clone()),
            SqliteFollowerRepository::new(db_pool.clone()),
            SqliteCommentRepository::new(db_pool.clone()),
        );

        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            account_service: Arc::new(account_service),
            image_service: Arc::new(image_service),
            social_service: Arc::new(social_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
