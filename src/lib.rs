mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases, password, slug, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, storage, utils, web};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxBlogRepo, SqlxContactRepo, SqlxProjectRepo, SqlxUserRepo};
use storage::local::LocalMediaStorage;
use use_cases::{
    auth::AuthHandler, blog::BlogHandler, contact::ContactHandler,
    dashboard::DashboardHandler, home::HomeHandler, project::ProjectHandler,
};
use web::page::SiteSettings;

pub struct AppState {
    pub site: SiteSettings,
    /// Session cookies get the `Secure` flag in production.
    pub secure_cookies: bool,
    pub auth_handler: AppAuthHandler,
    pub blog_handler: BlogHandler<SqlxBlogRepo, LocalMediaStorage>,
    pub project_handler: ProjectHandler<SqlxProjectRepo, LocalMediaStorage>,
    pub contact_handler: ContactHandler<SqlxContactRepo>,
    pub dashboard_handler: DashboardHandler<SqlxBlogRepo, SqlxProjectRepo, SqlxContactRepo>,
    pub home_handler: HomeHandler<SqlxBlogRepo, SqlxProjectRepo>,
}

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let storage = LocalMediaStorage::new(&config.storage_root);

        let blog_repo = SqlxBlogRepo::new(pool.clone());
        let project_repo = SqlxProjectRepo::new(pool.clone());
        let contact_repo = SqlxContactRepo::new(pool.clone());
        let user_repo = SqlxUserRepo::new(pool);

        AppState {
            site: SiteSettings::from(config),
            secure_cookies: config.is_production(),
            auth_handler: AuthHandler::new(user_repo, jwt_service),
            blog_handler: BlogHandler::new(blog_repo.clone(), storage.clone()),
            project_handler: ProjectHandler::new(project_repo.clone(), storage),
            contact_handler: ContactHandler::new(contact_repo.clone()),
            dashboard_handler: DashboardHandler::new(
                blog_repo.clone(),
                project_repo.clone(),
                contact_repo,
            ),
            home_handler: HomeHandler::new(blog_repo, project_repo),
        }
    }
}
