//! Creates the admin account and, on an empty database, some sample content.
//!
//! `ADMIN_EMAIL` and `ADMIN_PASSWORD` are read from the environment (or `.env`).

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use portfolio_site::{
    auth::password::hash_password,
    db::postgres::{create_pool, run_migrations},
    entities::{blog::BlogRecord, project::ProjectRecord, user::UserInsert},
    repositories::{
        blog::BlogRepository,
        project::ProjectRepository,
        sqlx_repo::{SqlxBlogRepo, SqlxProjectRepo, SqlxUserRepo},
        user::UserRepository,
    },
    settings::AppConfig,
    slug::derive_slug,
    utils::html::sanitize_html,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::new().context("loading configuration")?;
    let pool = create_pool(&config.database_url).await.context("connecting to database")?;
    run_migrations(&pool).await.context("running migrations")?;

    seed_admin(&SqlxUserRepo::new(pool.clone())).await?;
    seed_blogs(&SqlxBlogRepo::new(pool.clone())).await?;
    seed_projects(&SqlxProjectRepo::new(pool)).await?;

    tracing::info!("Seeding finished");
    Ok(())
}

async fn seed_admin(users: &SqlxUserRepo) -> anyhow::Result<()> {
    let email = std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if password.len() < 8 {
        bail!("ADMIN_PASSWORD must be at least 8 characters");
    }

    let admin = UserInsert {
        name: "Admin".to_string(),
        email: email.trim().to_lowercase(),
        password_hash: hash_password(&password)?,
        is_admin: true,
    };

    let user = users.upsert_user(&admin).await?;
    tracing::info!(email = %user.email, "Admin user ready");
    Ok(())
}

async fn seed_blogs(blogs: &SqlxBlogRepo) -> anyhow::Result<()> {
    if blogs.count_blogs().await?.total > 0 {
        tracing::info!("Blogs already present, skipping samples");
        return Ok(());
    }

    let now = Utc::now();
    let samples = [
        ("Building a Portfolio with Rust", "Notes on the stack behind this site.", vec!["rust", "actix-web"], Some(now - Duration::days(30))),
        ("Designing Small Databases", "Keeping the schema boring on purpose.", vec!["postgres", "sql"], Some(now - Duration::days(14))),
        ("Shipping Side Projects", "Finishing is a skill of its own.", vec!["career"], Some(now - Duration::days(3))),
        ("Upcoming: Notes on Testing", "A draft that is not public yet.", vec!["testing"], None),
    ];

    for (title, excerpt, tags, published_at) in samples {
        let record = BlogRecord {
            title: title.to_string(),
            slug: derive_slug(title),
            content: sanitize_html(&format!("<p>{}</p><p>More to come.</p>", excerpt)),
            excerpt: Some(excerpt.to_string()),
            tags: tags.into_iter().map(str::to_string).collect(),
            featured_image: None,
            is_published: published_at.is_some(),
            published_at,
        };
        blogs.create_blog(&record).await?;
    }

    tracing::info!("Inserted sample blog posts");
    Ok(())
}

async fn seed_projects(projects: &SqlxProjectRepo) -> anyhow::Result<()> {
    if projects.count_projects().await?.total > 0 {
        tracing::info!("Projects already present, skipping samples");
        return Ok(());
    }

    let samples = [
        ("Portfolio Site", "This site: public pages and an admin back office.", vec!["Rust", "PostgreSQL"], true, 0),
        ("Link Checker", "Crawls a site and reports broken links.", vec!["Rust", "Tokio"], true, 1),
        ("Recipe Box", "A small app for keeping family recipes.", vec!["TypeScript", "React"], false, 2),
    ];

    for (name, description, technologies, is_featured, sort_order) in samples {
        let record = ProjectRecord {
            name: name.to_string(),
            description: description.to_string(),
            image: None,
            github_url: None,
            demo_url: None,
            technologies: technologies.into_iter().map(str::to_string).collect(),
            is_featured,
            sort_order,
        };
        projects.create_project(&record).await?;
    }

    tracing::info!("Inserted sample projects");
    Ok(())
}
