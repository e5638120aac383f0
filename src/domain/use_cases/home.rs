use chrono::Utc;
use futures_util::try_join;

use crate::{
    entities::{
        blog::{BlogCard, BlogFilter},
        pagination::PageRequest,
        project::{ProjectCard, ProjectFilter},
    },
    errors::AppError,
    repositories::{blog::BlogRepository, project::ProjectRepository},
};

const LATEST_BLOGS: u32 = 3;
const FEATURED_PROJECTS: u32 = 6;

pub struct HomeHandler<B, P>
where
    B: BlogRepository,
    P: ProjectRepository,
{
    pub blog_repo: B,
    pub project_repo: P,
}

impl<B, P> HomeHandler<B, P>
where
    B: BlogRepository,
    P: ProjectRepository,
{
    pub fn new(blog_repo: B, project_repo: P) -> Self {
        HomeHandler { blog_repo, project_repo }
    }

    /// Latest public posts and featured projects in display order
    pub async fn landing(&self) -> Result<(Vec<BlogCard>, Vec<ProjectCard>), AppError> {
        let public = BlogFilter::public(Utc::now());
        let featured = ProjectFilter::featured();

        let ((blogs, _), (projects, _)) = try_join!(
            self.blog_repo.list_blogs(&public, PageRequest::first(LATEST_BLOGS)),
            self.project_repo.list_projects(&featured, PageRequest::first(FEATURED_PROJECTS)),
        )?;

        Ok((
            blogs.into_iter().map(BlogCard::from).collect(),
            projects.into_iter().map(ProjectCard::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{blog::sample_blog, project::sample_project},
        repositories::{blog::MockBlogRepository, project::MockProjectRepository},
    };

    #[actix_rt::test]
    async fn landing_asks_for_public_posts_and_featured_projects() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_list_blogs()
            .withf(|filter, page| filter.public_at.is_some() && page.per_page == 3)
            .returning(|_, _| Ok((vec![sample_blog("Latest", "latest")], 1)));

        let mut projects = MockProjectRepository::new();
        projects.expect_list_projects()
            .withf(|filter, page| filter.featured == Some(true) && page.per_page == 6)
            .returning(|_, _| Ok((vec![sample_project("Shown", 1)], 1)));

        let (latest, featured) = HomeHandler::new(blogs, projects).landing().await.unwrap();
        assert_eq!(latest[0].slug, "latest");
        assert_eq!(featured[0].name, "Shown");
    }
}
