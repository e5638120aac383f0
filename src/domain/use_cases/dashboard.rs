use futures_util::try_join;

use crate::{
    entities::{
        blog::{BlogFilter, RecentBlog},
        contact::RecentContact,
        dashboard::{DashboardData, DashboardStats, RECENT_LIMIT},
        pagination::PageRequest,
        project::RecentProject,
    },
    errors::AppError,
    repositories::{blog::BlogRepository, contact::ContactRepository, project::ProjectRepository},
};

/// Read-only aggregation behind the admin landing page.
pub struct DashboardHandler<B, P, C>
where
    B: BlogRepository,
    P: ProjectRepository,
    C: ContactRepository,
{
    pub blog_repo: B,
    pub project_repo: P,
    pub contact_repo: C,
}

impl<B, P, C> DashboardHandler<B, P, C>
where
    B: BlogRepository,
    P: ProjectRepository,
    C: ContactRepository,
{
    pub fn new(blog_repo: B, project_repo: P, contact_repo: C) -> Self {
        DashboardHandler { blog_repo, project_repo, contact_repo }
    }

    pub async fn overview(&self) -> Result<DashboardData, AppError> {
        let recent = PageRequest::first(RECENT_LIMIT);
        let no_filter = BlogFilter::default();

        let (blog_counts, project_counts, contact_counts, (blogs, _), projects, (contacts, _)) = try_join!(
            self.blog_repo.count_blogs(),
            self.project_repo.count_projects(),
            self.contact_repo.count_contacts(),
            self.blog_repo.list_blogs(&no_filter, recent),
            self.project_repo.recent_projects(RECENT_LIMIT),
            self.contact_repo.list_contacts(recent),
        )?;

        Ok(DashboardData {
            analytics: DashboardStats::from_counts(blog_counts, project_counts, contact_counts),
            recent_blogs: blogs.into_iter().map(RecentBlog::from).collect(),
            recent_projects: projects.into_iter().map(RecentProject::from).collect(),
            recent_contacts: contacts.into_iter().map(RecentContact::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{
            blog::{sample_blog, BlogCounts},
            contact::{sample_contact, ContactCounts},
            project::{sample_project, ProjectCounts},
        },
        repositories::{
            blog::MockBlogRepository, contact::MockContactRepository, project::MockProjectRepository,
        },
    };

    #[actix_rt::test]
    async fn overview_combines_counts_and_recent_items() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_count_blogs().returning(|| Ok(BlogCounts { total: 7, published: 4 }));
        blogs.expect_list_blogs()
            .withf(|filter, page| *filter == BlogFilter::default() && page.per_page == 5)
            .returning(|_, _| Ok((vec![sample_blog("One", "one"), sample_blog("Two", "two")], 7)));

        let mut projects = MockProjectRepository::new();
        projects.expect_count_projects().returning(|| Ok(ProjectCounts { total: 3, featured: 1 }));
        projects.expect_recent_projects()
            .withf(|limit| *limit == 5)
            .returning(|_| Ok(vec![sample_project("Site", 0)]));

        let mut contacts = MockContactRepository::new();
        contacts.expect_count_contacts().returning(|| Ok(ContactCounts { total: 2, unread: 1 }));
        contacts.expect_list_contacts()
            .returning(|_| Ok((vec![sample_contact(false), sample_contact(true)], 2)));

        let data = DashboardHandler::new(blogs, projects, contacts).overview().await.unwrap();

        assert_eq!(data.analytics.total_blogs, 7);
        assert_eq!(data.analytics.published_blogs, 4);
        assert_eq!(data.analytics.draft_blogs, 3);
        assert_eq!(data.analytics.featured_projects, 1);
        assert_eq!(data.analytics.unread_contacts, 1);
        assert_eq!(data.recent_blogs.len(), 2);
        assert_eq!(data.recent_projects[0].name, "Site");
        assert_eq!(data.recent_contacts.len(), 2);
    }

    #[actix_rt::test]
    async fn repository_failure_is_propagated() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_count_blogs()
            .returning(|| Err(AppError::InternalError("db down".into())));
        blogs.expect_list_blogs().returning(|_, _| Ok((Vec::new(), 0)));

        let mut projects = MockProjectRepository::new();
        projects.expect_count_projects().returning(|| Ok(ProjectCounts::default()));
        projects.expect_recent_projects().returning(|_| Ok(Vec::new()));

        let mut contacts = MockContactRepository::new();
        contacts.expect_count_contacts().returning(|| Ok(ContactCounts::default()));
        contacts.expect_list_contacts().returning(|_| Ok((Vec::new(), 0)));

        let result = DashboardHandler::new(blogs, projects, contacts).overview().await;
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}
