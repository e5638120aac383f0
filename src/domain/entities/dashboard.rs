use serde::Serialize;

use crate::entities::{
    blog::{BlogCounts, RecentBlog},
    contact::{ContactCounts, RecentContact},
    project::{ProjectCounts, RecentProject},
};

pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_blogs: i64,
    pub published_blogs: i64,
    pub draft_blogs: i64,
    pub total_projects: i64,
    pub featured_projects: i64,
    pub total_contacts: i64,
    pub unread_contacts: i64,
}

impl DashboardStats {
    pub fn from_counts(blogs: BlogCounts, projects: ProjectCounts, contacts: ContactCounts) -> Self {
        DashboardStats {
            total_blogs: blogs.total,
            published_blogs: blogs.published,
            draft_blogs: blogs.total - blogs.published,
            total_projects: projects.total,
            featured_projects: projects.featured,
            total_contacts: contacts.total,
            unread_contacts: contacts.unread,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub analytics: DashboardStats,
    pub recent_blogs: Vec<RecentBlog>,
    pub recent_projects: Vec<RecentProject>,
    pub recent_contacts: Vec<RecentContact>,
}
