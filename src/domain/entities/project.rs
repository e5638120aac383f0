use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{blog::text_or_empty, upload::ImageUpload},
    errors::{AppError, FieldError},
    validation::{blank_to_none, new_validation_error, normalize_list, parse_flag, validate_tags},
};

const MAX_NAME_LENGTH: usize = 255;
pub const IMAGE_FOLDER: &str = "project-images";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub technologies: Vec<String>,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub technologies: Vec<String>,
    pub is_featured: bool,
    pub sort_order: i32,
}

#[derive(Debug, Default, Clone, Copy, sqlx::FromRow)]
pub struct ProjectCounts {
    pub total: i64,
    pub featured: i64,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProjectInput {
    #[validate(custom(function = "validate_project_name"))]
    pub name: String,

    #[validate(length(min = 1, message = "The project description is required."))]
    pub description: String,

    #[validate(custom(function = "validate_github_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_demo_url"))]
    pub demo_url: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    pub technologies: Vec<String>,

    pub is_featured: bool,

    #[validate(range(min = 0, message = "The sort order must be at least 0."))]
    pub sort_order: i32,
}

fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(new_validation_error("name_required", "The project name is required."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(new_validation_error("name_too_long", "The project name may not be greater than 255 characters."));
    }
    Ok(())
}

fn validate_github_url(url: &str) -> Result<(), ValidationError> {
    crate::validation::validate_http_url(url)
        .map_err(|_| new_validation_error("invalid_url", "The GitHub URL must be a valid URL."))
}

fn validate_demo_url(url: &str) -> Result<(), ValidationError> {
    crate::validation::validate_http_url(url)
        .map_err(|_| new_validation_error("invalid_url", "The demo URL must be a valid URL."))
}

impl ProjectInput {
    pub fn normalized(self) -> Self {
        ProjectInput {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            github_url: blank_to_none(self.github_url),
            demo_url: blank_to_none(self.demo_url),
            technologies: normalize_list(self.technologies),
            is_featured: self.is_featured,
            sort_order: self.sort_order,
        }
    }
}

#[derive(Debug, MultipartForm)]
pub struct ProjectUpload {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub github_url: Option<Text<String>>,
    pub demo_url: Option<Text<String>>,
    pub technologies: Vec<Text<String>>,
    #[multipart(rename = "technologies[]")]
    pub technology_list: Vec<Text<String>>,
    pub is_featured: Option<Text<String>>,
    pub sort_order: Option<Text<String>>,
    #[multipart(limit = "8MB")]
    pub image: Option<TempFile>,
}

/// Parsed project form. `sort_order` failures are kept aside so they can be
/// reported together with the other field errors.
pub struct ProjectParts {
    pub input: ProjectInput,
    pub image: Option<ImageUpload>,
    pub parse_errors: Vec<FieldError>,
}

impl ProjectUpload {
    pub async fn into_parts(self) -> Result<ProjectParts, AppError> {
        let image = ImageUpload::from_temp_file(self.image).await?;
        let mut parse_errors = Vec::new();

        let sort_order = match blank_to_none(self.sort_order.map(Text::into_inner)) {
            None => 0,
            Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
                parse_errors.push(FieldError {
                    field: "sort_order".into(),
                    message: "The sort order must be an integer.".into(),
                });
                0
            }),
        };

        let technologies = self.technologies
            .into_iter()
            .flat_map(|t| t.into_inner().split(',').map(str::to_string).collect::<Vec<_>>())
            .chain(self.technology_list.into_iter().map(Text::into_inner))
            .collect();

        let input = ProjectInput {
            name: text_or_empty(self.name),
            description: text_or_empty(self.description),
            github_url: self.github_url.map(Text::into_inner),
            demo_url: self.demo_url.map(Text::into_inner),
            technologies,
            is_featured: self.is_featured.is_some_and(|v| parse_flag(&v)),
            sort_order,
        };

        Ok(ProjectParts {
            input: input.normalized(),
            image,
            parse_errors,
        })
    }
}

/// Admin list `filter` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedFilter {
    Featured,
    Regular,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub featured: Option<bool>,
}

impl ProjectFilter {
    pub fn featured() -> Self {
        ProjectFilter { search: None, featured: Some(true) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectListQuery {
    #[serde(default, skip_serializing)]
    pub page: Option<String>,
    pub search: Option<String>,
    pub filter: Option<String>,
}

impl ProjectListQuery {
    pub fn filter(&self) -> ProjectFilter {
        let featured = match self.filter.as_deref().map(str::trim) {
            Some("featured") => Some(FeaturedFilter::Featured),
            Some("regular") => Some(FeaturedFilter::Regular),
            _ => None,
        };
        ProjectFilter {
            search: blank_to_none(self.search.clone()),
            featured: featured.map(|f| f == FeaturedFilter::Featured),
        }
    }
}

/// Home page card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectCard {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub technologies: Vec<String>,
}

impl From<Project> for ProjectCard {
    fn from(project: Project) -> Self {
        ProjectCard {
            id: project.id,
            name: project.name,
            description: project.description,
            image: project.image,
            github_url: project.github_url,
            demo_url: project.demo_url,
            technologies: project.technologies,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentProject {
    pub id: Uuid,
    pub name: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for RecentProject {
    fn from(project: Project) -> Self {
        RecentProject {
            id: project.id,
            name: project.name,
            is_featured: project.is_featured,
            created_at: project.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_project(name: &str, sort_order: i32) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: "A project".to_string(),
        image: None,
        github_url: None,
        demo_url: None,
        technologies: vec!["Rust".to_string()],
        is_featured: false,
        sort_order,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProjectInput {
        ProjectInput {
            name: "Portfolio".into(),
            description: "This site".into(),
            ..Default::default()
        }
    }

    #[test]
    fn urls_must_be_well_formed() {
        let mut bad = input();
        bad.github_url = Some("github.com/me".into());
        bad.demo_url = Some("javascript:alert(1)".into());

        let errors = crate::errors::AppError::from(bad.validate().unwrap_err()).field_messages();
        assert_eq!(errors["github_url"], "The GitHub URL must be a valid URL.");
        assert_eq!(errors["demo_url"], "The demo URL must be a valid URL.");
    }

    #[test]
    fn negative_sort_order_is_rejected() {
        let mut bad = input();
        bad.sort_order = -1;
        assert!(bad.validate().unwrap_err().field_errors().contains_key("sort_order"));
    }

    #[test]
    fn long_technology_is_rejected() {
        let mut bad = input();
        bad.technologies = vec!["x".repeat(51)];
        assert!(bad.validate().is_err());
    }

    #[test]
    fn list_filter_maps_featured_and_regular() {
        let query = ProjectListQuery { page: None, search: None, filter: Some("regular".into()) };
        assert_eq!(query.filter().featured, Some(false));
        let query = ProjectListQuery { page: None, search: Some("api".into()), filter: Some("bogus".into()) };
        assert_eq!(query.filter(), ProjectFilter { search: Some("api".into()), featured: None });
    }
}
