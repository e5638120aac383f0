use tracing::{info, warn};
use validator::Validate;

use crate::{
    entities::{
        pagination::{PageQuery, PageRequest, Paginated, ADMIN_PER_PAGE, PUBLIC_PER_PAGE},
        project::{Project, ProjectFilter, ProjectInput, ProjectListQuery, ProjectParts, ProjectRecord, IMAGE_FOLDER},
        upload::ImageUpload,
    },
    errors::{field_errors, AppError, FieldError},
    repositories::project::ProjectRepository,
    storage::MediaStorage,
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler<R, S>
where
    R: ProjectRepository,
    S: MediaStorage,
{
    pub project_repo: R,
    pub storage: S,
}

impl<R, S> ProjectHandler<R, S>
where
    R: ProjectRepository,
    S: MediaStorage,
{
    pub fn new(project_repo: R, storage: S) -> Self {
        ProjectHandler { project_repo, storage }
    }

    pub async fn list_public_projects(&self, query: &PageQuery) -> Result<Paginated<Project>, AppError> {
        let page = PageRequest::new(query.page(), PUBLIC_PER_PAGE);
        let (projects, total) = self.project_repo
            .list_projects(&ProjectFilter::default(), page)
            .await?;

        Ok(Paginated::new(projects, total, page))
    }

    pub async fn list_admin_projects(&self, query: &ProjectListQuery) -> Result<Paginated<Project>, AppError> {
        let page_query = PageQuery { page: query.page.clone() };
        let page = PageRequest::new(page_query.page(), ADMIN_PER_PAGE);
        let (projects, total) = self.project_repo.list_projects(&query.filter(), page).await?;

        Ok(Paginated::new(projects, total, page))
    }

    /// Retrieves a project by its ID
    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&valid_id).await.map_err(not_found)
    }

    pub async fn create_project(&self, parts: ProjectParts) -> Result<Project, AppError> {
        let ProjectParts { input, image, parse_errors } = parts;
        let extension = check_input(&input, image.as_ref(), parse_errors)?;
        let stored = self.store_image(image, extension).await?;

        let record = to_record(&input, stored.clone());
        match self.project_repo.create_project(&record).await {
            Ok(project) => {
                info!(id = %project.id, name = %project.name, "Project created");
                Ok(project)
            }
            Err(e) => {
                if let Some(path) = &stored {
                    self.discard_image(path).await;
                }
                Err(e)
            }
        }
    }

    pub async fn update_project(&self, id: &str, parts: ProjectParts) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        let existing = self.project_repo.get_project_by_id(&valid_id).await.map_err(not_found)?;

        let ProjectParts { input, image, parse_errors } = parts;
        let extension = check_input(&input, image.as_ref(), parse_errors)?;

        let mut image_path = existing.image.clone();
        let mut stored = None;
        let mut replaced = None;
        if image.is_some() {
            if let Some(old) = &existing.image {
                self.storage.delete(old).await?;
                replaced = Some(old.as_str());
            }
            stored = self.store_image(image, extension).await.inspect_err(|e| {
                if let Some(old) = replaced {
                    warn!(id = %valid_id, old = %old, "Project now references a deleted image: {}", e);
                }
            })?;
            image_path = stored.clone();
        }

        let record = to_record(&input, image_path);
        match self.project_repo.update_project(&valid_id, &record).await {
            Ok(project) => {
                info!(id = %project.id, "Project updated");
                Ok(project)
            }
            Err(e) => {
                if let Some(path) = &stored {
                    self.discard_image(path).await;
                }
                if let Some(old) = replaced {
                    warn!(id = %valid_id, old = %old, "Project now references a deleted image: {}", e);
                }
                Err(not_found(e))
            }
        }
    }

    pub async fn toggle_featured(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        let project = self.project_repo.get_project_by_id(&valid_id).await.map_err(not_found)?;

        let project = self.project_repo
            .set_featured(&valid_id, !project.is_featured)
            .await
            .map_err(not_found)?;

        info!(id = %project.id, is_featured = project.is_featured, "Project featured flag toggled");
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        let project = self.project_repo.get_project_by_id(&valid_id).await.map_err(not_found)?;

        if let Some(path) = &project.image {
            if let Err(e) = self.storage.delete(path).await {
                warn!(id = %project.id, path = %path, "Failed to delete project image: {}", e);
            }
        }

        self.project_repo.delete_project(&valid_id).await.map_err(not_found)?;
        info!(id = %valid_id, "Project deleted");
        Ok(())
    }

    async fn store_image(
        &self,
        image: Option<ImageUpload>,
        extension: Option<&'static str>,
    ) -> Result<Option<String>, AppError> {
        match (image, extension) {
            (Some(image), Some(extension)) => {
                let path = self.storage.store(&image.bytes, IMAGE_FOLDER, extension).await?;
                Ok(Some(path))
            }
            _ => Ok(None),
        }
    }

    async fn discard_image(&self, path: &str) {
        match self.storage.delete(path).await {
            Ok(()) => info!(path = %path, "Removed image after failed write"),
            Err(e) => warn!(path = %path, "Orphaned image after failed write: {}", e),
        }
    }
}

/// Collects form, image and parse failures together; returns the image
/// extension when everything passes.
fn check_input(
    input: &ProjectInput,
    image: Option<&ImageUpload>,
    parse_errors: Vec<FieldError>,
) -> Result<Option<&'static str>, AppError> {
    let mut errors = match input.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    };
    errors.extend(parse_errors);

    let extension = match image.map(|img| img.check("image", "image")) {
        Some(Ok(ext)) => Some(ext),
        Some(Err(e)) => {
            errors.push(e);
            None
        }
        None => None,
    };

    if errors.is_empty() {
        Ok(extension)
    } else {
        Err(AppError::ValidationError(errors))
    }
}

fn to_record(input: &ProjectInput, image: Option<String>) -> ProjectRecord {
    ProjectRecord {
        name: input.name.clone(),
        description: input.description.clone(),
        image,
        github_url: input.github_url.clone(),
        demo_url: input.demo_url.clone(),
        technologies: input.technologies.clone(),
        is_featured: input.is_featured,
        sort_order: input.sort_order,
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Project not found".to_string()),
        _ => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{project::sample_project, upload::png_bytes},
        repositories::project::MockProjectRepository,
        storage::MockMediaStorage,
    };
    use uuid::Uuid;

    fn parts(name: &str) -> ProjectParts {
        ProjectParts {
            input: ProjectInput {
                name: name.into(),
                description: "A tool".into(),
                technologies: vec!["Rust".into()],
                ..Default::default()
            },
            image: None,
            parse_errors: Vec::new(),
        }
    }

    fn project_from(record: &ProjectRecord) -> Project {
        Project {
            name: record.name.clone(),
            description: record.description.clone(),
            image: record.image.clone(),
            github_url: record.github_url.clone(),
            demo_url: record.demo_url.clone(),
            technologies: record.technologies.clone(),
            is_featured: record.is_featured,
            sort_order: record.sort_order,
            ..sample_project("", 0)
        }
    }

    fn handler(repo: MockProjectRepository, storage: MockMediaStorage) -> ProjectHandler<MockProjectRepository, MockMediaStorage> {
        ProjectHandler::new(repo, storage)
    }

    #[actix_rt::test]
    async fn create_stores_image_under_project_folder() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_project()
            .withf(|record| record.image.as_deref() == Some("project-images/shot.png"))
            .times(1)
            .returning(|record| Ok(project_from(record)));

        let mut storage = MockMediaStorage::new();
        storage.expect_store()
            .withf(|_, folder, ext| folder.to_string() == "project-images" && ext.to_string() == "png")
            .times(1)
            .returning(|_, _, _| Ok("project-images/shot.png".to_string()));

        let mut with_image = parts("Crawler");
        with_image.image = Some(ImageUpload::new(png_bytes(4096), Some("shot.png".into())));

        let project = handler(repo, storage).create_project(with_image).await.unwrap();
        assert_eq!(project.image.as_deref(), Some("project-images/shot.png"));
    }

    #[actix_rt::test]
    async fn validation_and_parse_errors_are_reported_together() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_project().times(0);
        let mut storage = MockMediaStorage::new();
        storage.expect_store().times(0);

        let mut bad = parts("");
        bad.input.github_url = Some("not a url".into());
        bad.parse_errors.push(FieldError {
            field: "sort_order".into(),
            message: "The sort order must be an integer.".into(),
        });

        let err = handler(repo, storage).create_project(bad).await.unwrap_err();
        let messages = err.field_messages();
        assert_eq!(messages.get("name").map(String::as_str), Some("The project name is required."));
        assert_eq!(messages.get("github_url").map(String::as_str), Some("The GitHub URL must be a valid URL."));
        assert_eq!(messages.get("sort_order").map(String::as_str), Some("The sort order must be an integer."));
    }

    #[actix_rt::test]
    async fn failed_insert_removes_the_stored_image() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_project()
            .returning(|_| Err(AppError::InternalError("connection reset".into())));

        let mut storage = MockMediaStorage::new();
        storage.expect_store().returning(|_, _, _| Ok("project-images/x.png".to_string()));
        storage.expect_delete()
            .withf(|path| path.to_string() == "project-images/x.png")
            .times(1)
            .returning(|_| Ok(()));

        let mut with_image = parts("Crawler");
        with_image.image = Some(ImageUpload::new(png_bytes(64), None));

        assert!(handler(repo, storage).create_project(with_image).await.is_err());
    }

    #[actix_rt::test]
    async fn update_without_upload_keeps_existing_image() {
        let mut existing = sample_project("Old", 2);
        existing.image = Some("project-images/old.png".into());
        let id = existing.id;

        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id().returning(move |_| Ok(existing.clone()));
        repo.expect_update_project()
            .withf(|_, record| record.image.as_deref() == Some("project-images/old.png") && record.name == "Renamed")
            .returning(|_, record| Ok(project_from(record)));

        let mut storage = MockMediaStorage::new();
        storage.expect_delete().times(0);
        storage.expect_store().times(0);

        let project = handler(repo, storage)
            .update_project(&id.to_string(), parts("Renamed"))
            .await
            .unwrap();
        assert_eq!(project.name, "Renamed");
    }

    #[actix_rt::test]
    async fn failed_update_after_replacing_image_discards_the_new_file() {
        let mut existing = sample_project("Old", 2);
        existing.image = Some("project-images/old.png".into());
        let id = existing.id;

        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id().returning(move |_| Ok(existing.clone()));
        repo.expect_update_project()
            .times(1)
            .returning(|_, _| Err(AppError::InternalError("connection reset".into())));

        let mut seq = mockall::Sequence::new();
        let mut storage = MockMediaStorage::new();
        storage.expect_delete()
            .withf(|path| path.to_string() == "project-images/old.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        storage.expect_store()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("project-images/new.png".to_string()));
        storage.expect_delete()
            .withf(|path| path.to_string() == "project-images/new.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut with_image = parts("Old");
        with_image.image = Some(ImageUpload::new(png_bytes(64), None));

        let err = handler(repo, storage)
            .update_project(&id.to_string(), with_image)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[actix_rt::test]
    async fn toggle_featured_flips_the_flag() {
        let project = sample_project("Flip", 0);
        let id = project.id;
        let was_featured = project.is_featured;

        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id().returning(move |_| Ok(project.clone()));
        repo.expect_set_featured()
            .withf(move |_, featured| *featured == !was_featured)
            .times(1)
            .returning(|_, featured| Ok(Project { is_featured: featured, ..sample_project("Flip", 0) }));

        let toggled = handler(repo, MockMediaStorage::new())
            .toggle_featured(&id.to_string())
            .await
            .unwrap();
        assert_eq!(toggled.is_featured, !was_featured);
    }

    #[actix_rt::test]
    async fn delete_tolerates_image_cleanup_failure() {
        let mut project = sample_project("Gone", 0);
        project.image = Some("project-images/gone.png".into());
        let id = project.id;

        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id().returning(move |_| Ok(project.clone()));
        repo.expect_delete_project().times(1).returning(|_| Ok(()));

        let mut storage = MockMediaStorage::new();
        storage.expect_delete().returning(|_| {
            Err(crate::errors::StorageError::Delete(std::io::Error::other("disk gone")))
        });

        assert!(handler(repo, storage).delete_project(&id.to_string()).await.is_ok());
    }

    #[actix_rt::test]
    async fn missing_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_get_project_by_id()
            .returning(|_| Err(AppError::NotFound("Record not found".into())));

        let err = handler(repo, MockMediaStorage::new())
            .get_project_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Project not found"));
    }
}
