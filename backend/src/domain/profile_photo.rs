//! Profile photo metadata attached to a personal information record.
//!
//! Only the metadata record lives here; image bytes are handled elsewhere.
//! A photo can only be attached to personal information the caller owns.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::Error;
use super::identity::IdentityId;
use super::ownership::{
    OwnedResource, OwnedResourceService, ResourceId, map_store_error, require_owned,
};
use super::person_information::PersonInformation;
use super::ports::{OwnedResourceCommand, OwnedResourceQuery, OwnedResourceStore};

/// Directory prefix recorded in [`ProfilePhoto::file_path`].
pub const UPLOAD_DIR: &str = "uploads";
/// Accepted image file extensions, compared case-insensitively.
pub const PHOTO_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Validation errors for photo file names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoValidationError {
    #[error("file name must not be empty")]
    EmptyFileName,
    #[error("file name must not contain path separators")]
    PathInFileName,
    #[error("only jpg, jpeg, png and gif files are allowed")]
    UnsupportedExtension,
}

/// Bare image file name with an accepted extension.
///
/// # Examples
/// ```
/// use persona::domain::PhotoFileName;
///
/// assert!(PhotoFileName::new("me.PNG").is_ok());
/// assert!(PhotoFileName::new("../me.png").is_err());
/// assert!(PhotoFileName::new("me.bmp").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "portrait.jpg")]
pub struct PhotoFileName(String);

impl PhotoFileName {
    /// Validate a file name.
    pub fn new(value: &str) -> Result<Self, PhotoValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PhotoValidationError::EmptyFileName);
        }
        if trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
            return Err(PhotoValidationError::PathInFileName);
        }
        let extension = trimmed
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or(PhotoValidationError::UnsupportedExtension)?;
        if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
            return Err(PhotoValidationError::UnsupportedExtension);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the file name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Field values for attaching a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePhotoDraft {
    pub person_information_id: ResourceId,
    pub file_name: PhotoFileName,
}

/// Photo metadata owned by one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    id: ResourceId,
    #[serde(skip)]
    owner_id: IdentityId,
    person_information_id: ResourceId,
    file_name: PhotoFileName,
    #[schema(example = "uploads/portrait.jpg")]
    file_path: String,
}

impl ProfilePhoto {
    /// Personal information record the photo belongs to.
    pub fn person_information_id(&self) -> ResourceId {
        self.person_information_id
    }

    /// Stored file name.
    pub fn file_name(&self) -> &PhotoFileName {
        &self.file_name
    }

    /// Relative storage path.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

impl OwnedResource for ProfilePhoto {
    type Draft = ProfilePhotoDraft;

    const KIND: &'static str = "profile photo";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn owner_id(&self) -> IdentityId {
        self.owner_id
    }

    fn from_draft(id: ResourceId, owner: IdentityId, draft: Self::Draft) -> Self {
        let file_path = format!("{UPLOAD_DIR}/{}", draft.file_name.as_str());
        Self {
            id,
            owner_id: owner,
            person_information_id: draft.person_information_id,
            file_name: draft.file_name,
            file_path,
        }
    }

    fn apply(self, draft: Self::Draft) -> Self {
        Self::from_draft(self.id, self.owner_id, draft)
    }
}

/// Ownership-guarded photo operations that also check the parent record.
pub struct ProfilePhotoService<P, I> {
    photos: OwnedResourceService<P>,
    people: Arc<I>,
}

impl<P, I> ProfilePhotoService<P, I>
where
    P: OwnedResourceStore<Resource = ProfilePhoto>,
    I: OwnedResourceStore<Resource = PersonInformation>,
{
    /// Serve photos from `photos`, resolving parents through `people`.
    pub fn new(photos: Arc<P>, people: Arc<I>) -> Self {
        Self {
            photos: OwnedResourceService::new(photos),
            people,
        }
    }

    async fn require_parent(&self, draft: &ProfilePhotoDraft, caller: &IdentityId) -> Result<(), Error> {
        let parent_id = draft.person_information_id;
        let found = self
            .people
            .find_by_id_for_owner(&parent_id, caller)
            .await
            .map_err(map_store_error)?;
        require_owned(found, &parent_id, caller).map(|_| ())
    }
}

#[async_trait]
impl<P, I> OwnedResourceQuery<ProfilePhoto> for ProfilePhotoService<P, I>
where
    P: OwnedResourceStore<Resource = ProfilePhoto>,
    I: OwnedResourceStore<Resource = PersonInformation>,
{
    async fn list(&self, caller: &IdentityId) -> Result<Vec<ProfilePhoto>, Error> {
        self.photos.list(caller).await
    }

    async fn get(&self, id: &ResourceId, caller: &IdentityId) -> Result<ProfilePhoto, Error> {
        self.photos.get(id, caller).await
    }
}

#[async_trait]
impl<P, I> OwnedResourceCommand<ProfilePhoto> for ProfilePhotoService<P, I>
where
    P: OwnedResourceStore<Resource = ProfilePhoto>,
    I: OwnedResourceStore<Resource = PersonInformation>,
{
    async fn create(&self, draft: ProfilePhotoDraft, caller: &IdentityId) -> Result<ProfilePhoto, Error> {
        self.require_parent(&draft, caller).await?;
        self.photos.create(draft, caller).await
    }

    async fn update(
        &self,
        id: &ResourceId,
        draft: ProfilePhotoDraft,
        caller: &IdentityId,
    ) -> Result<ProfilePhoto, Error> {
        self.photos.get(id, caller).await?;
        self.require_parent(&draft, caller).await?;
        self.photos.update(id, draft, caller).await
    }

    async fn delete(&self, id: &ResourceId, caller: &IdentityId) -> Result<(), Error> {
        self.photos.delete(id, caller).await
    }
}
