//! Domain entities
//!
//! Pure domain models. Posts and editors belong to the host platform; the
//! publish types are owned by this service.

pub mod editor;
pub mod post;
pub mod publish;

pub use editor::{Editor, EditorId, EDIT_POSTS};
pub use post::{Post, PostId, OG_DESCRIPTION_KEY, OG_IMAGE_KEY, OG_TITLE_KEY};
pub use publish::{
    PageCredentials, PublishOutcome, PublishRequest, PublishStrategy, RemoteObjectId,
    REMOTE_ID_KEY, SHARED_AT_FORMAT, SHARED_AT_KEY, SHARED_FLAG_KEY,
};
