pub mod project;
pub mod resource;
pub mod user;

pub use project::{NewProject, Project};
pub use resource::{NewResource, Resource, ResourceRef, ResourceSummary};
pub use user::{NewUser, User};
