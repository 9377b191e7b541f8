// handlers/protected/mod.rs - handlers behind jwt_auth_middleware
//
// Every handler here receives the caller as Extension<AuthUser> and only
// ever touches rows owned by that user.

pub mod greeting;
pub mod projects;
pub mod resources;
