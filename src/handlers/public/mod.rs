// handlers/public/mod.rs - handlers reachable without a token
//
// Route prefixes: /, /health, /api/auth/*, /api/:prefix/:resource
// Middleware: none

pub mod auth;
pub mod generate;
pub mod service;
