// Composition root for the hamster library.
//
// Responsibilities
// - Read configuration, from the caller or the environment.
// - Resolve and instantiate the configured storage backend.
// - Hand clients a controller exposing the backend's collections.

pub mod config;
pub mod control;
pub mod registry;
