// ─── minem Core ───
// Backend for the minem server manager.
//
// Architecture:
//   core/
//     version/    — Mojang manifest + per-version metadata
//     downloader/ — Streaming download with SHA-1 validation
//     fetch       — Version selector → verified server jar
//     java/       — Java runtime resolution
//     launch/     — Server process spawner
//     project/    — minem.json model + scaffolding
//     registry    — Global list of named servers
//     properties  — server.properties editor

pub mod downloader;
pub mod error;
pub mod fetch;
pub mod http;
pub mod java;
pub mod launch;
pub mod project;
pub mod properties;
pub mod registry;
pub mod version;
