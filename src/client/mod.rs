pub mod object_api;
pub mod status_api;

pub use object_api::{patch_or_create, KubeObjectApi, ObjectApi, PatchOutcome};
pub use status_api::{KubeStatusWriter, StatusWriter};
