//! VideoPack: a versioned document describing everything extracted from one
//! video (transcript, keyframes, requirements, code, artifacts), with
//! validation, JSON file I/O, content fingerprints, and format upgrades.

pub mod canon;
pub mod error;
pub mod io;
pub mod provenance;
pub mod schema;
pub mod validate;
pub mod versioning;

pub use error::{PackError, Result};
pub use io::{load_json, read_pack, read_pack_upgraded, save_json, write_pack};
pub use provenance::{pack_fingerprint, stable_hash};
pub use schema::*;
pub use validate::{validate_pack, validate_pack_all, validate_with, ValidationMode};
pub use versioning::{upgrade, upgrade_to_v0, PackVersion, UpgradePolicy};
