//! Profile management
//!
//! A profile is a named oh-my-opencode config stored as `<name>.json` in the
//! profiles directory. This module covers storage, the save/rename commit
//! flow, export/import of single files, and switching the active config.

mod activate;
mod commit;
mod export;
mod storage;
mod types;

pub use activate::{activate_profile, detect_active, ActivateError, Activation};
pub use commit::{commit_profile, CommitError, CommitOutcome};
pub use export::{export_profile, import_profile, ImportError};
pub use storage::{ProfileInfo, ProfileStore, StoreError, StoreResult};
pub use types::Profile;
