pub mod apply;
pub mod datatypes;
pub mod extract;
pub mod layout;
pub mod patch;
pub mod pipeline;
pub mod project;
pub mod resource;
pub mod utils;
pub mod wolf_file;

// 重新导出主要结构
pub use apply::Applier;
pub use extract::Extractor;
pub use patch::{PatchDocument, TranslationUnit};
pub use pipeline::{ProgressCallback, WolfTl};
pub use project::Project;
pub use resource::{IngestOutcome, Resource, ResourceKind};
pub use utils::{is_translatable_string, set_skip_backup, WolfError};
pub use wolf_file::WolfFile;
