pub mod directive;
pub mod generation;
pub mod openai_client;
pub mod planning;
pub mod rendering;
pub mod storage;

pub use directive::{compile, resolve_other, DirectiveDocument};
pub use generation::{ChatGenerator, Generator};
pub use openai_client::{ChatCompletionRequest, OpenAIClient};
pub use rendering::{PdfRenderer, Renderer};
pub use storage::{ArtifactStore, FsArtifactStore};
