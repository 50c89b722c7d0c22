//! What the engine needs from the editor it runs inside.
//!
//! Message toasts, output panes, file pickers, and document access all live
//! on the host side. The engine only calls through [`EditorHost`].

use std::future::Future;
use std::path::{Path, PathBuf};

use governor_types::Document;

/// Named text panes the engine writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    /// Raw analyzer text that could not be read as structured results.
    Analysis,
    /// Breaking-change report for diff runs.
    Diff,
}

impl OutputChannel {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Analysis => "API Governor",
            Self::Diff => "API Governor Diff",
        }
    }
}

pub trait EditorHost: Send + Sync + 'static {
    fn show_info(&self, message: &str);
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);

    /// Append one line to `channel`.
    fn append_line(&self, channel: OutputChannel, text: &str);
    fn clear_channel(&self, channel: OutputChannel);
    /// Bring `channel` to the user's attention.
    fn reveal_channel(&self, channel: OutputChannel);

    /// Show `message` with a single action button. Resolves to whether the
    /// user chose the action.
    fn offer_action(&self, message: &str, action: &str) -> impl Future<Output = bool> + Send;

    /// Ask the user for a baseline spec. `None` means the prompt was dismissed.
    fn pick_baseline(&self) -> impl Future<Output = Option<PathBuf>> + Send;

    /// Open a generated artifact for viewing.
    fn open_artifact(&self, path: &Path) -> std::io::Result<()>;

    fn workspace_root(&self) -> Option<PathBuf>;
    fn active_document(&self) -> Option<Document>;
    fn open_documents(&self) -> Vec<Document>;
}
