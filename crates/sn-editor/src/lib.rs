pub mod commit;
pub mod edit;
pub mod input;
pub mod machine;
pub mod session;
pub mod shortcuts;

pub use commit::{Commit, CommitOutcome, CommitQueue, execute};
pub use edit::EditBuffer;
pub use input::{InputEvent, Modifiers};
pub use machine::Release;
pub use session::{Effect, Effects, Notification, NotifyLevel, Session};
pub use shortcuts::{ShortcutAction, ShortcutMap};
