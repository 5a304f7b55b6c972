pub mod clock;
pub mod reply;
pub mod session;
pub mod state;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reply::{Answered, Reply, StreamingReply};
pub use session::{Capabilities, ContextSession, SessionError, USER_FAILURE_MESSAGE};
pub use state::{ContextState, ReloadReason, Routing, WorkingSet};
pub use stats::SessionStats;
