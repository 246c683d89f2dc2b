pub mod batch;
pub mod engine;
pub mod script_session;
pub mod workbench;

pub use batch::{run_batch, BatchReport};
pub use engine::{AlgorithmRef, Engine, Selection};
pub use script_session::{run_script, ScriptSession, ScriptSource, SessionState};
pub use workbench::Workbench;
