//! Session domain module.
//!
//! # Module Structure
//!
//! - `step`: the enumerated conversation step (`Step`)
//! - `model`: session state (`Session`, `DocumentSlot`, `IssuedPrompt`)
//! - `event`: inbound events (`SessionEvent`, `Command`, `CardAction`)
//! - `repository`: persistence trait (`SessionRepository`)

mod event;
mod model;
mod repository;
mod step;

pub use event::{CardAction, CardSubmission, Command, FileRef, SessionEvent};
pub use model::{DocumentSlot, InputMode, IssuedPrompt, Session};
pub use repository::SessionRepository;
pub use step::Step;
