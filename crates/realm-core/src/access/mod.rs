//! Access control for channels

mod evaluator;

pub use evaluator::{AccessControl, AccessDenial, ManageAction, Requester, TargetMember};
