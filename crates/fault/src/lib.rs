//! The fault crate holds the off-chain engine of the OP Stack's FaultDisputeGame: the claim tree,
//! the solver that picks honest moves from a local trace, and the responder that submits them.

extern crate narya_primitives;

mod agent;
pub use agent::{ActReport, Agent};

mod config;
pub use config::FaultConfig;

mod error;
pub use error::FaultError;

mod responder;
pub use responder::FaultResponder;

mod solver;
pub use solver::FaultSolver;

mod state;
pub use state::GameState;

mod traits;
pub use traits::{Responder, TraceProvider, TxManager};

mod types;
pub use types::{
    FaultSolverResponse, Receipt, ReceiptStatus, StepCallData, StepData, TxCandidate,
};

pub mod providers;

#[cfg(test)]
mod mocks;

pub mod prelude {
    pub use super::{
        providers::*, ActReport, Agent, FaultConfig, FaultError, FaultResponder, FaultSolver,
        FaultSolverResponse, GameState, Receipt, ReceiptStatus, Responder, StepCallData, StepData,
        TraceProvider, TxCandidate, TxManager,
    };
}
