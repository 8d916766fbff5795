pub mod dedup;
pub mod machine;
pub mod session;


pub use dedup::SingleFlightCatalog;
pub use machine::{
    FetchKey, FetchTicket, SeatWizard, SectionPolicy, Stage, StageFailure, ToggleOutcome,
    WizardError,
};
pub use session::{SessionError, WizardSession};
