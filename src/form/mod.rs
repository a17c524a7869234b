pub mod controller;
pub mod phone;
pub mod validate;

pub use controller::{FormPhase, FormState, SignupForm, SubmitOutcome};
pub use phone::{digits_only, format_phone};
pub use validate::{validate, ValidationError};
