pub mod controller;
pub mod input;
pub mod navigation;

pub use controller::{Flow, SessionController};
pub use navigation::{EndPolicy, Intent, NavigationMachine, NavigatorOptions, Phase, Transition};
