pub mod challenge_view;
pub mod progress_bar;
pub mod splash;
pub mod topic_view;
