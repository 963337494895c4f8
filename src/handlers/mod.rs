pub mod home_handlers;
pub mod jar_handlers;
pub mod location_handlers;
pub mod member_handlers;
pub mod results_handlers;
pub mod suggestion_handlers;
pub mod vote_handlers;
