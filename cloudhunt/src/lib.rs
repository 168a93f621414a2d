// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{
    expand_path, hunt_options_from_matches, load_affixes_or_default, load_resolvers_or_default,
    report_path,
};

pub use cloudhunt_core::hunt::{HuntOptions, HuntReport, execute_hunt};
