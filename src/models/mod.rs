pub mod block_list;
pub mod navigation;
pub mod schedule;
pub mod settings;
pub mod stats;

pub use block_list::{AddOutcome, BlockList};
pub use navigation::{extract_host, web_host, Decision, NavigationEvent};
pub use schedule::ScheduleConfig;
pub use settings::Settings;
pub use stats::Stats;
