pub mod card;
pub mod progress;

pub use card::{blocker_table, card, label_value_list, task_card};
pub use progress::progress_timeline;
