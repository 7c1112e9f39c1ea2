pub mod dashboard;
pub mod login;
pub mod logout;

pub use dashboard::dashboard_page;
pub use login::login_page;
pub use logout::logout_page;
