mod layout;
pub use layout::AppLayout;

mod signin;
pub use signin::SignIn;

mod signup;
pub use signup::SignUp;

mod tasks;
pub use tasks::Tasks;

mod completed;
pub use completed::Completed;

mod edit;
pub use edit::EditTask;

mod notifications;
pub use notifications::Notifications;
