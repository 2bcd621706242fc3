// Adapters layer: concrete implementations of the domain ports.

pub mod dialog;
#[cfg(feature = "cli")]
pub mod keyring_store;
#[cfg(feature = "cli")]
pub mod webdriver;

pub use dialog::NativeDialog;
#[cfg(feature = "cli")]
pub use keyring_store::KeyringStore;
#[cfg(feature = "cli")]
pub use webdriver::WebDriverBrowser;
