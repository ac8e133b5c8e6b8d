//! Report delivery.
//!
//! Delivery is best effort: failures are logged and counted in a
//! [`DeliveryReport`], never returned as errors.

mod console_notifier;
mod message_split;
mod notifier_traits;
mod telegram_notifier;

pub use console_notifier::ConsoleNotifier;
pub use message_split::split_message;
pub use notifier_traits::{DeliveryReport, Notifier};
pub use telegram_notifier::{TelegramConfig, TelegramNotifier, DEFAULT_TELEGRAM_API_BASE};
