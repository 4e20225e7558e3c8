pub mod card;
pub mod toast;
