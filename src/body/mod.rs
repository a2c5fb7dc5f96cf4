// Notification body text: timestamp tag extraction and display formatting.

pub mod format;
pub mod timestamp;
